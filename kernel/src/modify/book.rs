use time::OffsetDateTime;

use crate::entity::{Book, BookDetail, BookId, CopiesAvailable, TotalCopies, UpdatedAt};
use crate::KernelError;

/// Fields to overwrite on a stored book. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BookPatch {
    pub detail: Option<BookDetail>,
    pub total_copies: Option<TotalCopies>,
    pub copies_available: Option<CopiesAvailable>,
}

impl BookPatch {
    pub fn copies_available(copies: CopiesAvailable) -> Self {
        Self {
            copies_available: Some(copies),
            ..Default::default()
        }
    }

    pub fn merge(self, book: Book, now: OffsetDateTime) -> Book {
        let mut book = book.into_destruct();
        if let Some(detail) = self.detail {
            book.detail = detail;
        }
        if let Some(total_copies) = self.total_copies {
            book.total_copies = total_copies;
        }
        if let Some(copies_available) = self.copies_available {
            book.copies_available = copies_available;
        }
        book.updated_at = UpdatedAt::new(now);
        book.freeze()
    }
}

#[async_trait::async_trait]
pub trait BookModifier: 'static + Sync + Send {
    async fn next_id(&self) -> error_stack::Result<BookId, KernelError>;
    async fn create(&self, book: &Book) -> error_stack::Result<(), KernelError>;
    /// Merges `patch` into the stored book and returns the result.
    async fn update(&self, id: &BookId, patch: BookPatch)
        -> error_stack::Result<Book, KernelError>;
    async fn delete(&self, id: &BookId) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookModifier: 'static + Sync + Send {
    type BookModifier: BookModifier;
    fn book_modifier(&self) -> &Self::BookModifier;
}
