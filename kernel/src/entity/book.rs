mod copies;
mod detail;
mod id;

pub use self::{copies::*, detail::*, id::*};
use crate::entity::common::{CreatedAt, UpdatedAt};
use destructure::Destructure;
use time::OffsetDateTime;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    detail: BookDetail,
    total_copies: TotalCopies,
    copies_available: CopiesAvailable,
    created_at: CreatedAt<Book>,
    updated_at: UpdatedAt<Book>,
}

impl Book {
    pub fn new(
        id: BookId,
        detail: BookDetail,
        total_copies: TotalCopies,
        copies_available: CopiesAvailable,
        created_at: CreatedAt<Book>,
        updated_at: UpdatedAt<Book>,
    ) -> Self {
        Self {
            id,
            detail,
            total_copies,
            copies_available,
            created_at,
            updated_at,
        }
    }

    /// A freshly catalogued book with every copy on the shelf.
    pub fn register(
        id: BookId,
        detail: BookDetail,
        total_copies: TotalCopies,
        now: OffsetDateTime,
    ) -> Self {
        Self::new(
            id,
            detail,
            total_copies,
            CopiesAvailable::full(&total_copies),
            CreatedAt::new(now),
            UpdatedAt::new(now),
        )
    }

    /// Copies currently handed out, as implied by the two counters.
    pub fn outstanding(&self) -> u32 {
        self.total_copies
            .as_ref()
            .saturating_sub(*self.copies_available.as_ref())
    }

    pub fn is_available(&self) -> bool {
        self.copies_available.is_positive()
    }
}
