use time::OffsetDateTime;

use kernel::interface::query::BookQuery;
use kernel::interface::update::{BookModifier, BookPatch};
use kernel::prelude::entity::{Book, BookId};
use kernel::KernelError;

use crate::database::memory::table::Table;
use crate::error::ConvertError;

pub struct MemoryBookRepository {
    table: Table<BookId, Book>,
}

impl Default for MemoryBookRepository {
    fn default() -> Self {
        Self {
            table: Table::new("books"),
        }
    }
}

#[async_trait::async_trait]
impl BookQuery for MemoryBookRepository {
    async fn find_by_id(&self, id: &BookId) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(self.table.get(id))
    }

    async fn find_all(&self) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(self.table.all())
    }
}

#[async_trait::async_trait]
impl BookModifier for MemoryBookRepository {
    async fn next_id(&self) -> error_stack::Result<BookId, KernelError> {
        Ok(BookId::new(self.table.next_id()))
    }

    async fn create(&self, book: &Book) -> error_stack::Result<(), KernelError> {
        tracing::debug!(book_id = ?book.id(), "insert book");
        self.table.insert(*book.id(), book.clone()).convert_error()
    }

    async fn update(
        &self,
        id: &BookId,
        patch: BookPatch,
    ) -> error_stack::Result<Book, KernelError> {
        tracing::debug!(book_id = ?id, ?patch, "update book");
        self.table
            .modify(id, |book| patch.merge(book, OffsetDateTime::now_utc()))
            .convert_error()
    }

    async fn delete(&self, id: &BookId) -> error_stack::Result<(), KernelError> {
        tracing::debug!(book_id = ?id, "delete book");
        self.table.remove(id).map(|_| ()).convert_error()
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use kernel::interface::query::BookQuery;
    use kernel::interface::update::{BookModifier, BookPatch};
    use kernel::prelude::entity::{
        Book, BookAuthor, BookDetail, BookId, BookTitle, CopiesAvailable, Isbn, PublishedDate,
        TotalCopies,
    };
    use kernel::KernelError;

    use super::MemoryBookRepository;

    fn book(id: BookId) -> Book {
        Book::register(
            id,
            BookDetail::new(
                BookTitle::new("Clean Code"),
                BookAuthor::new("Robert C. Martin"),
                Isbn::new("9780132350884"),
                None,
                None,
                PublishedDate::new(datetime!(2008-08-01 00:00 UTC)),
            ),
            TotalCopies::new(2u32),
            datetime!(2024-01-01 00:00 UTC),
        )
    }

    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let repository = MemoryBookRepository::default();
        let id = repository.next_id().await?;
        let book = book(id);
        repository.create(&book).await?;
        assert_eq!(repository.find_by_id(&id).await?, Some(book.clone()));

        let updated = repository
            .update(&id, BookPatch::copies_available(CopiesAvailable::new(1u32)))
            .await?;
        assert_eq!(updated.copies_available(), &CopiesAvailable::new(1u32));
        assert_eq!(updated.detail(), book.detail());
        assert_eq!(repository.find_by_id(&id).await?, Some(updated));

        repository.delete(&id).await?;
        assert!(repository.find_by_id(&id).await?.is_none());
        assert!(repository.find_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_and_duplicate_ids() -> error_stack::Result<(), KernelError> {
        let repository = MemoryBookRepository::default();
        let id = BookId::new(5);
        let error = repository
            .update(&id, BookPatch::default())
            .await
            .expect_err("book 5 does not exist");
        assert_eq!(error.current_context(), &KernelError::NotFound);

        repository.create(&book(id)).await?;
        let error = repository
            .create(&book(id))
            .await
            .expect_err("book 5 already exists");
        assert_eq!(error.current_context(), &KernelError::Conflict);
        assert_eq!(repository.next_id().await?, BookId::new(6));
        Ok(())
    }
}
