use error_stack::{Report, ResultExt};
use time::OffsetDateTime;

use kernel::interface::lock::{AggregateLock, DependOnAggregateLock, LockKey};
use kernel::interface::query::{
    BookQuery, BorrowRecordQuery, DependOnBookQuery, DependOnBorrowRecordQuery,
};
use kernel::interface::update::{BookModifier, BookPatch, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookId, CopiesAvailable, TotalCopies};
use kernel::KernelError;

use crate::transfer::{BookDto, CreateBookDto, DeleteBookDto, GetBookDto, UpdateBookDto};

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let id = BookId::new(dto.id);
        let book = self.book_query().find_by_id(&id).await?;
        Ok(book.map(BookDto::from))
    }

    async fn get_all_books(&self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let books = self.book_query().find_all().await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let id = self.book_modifier().next_id().await?;
        let book = Book::register(
            id,
            dto.detail.into(),
            TotalCopies::new(dto.total_copies),
            OffsetDateTime::now_utc(),
        );
        self.book_modifier().create(&book).await?;
        tracing::info!(book_id = id.as_ref(), "book registered");
        Ok(book.into())
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier + DependOnAggregateLock
{
    /// Replaces the descriptive fields and the copy count. Copies currently
    /// out on loan stay out, so availability moves with the new total.
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let id = BookId::new(dto.id);
        let _guard = self.aggregate_lock().acquire(LockKey::Book(id)).await;

        let book = self
            .book_query()
            .find_by_id(&id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("Book with ID {} not found", dto.id))
            })?;
        let outstanding = book.outstanding();
        let Some(available) = dto.total_copies.checked_sub(outstanding) else {
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "Book with ID {} has {} copies on loan, more than the requested total of {}",
                dto.id, outstanding, dto.total_copies
            )));
        };

        let patch = BookPatch {
            detail: Some(dto.detail.into()),
            total_copies: Some(TotalCopies::new(dto.total_copies)),
            copies_available: Some(CopiesAvailable::new(available)),
        };
        let book = self.book_modifier().update(&id, patch).await?;
        Ok(book.into())
    }
}

impl<T> UpdateBookService for T where
    T: DependOnBookQuery + DependOnBookModifier + DependOnAggregateLock
{
}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnBookModifier + DependOnBorrowRecordQuery + DependOnAggregateLock
{
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let id = BookId::new(dto.id);
        let _guard = self.aggregate_lock().acquire(LockKey::Book(id)).await;

        let records = self.borrow_record_query().find_by_book_id(&id).await?;
        if records.iter().any(|record| record.is_open()) {
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "Book with ID {} is currently borrowed",
                dto.id
            )));
        }
        self.book_modifier()
            .delete(&id)
            .await
            .attach_printable_lazy(|| format!("Book with ID {} not found", dto.id))?;
        tracing::info!(book_id = dto.id, "book deleted");
        Ok(())
    }
}

impl<T> DeleteBookService for T where
    T: DependOnBookModifier + DependOnBorrowRecordQuery + DependOnAggregateLock
{
}
