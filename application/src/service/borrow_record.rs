use kernel::interface::query::{
    BookQuery, BorrowRecordQuery, DependOnBookQuery, DependOnBorrowRecordQuery,
    DependOnUserQuery, UserQuery,
};
use kernel::prelude::entity::{BookId, BorrowRecordId, UserId};
use kernel::KernelError;

use crate::transfer::{BorrowRecordDto, GetRecordDto, GetRecordsByBookDto, GetRecordsByUserDto};

/// Read access to the borrow ledger. The per-user and per-book listings
/// return `None` when the owner itself does not exist.
#[async_trait::async_trait]
pub trait GetBorrowRecordService:
    'static + Sync + Send + DependOnBorrowRecordQuery + DependOnUserQuery + DependOnBookQuery
{
    async fn get_all_records(&self) -> error_stack::Result<Vec<BorrowRecordDto>, KernelError> {
        let records = self.borrow_record_query().find_all().await?;
        Ok(records.into_iter().map(BorrowRecordDto::from).collect())
    }

    async fn get_record(
        &self,
        dto: GetRecordDto,
    ) -> error_stack::Result<Option<BorrowRecordDto>, KernelError> {
        let record = self
            .borrow_record_query()
            .find_by_id(&BorrowRecordId::new(dto.id))
            .await?;
        Ok(record.map(BorrowRecordDto::from))
    }

    async fn get_records_by_user(
        &self,
        dto: GetRecordsByUserDto,
    ) -> error_stack::Result<Option<Vec<BorrowRecordDto>>, KernelError> {
        let user_id = UserId::new(dto.user_id);
        if self.user_query().find_by_id(&user_id).await?.is_none() {
            return Ok(None);
        }
        let records = self.borrow_record_query().find_by_user_id(&user_id).await?;
        Ok(Some(records.into_iter().map(BorrowRecordDto::from).collect()))
    }

    async fn get_records_by_book(
        &self,
        dto: GetRecordsByBookDto,
    ) -> error_stack::Result<Option<Vec<BorrowRecordDto>>, KernelError> {
        let book_id = BookId::new(dto.book_id);
        if self.book_query().find_by_id(&book_id).await?.is_none() {
            return Ok(None);
        }
        let records = self.borrow_record_query().find_by_book_id(&book_id).await?;
        Ok(Some(records.into_iter().map(BorrowRecordDto::from).collect()))
    }
}

impl<T> GetBorrowRecordService for T where
    T: DependOnBorrowRecordQuery + DependOnUserQuery + DependOnBookQuery
{
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use driver::database::MemoryDatabase;
    use kernel::prelude::entity::BorrowStatus;
    use kernel::KernelError;

    use crate::service::{
        BorrowService, CreateBookService, CreateUserService, GetBorrowRecordService,
        ReturnService,
    };
    use crate::transfer::{
        BookDetailDto, CreateBookDto, CreateUserDto, GetRecordDto, GetRecordsByBookDto,
        GetRecordsByUserDto, LendingDto,
    };

    #[tokio::test]
    async fn records_are_found_by_id_and_owner() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let book = db
            .create_book(CreateBookDto {
                detail: BookDetailDto {
                    title: "Refactoring".to_string(),
                    author: "Martin Fowler".to_string(),
                    isbn: "9780201485677".to_string(),
                    genre: None,
                    description: None,
                    published_date: datetime!(1999-07-08 00:00 UTC),
                },
                total_copies: 2,
            })
            .await?;
        let user = db
            .create_user(CreateUserDto {
                name: "Jane Smith".to_string(),
                email: "jane.smith@example.com".to_string(),
                membership_date: None,
            })
            .await?;
        let lending = || LendingDto {
            user_id: user.id,
            book_id: book.id,
        };
        let borrowed = db
            .borrow_book(lending())
            .await
            .map_err(|report| report.change_context(KernelError::Internal))?;
        let id = borrowed.borrow_record.id;

        let found = db.get_record(GetRecordDto { id }).await?.expect("record exists");
        assert_eq!(found, borrowed.borrow_record);

        db.return_book(lending())
            .await
            .map_err(|report| report.change_context(KernelError::Internal))?;
        let closed = db.get_record(GetRecordDto { id }).await?.expect("record kept");
        assert_eq!(closed.status, BorrowStatus::Returned);
        assert!(closed.return_date.is_some());

        assert!(db.get_record(GetRecordDto { id: id + 1 }).await?.is_none());

        let by_user = db
            .get_records_by_user(GetRecordsByUserDto { user_id: user.id })
            .await?
            .expect("user exists");
        assert_eq!(by_user, vec![closed.clone()]);
        let by_book = db
            .get_records_by_book(GetRecordsByBookDto { book_id: book.id })
            .await?
            .expect("book exists");
        assert_eq!(by_book, vec![closed]);
        assert!(db
            .get_records_by_user(GetRecordsByUserDto { user_id: 404 })
            .await?
            .is_none());
        Ok(())
    }
}
