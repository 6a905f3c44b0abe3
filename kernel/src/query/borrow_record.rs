use crate::entity::{BookId, BorrowRecord, BorrowRecordId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BorrowRecordQuery: Sync + Send + 'static {
    async fn find_by_id(
        &self,
        id: &BorrowRecordId,
    ) -> error_stack::Result<Option<BorrowRecord>, KernelError>;

    async fn find_all(&self) -> error_stack::Result<Vec<BorrowRecord>, KernelError>;

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<BorrowRecord>, KernelError>;

    async fn find_by_book_id(
        &self,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BorrowRecord>, KernelError>;

    /// The record still in `borrowed` state for this pair, if any.
    async fn find_open(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<BorrowRecord>, KernelError>;
}

pub trait DependOnBorrowRecordQuery: Sync + Send + 'static {
    type BorrowRecordQuery: BorrowRecordQuery;
    fn borrow_record_query(&self) -> &Self::BorrowRecordQuery;
}
