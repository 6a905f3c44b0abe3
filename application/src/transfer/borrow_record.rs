use time::OffsetDateTime;

use kernel::prelude::entity::{BorrowRecord, BorrowStatus, DestructBorrowRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowRecordDto {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub borrow_date: OffsetDateTime,
    pub due_date: OffsetDateTime,
    pub return_date: Option<OffsetDateTime>,
    pub status: BorrowStatus,
    pub created_at: OffsetDateTime,
}

impl From<BorrowRecord> for BorrowRecordDto {
    fn from(value: BorrowRecord) -> Self {
        let DestructBorrowRecord {
            id,
            user_id,
            book_id,
            borrow_date,
            due_date,
            return_date,
            status,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            book_id: book_id.into(),
            borrow_date: borrow_date.into(),
            due_date: due_date.into(),
            return_date: return_date.map(Into::into),
            status,
            created_at: created_at.into(),
        }
    }
}

pub struct GetRecordDto {
    pub id: i64,
}

pub struct GetRecordsByUserDto {
    pub user_id: i64,
}

pub struct GetRecordsByBookDto {
    pub book_id: i64,
}
