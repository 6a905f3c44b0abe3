use serde::Serialize;
use time::OffsetDateTime;

use application::transfer::BorrowRecordDto;
use kernel::prelude::entity::BorrowStatus;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    id: i64,
    user_id: i64,
    book_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    borrow_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    due_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    return_date: Option<OffsetDateTime>,
    status: BorrowStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<BorrowRecordDto> for RecordResponse {
    fn from(value: BorrowRecordDto) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            book_id: value.book_id,
            borrow_date: value.borrow_date,
            due_date: value.due_date,
            return_date: value.return_date,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

pub struct RecordPresenter;

impl Exhaust<Vec<BorrowRecordDto>> for RecordPresenter {
    type To = Vec<RecordResponse>;
    fn emit(&self, input: Vec<BorrowRecordDto>) -> Self::To {
        input.into_iter().map(RecordResponse::from).collect()
    }
}

impl Exhaust<Option<BorrowRecordDto>> for RecordPresenter {
    type To = Option<RecordResponse>;
    fn emit(&self, input: Option<BorrowRecordDto>) -> Self::To {
        input.map(RecordResponse::from)
    }
}

/// `None` when the owning user or book does not exist.
impl Exhaust<Option<Vec<BorrowRecordDto>>> for RecordPresenter {
    type To = Option<Vec<RecordResponse>>;
    fn emit(&self, input: Option<Vec<BorrowRecordDto>>) -> Self::To {
        input.map(|records| records.into_iter().map(RecordResponse::from).collect())
    }
}
