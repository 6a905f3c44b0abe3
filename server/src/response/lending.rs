use serde::Serialize;

use application::transfer::{BorrowOutcome, ReturnOutcome};

use crate::controller::Exhaust;
use crate::response::{BookResponse, RecordResponse, UserResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LendingResponse {
    user: UserResponse,
    book: BookResponse,
    borrow_record: Option<RecordResponse>,
    /// Present when a return went through but its ledger entry did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

pub struct LendingPresenter;

impl Exhaust<BorrowOutcome> for LendingPresenter {
    type To = LendingResponse;
    fn emit(&self, input: BorrowOutcome) -> Self::To {
        LendingResponse {
            user: input.user.into(),
            book: input.book.into(),
            borrow_record: Some(input.borrow_record.into()),
            warning: None,
        }
    }
}

impl Exhaust<ReturnOutcome> for LendingPresenter {
    type To = LendingResponse;
    fn emit(&self, input: ReturnOutcome) -> Self::To {
        LendingResponse {
            user: input.user.into(),
            book: input.book.into(),
            borrow_record: input.borrow_record.map(RecordResponse::from),
            warning: input.inconsistency.map(|found| found.to_string()),
        }
    }
}
