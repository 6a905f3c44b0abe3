use std::fmt::{Display, Formatter};

use kernel::KernelError;

use crate::transfer::{BookDto, BorrowRecordDto, UserDto};

/// Input of both lending workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LendingDto {
    pub user_id: i64,
    pub book_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowOutcome {
    pub user: UserDto,
    pub book: BookDto,
    pub borrow_record: BorrowRecordDto,
}

/// Result of a return. The copy and the user's loan list are always updated
/// when this is produced; `inconsistency` reports a ledger entry that could
/// not be closed, in which case `borrow_record` may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOutcome {
    pub user: UserDto,
    pub book: BookDto,
    pub borrow_record: Option<BorrowRecordDto>,
    pub inconsistency: Option<LedgerInconsistency>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerInconsistency {
    pub user_id: i64,
    pub book_id: i64,
    pub reason: InconsistencyReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InconsistencyReason {
    /// The user held a loan but the ledger had no open record for it.
    MissingOpenRecord,
    WriteFailed(KernelError),
}

impl Display for LedgerInconsistency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            InconsistencyReason::MissingOpenRecord => write!(
                f,
                "No open borrow record found for user {} and book {}",
                self.user_id, self.book_id
            ),
            InconsistencyReason::WriteFailed(cause) => write!(
                f,
                "Borrow record for user {} and book {} could not be closed: {}",
                self.user_id, self.book_id, cause
            ),
        }
    }
}
