use std::fmt::{Display, Formatter};

/// A broken cross-aggregate invariant found by the consistency checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    AvailabilityOutOfRange {
        book_id: i64,
        total: u32,
        available: u32,
    },
    AvailabilityMismatch {
        book_id: i64,
        expected: i64,
        actual: u32,
    },
    DuplicateOpenRecords {
        user_id: i64,
        book_id: i64,
        count: usize,
    },
    LoanWithoutRecord {
        user_id: i64,
        book_id: i64,
    },
    RecordWithoutLoan {
        record_id: i64,
        user_id: i64,
        book_id: i64,
    },
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::AvailabilityOutOfRange {
                book_id,
                total,
                available,
            } => write!(
                f,
                "book {book_id} has {available} copies available out of {total}"
            ),
            Violation::AvailabilityMismatch {
                book_id,
                expected,
                actual,
            } => write!(
                f,
                "book {book_id} has {actual} copies available but the ledger implies {expected}"
            ),
            Violation::DuplicateOpenRecords {
                user_id,
                book_id,
                count,
            } => write!(
                f,
                "user {user_id} has {count} open records for book {book_id}"
            ),
            Violation::LoanWithoutRecord { user_id, book_id } => write!(
                f,
                "user {user_id} holds book {book_id} without an open record"
            ),
            Violation::RecordWithoutLoan {
                record_id,
                user_id,
                book_id,
            } => write!(
                f,
                "record {record_id} is open but user {user_id} does not hold book {book_id}"
            ),
        }
    }
}
