mod date;
mod id;
mod status;

pub use self::{date::*, id::*, status::*};
use crate::entity::common::CreatedAt;
use crate::entity::{BookId, UserId};
use destructure::Destructure;
use time::{Duration, OffsetDateTime};
use vodca::References;

/// How long a copy may stay out before it is due back.
pub const LOAN_PERIOD: Duration = Duration::days(14);

/// One entry of the borrow ledger.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BorrowRecord {
    id: BorrowRecordId,
    user_id: UserId,
    book_id: BookId,
    borrow_date: BorrowedAt,
    due_date: DueDate,
    return_date: Option<ReturnedAt>,
    status: BorrowStatus,
    created_at: CreatedAt<BorrowRecord>,
}

impl BorrowRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BorrowRecordId,
        user_id: UserId,
        book_id: BookId,
        borrow_date: BorrowedAt,
        due_date: DueDate,
        return_date: Option<ReturnedAt>,
        status: BorrowStatus,
        created_at: CreatedAt<BorrowRecord>,
    ) -> Self {
        Self {
            id,
            user_id,
            book_id,
            borrow_date,
            due_date,
            return_date,
            status,
            created_at,
        }
    }

    pub fn open(
        id: BorrowRecordId,
        user_id: UserId,
        book_id: BookId,
        borrow_date: BorrowedAt,
        due_date: DueDate,
    ) -> Self {
        let created_at = CreatedAt::new(*borrow_date.as_ref());
        Self::new(
            id,
            user_id,
            book_id,
            borrow_date,
            due_date,
            None,
            BorrowStatus::Borrowed,
            created_at,
        )
    }

    pub fn is_open(&self) -> bool {
        self.status == BorrowStatus::Borrowed
    }
}

/// A user's side of an active loan.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Loan {
    book_id: BookId,
    borrowed_on: BorrowedAt,
    due_date: DueDate,
}

impl Loan {
    pub fn new(book_id: BookId, borrowed_on: BorrowedAt, due_date: DueDate) -> Self {
        Self {
            book_id,
            borrowed_on,
            due_date,
        }
    }

    pub fn starting(book_id: BookId, now: OffsetDateTime) -> Self {
        let borrowed_on = BorrowedAt::new(now);
        let due_date = DueDate::after(&borrowed_on);
        Self::new(book_id, borrowed_on, due_date)
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use super::{BorrowRecord, BorrowRecordId, BorrowStatus, Loan, LOAN_PERIOD};
    use crate::entity::{BookId, UserId};

    #[test]
    fn loan_is_due_after_the_loan_period() {
        let now = datetime!(2024-03-01 10:00 UTC);
        let loan = Loan::starting(BookId::new(1), now);
        assert_eq!(*loan.due_date().as_ref() - *loan.borrowed_on().as_ref(), LOAN_PERIOD);
    }

    #[test]
    fn opened_record_is_borrowed() {
        let loan = Loan::starting(BookId::new(1), datetime!(2024-03-01 10:00 UTC));
        let record = BorrowRecord::open(
            BorrowRecordId::new(7),
            UserId::new(2),
            *loan.book_id(),
            *loan.borrowed_on(),
            *loan.due_date(),
        );
        assert!(record.is_open());
        assert_eq!(record.status(), &BorrowStatus::Borrowed);
        assert!(record.return_date().is_none());
    }
}
