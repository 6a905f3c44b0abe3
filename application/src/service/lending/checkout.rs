use error_stack::Report;
use time::OffsetDateTime;

use kernel::interface::lock::{AggregateLock, DependOnAggregateLock, LockKey};
use kernel::interface::query::{
    BookQuery, BorrowRecordQuery, DependOnBookQuery, DependOnBorrowRecordQuery,
    DependOnUserQuery, UserQuery,
};
use kernel::interface::update::{
    BorrowRecordModifier, DependOnBookModifier, DependOnBorrowRecordModifier,
    DependOnUserModifier,
};
use kernel::prelude::entity::{Book, BookId, BorrowRecord, Loan, User, UserId};
use kernel::{KernelError, LendingError, LendingStep};

use super::{
    attach_loan, borrow_failed, detach_loan, release_copy, reserve_copy, settle, During,
};
use crate::saga::{Saga, SagaStep};
use crate::service::ConsistencyService;
use crate::transfer::{BorrowOutcome, LendingDto};

#[async_trait::async_trait]
pub trait BorrowService:
    'static
    + Sync
    + Send
    + ConsistencyService
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnUserQuery
    + DependOnUserModifier
    + DependOnBorrowRecordQuery
    + DependOnBorrowRecordModifier
    + DependOnAggregateLock
{
    /// Hands one copy of the book to the user: the copy count drops by one,
    /// the user gains a loan due in [`LOAN_PERIOD`](kernel::prelude::entity::LOAN_PERIOD)
    /// and the ledger gains an open record.
    ///
    /// A failure after the first write undoes the completed writes before
    /// returning, so the aggregates end up as they were.
    async fn borrow_book(&self, dto: LendingDto) -> error_stack::Result<BorrowOutcome, LendingError> {
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let _guards = self
            .aggregate_lock()
            .acquire_all(vec![LockKey::Book(book_id), LockKey::User(user_id)])
            .await;

        let outcome = checkout(self, user_id, book_id).await;
        if cfg!(debug_assertions) {
            self.audit_lending(&user_id, &book_id).await;
        }
        match &outcome {
            Ok(outcome) => tracing::info!(
                user_id = dto.user_id,
                book_id = dto.book_id,
                record_id = outcome.borrow_record.id,
                "book borrowed"
            ),
            Err(report) => tracing::debug!(
                user_id = dto.user_id,
                book_id = dto.book_id,
                error = %report,
                "borrow rejected"
            ),
        }
        outcome
    }
}

impl<T> BorrowService for T where
    T: ConsistencyService
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnUserQuery
        + DependOnUserModifier
        + DependOnBorrowRecordQuery
        + DependOnBorrowRecordModifier
        + DependOnAggregateLock
{
}

struct Checkout {
    user_id: UserId,
    book_id: BookId,
    loan: Loan,
    user: User,
    book: Book,
    record: Option<BorrowRecord>,
}

async fn checkout<M>(
    module: &M,
    user_id: UserId,
    book_id: BookId,
) -> error_stack::Result<BorrowOutcome, LendingError>
where
    M: BorrowService + ?Sized,
{
    let (user, book) = preconditions(module, &user_id, &book_id).await?;
    let state = Checkout {
        user_id,
        book_id,
        loan: Loan::starting(book_id, OffsetDateTime::now_utc()),
        user,
        book,
        record: None,
    };

    let saga = Saga::new("borrow")
        .step(ReserveCopy(module))
        .step(AttachLoan(module))
        .step(OpenRecord(module));
    let state = saga.execute(state).await.map_err(settle)?;

    let Some(record) = state.record else {
        return Err(Report::new(borrow_failed(
            LendingStep::Ledger,
            KernelError::Internal,
        ))
        .attach_printable("ledger step finished without a record"));
    };
    Ok(BorrowOutcome {
        user: state.user.into(),
        book: state.book.into(),
        borrow_record: record.into(),
    })
}

/// Checks in order: user exists, book exists, no open record for the pair,
/// a copy is on the shelf. Nothing is written.
async fn preconditions<M>(
    module: &M,
    user_id: &UserId,
    book_id: &BookId,
) -> error_stack::Result<(User, Book), LendingError>
where
    M: BorrowService + ?Sized,
{
    let Some(user) = module
        .user_query()
        .find_by_id(user_id)
        .await
        .during(LendingStep::Lookup, borrow_failed)?
    else {
        return Err(Report::new(LendingError::UserNotFound(*user_id)));
    };
    let Some(book) = module
        .book_query()
        .find_by_id(book_id)
        .await
        .during(LendingStep::Lookup, borrow_failed)?
    else {
        return Err(Report::new(LendingError::BookNotFound(*book_id)));
    };
    let open = module
        .borrow_record_query()
        .find_open(user_id, book_id)
        .await
        .during(LendingStep::Lookup, borrow_failed)?;
    if open.is_some() {
        return Err(Report::new(LendingError::AlreadyBorrowed {
            user_id: *user_id,
            book_id: *book_id,
        }));
    }
    if !book.is_available() {
        return Err(Report::new(LendingError::BookUnavailable(*book_id)));
    }
    Ok((user, book))
}

struct ReserveCopy<'a, M: ?Sized>(&'a M);

#[async_trait::async_trait]
impl<M> SagaStep<Checkout, LendingError> for ReserveCopy<'_, M>
where
    M: BorrowService + ?Sized,
{
    fn name(&self) -> &'static str {
        "reserve copy"
    }

    async fn forward(&self, state: &mut Checkout) -> error_stack::Result<(), LendingError> {
        state.book = reserve_copy(self.0, &state.book_id)
            .await
            .during(LendingStep::Availability, borrow_failed)?;
        Ok(())
    }

    async fn compensate(&self, state: &mut Checkout) -> error_stack::Result<(), LendingError> {
        state.book = release_copy(self.0, &state.book_id)
            .await
            .during(LendingStep::Availability, borrow_failed)?;
        Ok(())
    }
}

struct AttachLoan<'a, M: ?Sized>(&'a M);

#[async_trait::async_trait]
impl<M> SagaStep<Checkout, LendingError> for AttachLoan<'_, M>
where
    M: BorrowService + ?Sized,
{
    fn name(&self) -> &'static str {
        "attach loan"
    }

    async fn forward(&self, state: &mut Checkout) -> error_stack::Result<(), LendingError> {
        state.user = attach_loan(self.0, &state.user_id, state.loan.clone())
            .await
            .during(LendingStep::Loans, borrow_failed)?;
        Ok(())
    }

    async fn compensate(&self, state: &mut Checkout) -> error_stack::Result<(), LendingError> {
        let detached = detach_loan(self.0, &state.user_id, &state.book_id)
            .await
            .during(LendingStep::Loans, borrow_failed)?;
        if let Some((user, _)) = detached {
            state.user = user;
        }
        Ok(())
    }
}

struct OpenRecord<'a, M: ?Sized>(&'a M);

#[async_trait::async_trait]
impl<M> SagaStep<Checkout, LendingError> for OpenRecord<'_, M>
where
    M: BorrowService + ?Sized,
{
    fn name(&self) -> &'static str {
        "open record"
    }

    async fn forward(&self, state: &mut Checkout) -> error_stack::Result<(), LendingError> {
        let ledger = self.0.borrow_record_modifier();
        let id = ledger
            .next_id()
            .await
            .during(LendingStep::Ledger, borrow_failed)?;
        let record = BorrowRecord::open(
            id,
            state.user_id,
            state.book_id,
            *state.loan.borrowed_on(),
            *state.loan.due_date(),
        );
        ledger
            .create(&record)
            .await
            .during(LendingStep::Ledger, borrow_failed)?;
        state.record = Some(record);
        Ok(())
    }
}
