use error_stack::Report;
use time::OffsetDateTime;

use kernel::interface::lock::{AggregateLock, DependOnAggregateLock, LockKey};
use kernel::interface::query::{
    BookQuery, BorrowRecordQuery, DependOnBookQuery, DependOnBorrowRecordQuery,
    DependOnUserQuery, UserQuery,
};
use kernel::interface::update::{
    BorrowRecordModifier, BorrowRecordPatch, DependOnBookModifier, DependOnBorrowRecordModifier,
    DependOnUserModifier,
};
use kernel::prelude::entity::{Book, BookId, BorrowRecord, Loan, ReturnedAt, User, UserId};
use kernel::{KernelError, LendingError, LendingStep};

use super::{
    attach_loan, detach_loan, release_copy, reserve_copy, return_failed, settle, During,
};
use crate::saga::{Saga, SagaStep};
use crate::service::ConsistencyService;
use crate::transfer::{InconsistencyReason, LedgerInconsistency, LendingDto, ReturnOutcome};

#[async_trait::async_trait]
pub trait ReturnService:
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
    /// Takes a copy back from the user.
    ///
    /// Once the copy is back on the shelf and the loan is gone the return
    /// stands, even if the ledger record cannot be closed. That case is
    /// reported through [`ReturnOutcome::inconsistency`] instead of an error.
    async fn return_book(&self, dto: LendingDto) -> error_stack::Result<ReturnOutcome, LendingError> {
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let _guards = self
            .aggregate_lock()
            .acquire_all(vec![LockKey::Book(book_id), LockKey::User(user_id)])
            .await;

        let outcome = checkin(self, user_id, book_id).await;
        if cfg!(debug_assertions) {
            self.audit_lending(&user_id, &book_id).await;
        }
        match &outcome {
            Ok(outcome) => tracing::info!(
                user_id = dto.user_id,
                book_id = dto.book_id,
                inconsistent = outcome.inconsistency.is_some(),
                "book returned"
            ),
            Err(report) => tracing::debug!(
                user_id = dto.user_id,
                book_id = dto.book_id,
                error = %report,
                "return rejected"
            ),
        }
        outcome
    }
}

impl<T> ReturnService for T where
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

struct Checkin {
    user_id: UserId,
    book_id: BookId,
    returned_at: ReturnedAt,
    user: User,
    book: Book,
    loan: Option<Loan>,
    record: Option<BorrowRecord>,
    inconsistency: Option<LedgerInconsistency>,
}

async fn checkin<M>(
    module: &M,
    user_id: UserId,
    book_id: BookId,
) -> error_stack::Result<ReturnOutcome, LendingError>
where
    M: ReturnService + ?Sized,
{
    let Some(user) = module
        .user_query()
        .find_by_id(&user_id)
        .await
        .during(LendingStep::Lookup, return_failed)?
    else {
        return Err(Report::new(LendingError::UserNotFound(user_id)));
    };
    let Some(book) = module
        .book_query()
        .find_by_id(&book_id)
        .await
        .during(LendingStep::Lookup, return_failed)?
    else {
        return Err(Report::new(LendingError::BookNotFound(book_id)));
    };

    let state = Checkin {
        user_id,
        book_id,
        returned_at: ReturnedAt::new(OffsetDateTime::now_utc()),
        user,
        book,
        loan: None,
        record: None,
        inconsistency: None,
    };
    let saga = Saga::new("return")
        .step(ReleaseCopy(module))
        .step(DetachLoan(module))
        .step(CloseRecord(module));
    let state = saga.execute(state).await.map_err(settle)?;

    Ok(ReturnOutcome {
        user: state.user.into(),
        book: state.book.into(),
        borrow_record: state.record.map(Into::into),
        inconsistency: state.inconsistency,
    })
}

struct ReleaseCopy<'a, M: ?Sized>(&'a M);

#[async_trait::async_trait]
impl<M> SagaStep<Checkin, LendingError> for ReleaseCopy<'_, M>
where
    M: ReturnService + ?Sized,
{
    fn name(&self) -> &'static str {
        "release copy"
    }

    async fn forward(&self, state: &mut Checkin) -> error_stack::Result<(), LendingError> {
        state.book = release_copy(self.0, &state.book_id)
            .await
            .during(LendingStep::Availability, return_failed)?;
        Ok(())
    }

    async fn compensate(&self, state: &mut Checkin) -> error_stack::Result<(), LendingError> {
        state.book = reserve_copy(self.0, &state.book_id)
            .await
            .during(LendingStep::Availability, return_failed)?;
        Ok(())
    }
}

struct DetachLoan<'a, M: ?Sized>(&'a M);

#[async_trait::async_trait]
impl<M> SagaStep<Checkin, LendingError> for DetachLoan<'_, M>
where
    M: ReturnService + ?Sized,
{
    fn name(&self) -> &'static str {
        "detach loan"
    }

    async fn forward(&self, state: &mut Checkin) -> error_stack::Result<(), LendingError> {
        let detached = detach_loan(self.0, &state.user_id, &state.book_id)
            .await
            .during(LendingStep::Loans, return_failed)?;
        let Some((user, loan)) = detached else {
            return Err(Report::new(LendingError::NotBorrowed {
                user_id: state.user_id,
                book_id: state.book_id,
            }));
        };
        state.user = user;
        state.loan = Some(loan);
        Ok(())
    }

    async fn compensate(&self, state: &mut Checkin) -> error_stack::Result<(), LendingError> {
        let Some(loan) = state.loan.take() else {
            return Ok(());
        };
        state.user = attach_loan(self.0, &state.user_id, loan)
            .await
            .during(LendingStep::Loans, return_failed)?;
        Ok(())
    }
}

/// Closes the open ledger record. Never fails the saga: a missing record or
/// a failed write is kept as an inconsistency on the outcome.
struct CloseRecord<'a, M: ?Sized>(&'a M);

#[async_trait::async_trait]
impl<M> SagaStep<Checkin, LendingError> for CloseRecord<'_, M>
where
    M: ReturnService + ?Sized,
{
    fn name(&self) -> &'static str {
        "close record"
    }

    async fn forward(&self, state: &mut Checkin) -> error_stack::Result<(), LendingError> {
        let reason = match close_record(self.0, state).await {
            Ok(Some(record)) => {
                state.record = Some(record);
                return Ok(());
            }
            Ok(None) => {
                tracing::warn!(
                    user_id = state.user_id.as_ref(),
                    book_id = state.book_id.as_ref(),
                    "loan returned without an open borrow record"
                );
                InconsistencyReason::MissingOpenRecord
            }
            Err(report) => {
                tracing::warn!(
                    user_id = state.user_id.as_ref(),
                    book_id = state.book_id.as_ref(),
                    error = ?report,
                    "borrow record could not be closed"
                );
                InconsistencyReason::WriteFailed(*report.current_context())
            }
        };
        state.inconsistency = Some(LedgerInconsistency {
            user_id: *state.user_id.as_ref(),
            book_id: *state.book_id.as_ref(),
            reason,
        });
        Ok(())
    }
}

async fn close_record<M>(
    module: &M,
    state: &Checkin,
) -> error_stack::Result<Option<BorrowRecord>, KernelError>
where
    M: DependOnBorrowRecordQuery + DependOnBorrowRecordModifier + ?Sized,
{
    let open = module
        .borrow_record_query()
        .find_open(&state.user_id, &state.book_id)
        .await?;
    let Some(open) = open else {
        return Ok(None);
    };
    let closed = module
        .borrow_record_modifier()
        .update(open.id(), BorrowRecordPatch::returned(state.returned_at))
        .await?;
    Ok(Some(closed))
}
