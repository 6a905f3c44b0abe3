//! Borrowing and returning, the two workflows that touch all three
//! aggregates at once.
//!
//! Both run under the book lock and the user lock for their whole duration
//! and change the aggregates through a [`Saga`](crate::saga::Saga), in the
//! order book copies, user loans, ledger.

use error_stack::Report;

use kernel::interface::query::{BookQuery, DependOnBookQuery, DependOnUserQuery, UserQuery};
use kernel::interface::update::{
    BookModifier, BookPatch, DependOnBookModifier, DependOnUserModifier, UserModifier, UserPatch,
};
use kernel::prelude::entity::{Book, BookId, CopiesAvailable, Loan, User, UserId};
use kernel::{KernelError, LendingError, LendingStep};

use crate::saga::SagaFailure;

pub use self::{checkin::*, checkout::*};

mod checkin;
mod checkout;

type Failed = fn(LendingStep, KernelError) -> LendingError;

fn borrow_failed(step: LendingStep, cause: KernelError) -> LendingError {
    LendingError::BorrowFailed { step, cause }
}

fn return_failed(step: LendingStep, cause: KernelError) -> LendingError {
    LendingError::ReturnFailed { step, cause }
}

trait During<T> {
    /// Wraps a store failure into the workflow error for `step`, keeping the
    /// store's error kind as the cause.
    fn during(self, step: LendingStep, failed: Failed) -> error_stack::Result<T, LendingError>;
}

impl<T> During<T> for error_stack::Result<T, KernelError> {
    fn during(self, step: LendingStep, failed: Failed) -> error_stack::Result<T, LendingError> {
        self.map_err(|report| {
            let cause = *report.current_context();
            report.change_context(failed(step, cause))
        })
    }
}

fn settle(failure: SagaFailure<LendingError>) -> Report<LendingError> {
    let SagaFailure {
        step,
        report,
        compensated,
    } = failure;
    if compensated {
        return report;
    }
    tracing::error!(
        step,
        error = %report,
        "compensation incomplete, aggregates may disagree until repaired"
    );
    report.attach_printable(format!(
        "compensation after the failed `{step}` step did not complete"
    ))
}

async fn load_book<M>(module: &M, id: &BookId) -> error_stack::Result<Book, KernelError>
where
    M: DependOnBookQuery + ?Sized,
{
    module.book_query().find_by_id(id).await?.ok_or_else(|| {
        Report::new(KernelError::NotFound)
            .attach_printable(format!("Book with ID {} disappeared", id.as_ref()))
    })
}

async fn load_user<M>(module: &M, id: &UserId) -> error_stack::Result<User, KernelError>
where
    M: DependOnUserQuery + ?Sized,
{
    module.user_query().find_by_id(id).await?.ok_or_else(|| {
        Report::new(KernelError::NotFound)
            .attach_printable(format!("User with ID {} disappeared", id.as_ref()))
    })
}

/// Takes one copy off the shelf, re-reading the book first.
async fn reserve_copy<M>(module: &M, id: &BookId) -> error_stack::Result<Book, KernelError>
where
    M: DependOnBookQuery + DependOnBookModifier + ?Sized,
{
    let book = load_book(module, id).await?;
    let Some(copies) = book.copies_available().checked_decrement() else {
        return Err(Report::new(KernelError::Concurrency)
            .attach_printable(format!("Book with ID {} has no copy left", id.as_ref())));
    };
    adjust_copies(module, id, copies).await
}

/// Puts one copy back on the shelf. May pass `total_copies` for the duration
/// of a return that turns out to be invalid; compensation brings it back.
async fn release_copy<M>(module: &M, id: &BookId) -> error_stack::Result<Book, KernelError>
where
    M: DependOnBookQuery + DependOnBookModifier + ?Sized,
{
    let book = load_book(module, id).await?;
    adjust_copies(module, id, book.copies_available().increment()).await
}

async fn adjust_copies<M>(
    module: &M,
    id: &BookId,
    copies: CopiesAvailable,
) -> error_stack::Result<Book, KernelError>
where
    M: DependOnBookModifier + ?Sized,
{
    module
        .book_modifier()
        .update(id, BookPatch::copies_available(copies))
        .await
}

async fn attach_loan<M>(
    module: &M,
    id: &UserId,
    loan: Loan,
) -> error_stack::Result<User, KernelError>
where
    M: DependOnUserQuery + DependOnUserModifier + ?Sized,
{
    let user = load_user(module, id).await?;
    let mut loans = user.borrowed_books().clone();
    let book_id = *loan.book_id();
    if !loans.attach(loan) {
        return Err(Report::new(KernelError::Conflict).attach_printable(format!(
            "User with ID {} already holds book {}",
            id.as_ref(),
            book_id.as_ref()
        )));
    }
    module
        .user_modifier()
        .update(id, UserPatch::borrowed_books(loans))
        .await
}

/// `None` when the user holds no loan for `book_id`; nothing is written then.
async fn detach_loan<M>(
    module: &M,
    id: &UserId,
    book_id: &BookId,
) -> error_stack::Result<Option<(User, Loan)>, KernelError>
where
    M: DependOnUserQuery + DependOnUserModifier + ?Sized,
{
    let user = load_user(module, id).await?;
    let mut loans = user.borrowed_books().clone();
    let Some(loan) = loans.detach(book_id) else {
        return Ok(None);
    };
    let user = module
        .user_modifier()
        .update(id, UserPatch::borrowed_books(loans))
        .await?;
    Ok(Some((user, loan)))
}
