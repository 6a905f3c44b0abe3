use std::fmt::Display;

use error_stack::Context;

use crate::entity::{BookId, UserId};

/// Failure kinds raised by stores and other infrastructure behind the kernel traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    Concurrency,
    NotFound,
    Conflict,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::NotFound => write!(f, "Entity not found"),
            KernelError::Conflict => write!(f, "Entity state conflict"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

/// Where in a borrow or return workflow a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LendingStep {
    Lookup,
    Availability,
    Loans,
    Ledger,
}

impl Display for LendingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LendingStep::Lookup => write!(f, "lookup"),
            LendingStep::Availability => write!(f, "book availability"),
            LendingStep::Loans => write!(f, "user loans"),
            LendingStep::Ledger => write!(f, "borrow ledger"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LendingError {
    UserNotFound(UserId),
    BookNotFound(BookId),
    BookUnavailable(BookId),
    AlreadyBorrowed { user_id: UserId, book_id: BookId },
    NotBorrowed { user_id: UserId, book_id: BookId },
    BorrowFailed { step: LendingStep, cause: KernelError },
    ReturnFailed { step: LendingStep, cause: KernelError },
}

impl Display for LendingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LendingError::UserNotFound(id) => write!(f, "User with ID {} not found", id.as_ref()),
            LendingError::BookNotFound(id) => write!(f, "Book with ID {} not found", id.as_ref()),
            LendingError::BookUnavailable(id) => write!(
                f,
                "Book with ID {} is not available for borrowing",
                id.as_ref()
            ),
            LendingError::AlreadyBorrowed { user_id, book_id } => write!(
                f,
                "User with ID {} has already borrowed the book with ID {}",
                user_id.as_ref(),
                book_id.as_ref()
            ),
            LendingError::NotBorrowed { user_id, book_id } => write!(
                f,
                "User with ID {} has not borrowed the book with ID {}",
                user_id.as_ref(),
                book_id.as_ref()
            ),
            LendingError::BorrowFailed { step, cause } => {
                write!(f, "Borrow failed at {step}: {cause}")
            }
            LendingError::ReturnFailed { step, cause } => {
                write!(f, "Return failed at {step}: {cause}")
            }
        }
    }
}

impl Context for LendingError {}
