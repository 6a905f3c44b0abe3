use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use serde_json::json;

use kernel::{KernelError, LendingError};

use crate::request::FieldError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub enum ErrorStatus {
    Kernel(Report<KernelError>),
    Lending(Report<LendingError>),
    NotFound(String),
    Invalid(Vec<FieldError>),
}

impl ErrorStatus {
    pub fn not_found(message: impl Into<String>) -> Self {
        ErrorStatus::NotFound(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ErrorStatus::Kernel(report) => match report.current_context() {
                KernelError::NotFound => StatusCode::NOT_FOUND,
                KernelError::Conflict | KernelError::Concurrency => StatusCode::CONFLICT,
                KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ErrorStatus::Lending(report) => match report.current_context() {
                LendingError::UserNotFound(_) | LendingError::BookNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                LendingError::BookUnavailable(_)
                | LendingError::AlreadyBorrowed { .. }
                | LendingError::NotBorrowed { .. } => StatusCode::BAD_REQUEST,
                LendingError::BorrowFailed { .. } | LendingError::ReturnFailed { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ErrorStatus::NotFound(_) => StatusCode::NOT_FOUND,
            ErrorStatus::Invalid(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing text. Store errors prefer the latest printable
    /// attachment since their contexts are generic.
    fn message(&self) -> String {
        match self {
            ErrorStatus::Kernel(report) => report
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| {
                    report
                        .downcast_ref::<&'static str>()
                        .map(|text| text.to_string())
                })
                .unwrap_or_else(|| report.current_context().to_string()),
            ErrorStatus::Lending(report) => report.current_context().to_string(),
            ErrorStatus::NotFound(message) => message.clone(),
            ErrorStatus::Invalid(_) => "Validation failed".to_string(),
        }
    }
}

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus::Kernel(e)
    }
}

impl From<Report<LendingError>> for ErrorStatus {
    fn from(e: Report<LendingError>) -> Self {
        ErrorStatus::Lending(e)
    }
}

impl From<Vec<FieldError>> for ErrorStatus {
    fn from(errors: Vec<FieldError>) -> Self {
        ErrorStatus::Invalid(errors)
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                ErrorStatus::Kernel(report) => tracing::error!(error = ?report, "request failed"),
                ErrorStatus::Lending(report) => tracing::error!(error = ?report, "request failed"),
                _ => {}
            }
        }
        let body = match self {
            ErrorStatus::Invalid(errors) => json!({ "success": false, "errors": errors }),
            other => json!({ "success": false, "message": other.message() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use error_stack::Report;

    use kernel::prelude::entity::{BookId, UserId};
    use kernel::{KernelError, LendingError, LendingStep};

    use super::ErrorStatus;
    use crate::request::FieldError;

    #[test]
    fn lending_errors_map_to_statuses() {
        let user_id = UserId::new(1);
        let book_id = BookId::new(2);
        let cases = [
            (LendingError::UserNotFound(user_id), StatusCode::NOT_FOUND),
            (LendingError::BookNotFound(book_id), StatusCode::NOT_FOUND),
            (LendingError::BookUnavailable(book_id), StatusCode::BAD_REQUEST),
            (
                LendingError::AlreadyBorrowed { user_id, book_id },
                StatusCode::BAD_REQUEST,
            ),
            (
                LendingError::NotBorrowed { user_id, book_id },
                StatusCode::BAD_REQUEST,
            ),
            (
                LendingError::BorrowFailed {
                    step: LendingStep::Ledger,
                    cause: KernelError::Internal,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LendingError::ReturnFailed {
                    step: LendingStep::Loans,
                    cause: KernelError::Concurrency,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ErrorStatus::from(Report::new(error)).status(), status);
        }
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (KernelError::NotFound, StatusCode::NOT_FOUND),
            (KernelError::Conflict, StatusCode::CONFLICT),
            (KernelError::Concurrency, StatusCode::CONFLICT),
            (KernelError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ErrorStatus::from(Report::new(error)).status(), status);
        }
        let invalid = ErrorStatus::from(vec![FieldError::new("title", "title is required")]);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_messages_prefer_attachments() {
        let plain = ErrorStatus::from(Report::new(KernelError::Conflict));
        assert_eq!(plain.message(), "Entity state conflict");

        let explained = ErrorStatus::from(
            Report::new(KernelError::NotFound)
                .attach_printable("Book with ID 9 not found".to_string()),
        );
        assert_eq!(explained.message(), "Book with ID 9 not found");

        let lending = ErrorStatus::from(Report::new(LendingError::BookUnavailable(BookId::new(3))));
        assert_eq!(
            lending.message(),
            "Book with ID 3 is not available for borrowing"
        );
    }
}
