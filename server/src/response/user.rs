use serde::Serialize;
use time::OffsetDateTime;

use application::transfer::{LoanDto, UserDto};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    book_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    borrowed_on: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    due_date: OffsetDateTime,
}

impl From<LoanDto> for LoanResponse {
    fn from(value: LoanDto) -> Self {
        Self {
            book_id: value.book_id,
            borrowed_on: value.borrowed_on,
            due_date: value.due_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    id: i64,
    name: String,
    email: String,
    #[serde(with = "time::serde::rfc3339::option")]
    membership_date: Option<OffsetDateTime>,
    borrowed_books: Vec<LoanResponse>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<UserDto> for UserResponse {
    fn from(value: UserDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            membership_date: value.membership_date,
            borrowed_books: value
                .borrowed_books
                .into_iter()
                .map(LoanResponse::from)
                .collect(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

pub struct UserPresenter;

impl Exhaust<()> for UserPresenter {
    type To = ();
    fn emit(&self, input: ()) -> Self::To {
        input
    }
}

impl Exhaust<UserDto> for UserPresenter {
    type To = UserResponse;
    fn emit(&self, input: UserDto) -> Self::To {
        input.into()
    }
}

impl Exhaust<Option<UserDto>> for UserPresenter {
    type To = Option<UserResponse>;
    fn emit(&self, input: Option<UserDto>) -> Self::To {
        input.map(UserResponse::from)
    }
}

impl Exhaust<Vec<UserDto>> for UserPresenter {
    type To = Vec<UserResponse>;
    fn emit(&self, input: Vec<UserDto>) -> Self::To {
        input.into_iter().map(UserResponse::from).collect()
    }
}
