use time::OffsetDateTime;

use kernel::prelude::entity::{DestructLoan, DestructUser, Loan, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanDto {
    pub book_id: i64,
    pub borrowed_on: OffsetDateTime,
    pub due_date: OffsetDateTime,
}

impl From<Loan> for LoanDto {
    fn from(value: Loan) -> Self {
        let DestructLoan {
            book_id,
            borrowed_on,
            due_date,
        } = value.into_destruct();
        Self {
            book_id: book_id.into(),
            borrowed_on: borrowed_on.into(),
            due_date: due_date.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub membership_date: Option<OffsetDateTime>,
    pub borrowed_books: Vec<LoanDto>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl UserDto {
    pub fn has_borrowed(&self, book_id: i64) -> bool {
        self.borrowed_books.iter().any(|loan| loan.book_id == book_id)
    }
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser {
            id,
            name,
            email,
            membership_date,
            borrowed_books,
            created_at,
            updated_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            membership_date: membership_date.map(Into::into),
            borrowed_books: borrowed_books.into_iter().map(LoanDto::from).collect(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

pub struct GetUserDto {
    pub id: i64,
}

pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub membership_date: Option<OffsetDateTime>,
}

pub struct UpdateUserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub membership_date: Option<OffsetDateTime>,
}

pub struct DeleteUserDto {
    pub id: i64,
}
