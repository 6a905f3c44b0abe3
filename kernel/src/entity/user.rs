mod id;
mod loans;
mod profile;

pub use self::{id::*, loans::*, profile::*};
use crate::entity::common::{CreatedAt, UpdatedAt};
use destructure::Destructure;
use time::OffsetDateTime;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct User {
    id: UserId,
    name: UserName,
    email: UserEmail,
    membership_date: Option<MembershipDate>,
    borrowed_books: BorrowedBooks,
    created_at: CreatedAt<User>,
    updated_at: UpdatedAt<User>,
}

impl User {
    pub fn new(
        id: UserId,
        name: UserName,
        email: UserEmail,
        membership_date: Option<MembershipDate>,
        borrowed_books: BorrowedBooks,
        created_at: CreatedAt<User>,
        updated_at: UpdatedAt<User>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            membership_date,
            borrowed_books,
            created_at,
            updated_at,
        }
    }

    pub fn register(
        id: UserId,
        name: UserName,
        email: UserEmail,
        membership_date: Option<MembershipDate>,
        now: OffsetDateTime,
    ) -> Self {
        Self::new(
            id,
            name,
            email,
            membership_date,
            BorrowedBooks::default(),
            CreatedAt::new(now),
            UpdatedAt::new(now),
        )
    }
}
