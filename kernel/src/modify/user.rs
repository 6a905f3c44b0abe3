use time::OffsetDateTime;

use crate::entity::{BorrowedBooks, MembershipDate, UpdatedAt, User, UserEmail, UserId, UserName};
use crate::KernelError;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UserPatch {
    pub name: Option<UserName>,
    pub email: Option<UserEmail>,
    pub membership_date: Option<MembershipDate>,
    pub borrowed_books: Option<BorrowedBooks>,
}

impl UserPatch {
    pub fn borrowed_books(books: BorrowedBooks) -> Self {
        Self {
            borrowed_books: Some(books),
            ..Default::default()
        }
    }

    pub fn merge(self, user: User, now: OffsetDateTime) -> User {
        let mut user = user.into_destruct();
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(membership_date) = self.membership_date {
            user.membership_date = Some(membership_date);
        }
        if let Some(borrowed_books) = self.borrowed_books {
            user.borrowed_books = borrowed_books;
        }
        user.updated_at = UpdatedAt::new(now);
        user.freeze()
    }
}

#[async_trait::async_trait]
pub trait UserModifier: 'static + Sync + Send {
    async fn next_id(&self) -> error_stack::Result<UserId, KernelError>;
    async fn create(&self, user: &User) -> error_stack::Result<(), KernelError>;
    async fn update(&self, id: &UserId, patch: UserPatch)
        -> error_stack::Result<User, KernelError>;
    async fn delete(&self, id: &UserId) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnUserModifier: 'static + Sync + Send {
    type UserModifier: UserModifier;
    fn user_modifier(&self) -> &Self::UserModifier;
}
