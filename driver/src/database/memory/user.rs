use time::OffsetDateTime;

use kernel::interface::query::UserQuery;
use kernel::interface::update::{UserModifier, UserPatch};
use kernel::prelude::entity::{User, UserId};
use kernel::KernelError;

use crate::database::memory::table::Table;
use crate::error::ConvertError;

pub struct MemoryUserRepository {
    table: Table<UserId, User>,
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self {
            table: Table::new("users"),
        }
    }
}

#[async_trait::async_trait]
impl UserQuery for MemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> error_stack::Result<Option<User>, KernelError> {
        Ok(self.table.get(id))
    }

    async fn find_all(&self) -> error_stack::Result<Vec<User>, KernelError> {
        Ok(self.table.all())
    }
}

#[async_trait::async_trait]
impl UserModifier for MemoryUserRepository {
    async fn next_id(&self) -> error_stack::Result<UserId, KernelError> {
        Ok(UserId::new(self.table.next_id()))
    }

    async fn create(&self, user: &User) -> error_stack::Result<(), KernelError> {
        tracing::debug!(user_id = ?user.id(), "insert user");
        self.table.insert(*user.id(), user.clone()).convert_error()
    }

    async fn update(
        &self,
        id: &UserId,
        patch: UserPatch,
    ) -> error_stack::Result<User, KernelError> {
        tracing::debug!(user_id = ?id, "update user");
        self.table
            .modify(id, |user| patch.merge(user, OffsetDateTime::now_utc()))
            .convert_error()
    }

    async fn delete(&self, id: &UserId) -> error_stack::Result<(), KernelError> {
        tracing::debug!(user_id = ?id, "delete user");
        self.table.remove(id).map(|_| ()).convert_error()
    }
}
