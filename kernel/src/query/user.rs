use crate::entity::{User, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait UserQuery: Sync + Send + 'static {
    async fn find_by_id(&self, id: &UserId) -> error_stack::Result<Option<User>, KernelError>;
    async fn find_all(&self) -> error_stack::Result<Vec<User>, KernelError>;
}

pub trait DependOnUserQuery: Sync + Send + 'static {
    type UserQuery: UserQuery;
    fn user_query(&self) -> &Self::UserQuery;
}
