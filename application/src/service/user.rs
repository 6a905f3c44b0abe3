use error_stack::Report;
use time::OffsetDateTime;

use kernel::interface::lock::{AggregateLock, DependOnAggregateLock, LockKey};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier, UserPatch};
use kernel::prelude::entity::{MembershipDate, User, UserEmail, UserId, UserName};
use kernel::KernelError;

use crate::transfer::{CreateUserDto, DeleteUserDto, GetUserDto, UpdateUserDto, UserDto};

#[async_trait::async_trait]
pub trait GetUserService: 'static + Sync + Send + DependOnUserQuery {
    async fn get_user(&self, dto: GetUserDto) -> error_stack::Result<Option<UserDto>, KernelError> {
        let id = UserId::new(dto.id);
        let user = self.user_query().find_by_id(&id).await?;
        Ok(user.map(UserDto::from))
    }

    async fn get_all_users(&self) -> error_stack::Result<Vec<UserDto>, KernelError> {
        let users = self.user_query().find_all().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }
}

impl<T> GetUserService for T where T: DependOnUserQuery {}

#[async_trait::async_trait]
pub trait CreateUserService: 'static + Sync + Send + DependOnUserModifier {
    async fn create_user(&self, dto: CreateUserDto) -> error_stack::Result<UserDto, KernelError> {
        let id = self.user_modifier().next_id().await?;
        let user = User::register(
            id,
            UserName::new(dto.name),
            UserEmail::new(dto.email),
            dto.membership_date.map(MembershipDate::new),
            OffsetDateTime::now_utc(),
        );
        self.user_modifier().create(&user).await?;
        tracing::info!(user_id = id.as_ref(), "user registered");
        Ok(user.into())
    }
}

impl<T> CreateUserService for T where T: DependOnUserModifier {}

#[async_trait::async_trait]
pub trait UpdateUserService:
    'static + Sync + Send + DependOnUserModifier + DependOnAggregateLock
{
    /// Profile fields only; loans change through borrowing and returning.
    async fn update_user(&self, dto: UpdateUserDto) -> error_stack::Result<UserDto, KernelError> {
        let id = UserId::new(dto.id);
        let _guard = self.aggregate_lock().acquire(LockKey::User(id)).await;
        let patch = UserPatch {
            name: Some(UserName::new(dto.name)),
            email: Some(UserEmail::new(dto.email)),
            membership_date: dto.membership_date.map(MembershipDate::new),
            borrowed_books: None,
        };
        let user = self.user_modifier().update(&id, patch).await?;
        Ok(user.into())
    }
}

impl<T> UpdateUserService for T where T: DependOnUserModifier + DependOnAggregateLock {}

#[async_trait::async_trait]
pub trait DeleteUserService:
    'static + Sync + Send + DependOnUserQuery + DependOnUserModifier + DependOnAggregateLock
{
    async fn delete_user(&self, dto: DeleteUserDto) -> error_stack::Result<(), KernelError> {
        let id = UserId::new(dto.id);
        let _guard = self.aggregate_lock().acquire(LockKey::User(id)).await;

        let user = self.user_query().find_by_id(&id).await?.ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("User with ID {} not found", dto.id))
        })?;
        if !user.borrowed_books().is_empty() {
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "User with ID {} still has {} borrowed book(s)",
                dto.id,
                user.borrowed_books().len()
            )));
        }
        self.user_modifier().delete(&id).await?;
        tracing::info!(user_id = dto.id, "user deleted");
        Ok(())
    }
}

impl<T> DeleteUserService for T where
    T: DependOnUserQuery + DependOnUserModifier + DependOnAggregateLock
{
}
