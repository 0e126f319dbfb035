use async_trait::async_trait;

use crate::domain::{DomainError, User};

/// In-place change applied by [`UserRepository::modify`].
pub type UserMutation = Box<dyn FnOnce(&mut User) + Send>;

/// Persistence for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or replace. Fails with `AlreadyExists` when another user owns the email.
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Load, change and store one user while holding the store lock, so
    /// concurrent changes to the same user are applied one after the other.
    ///
    /// Returns the stored user, or `None` when the id is unknown. The email
    /// uniqueness rule of [`save`](Self::save) still applies.
    async fn modify(&self, id: &str, change: UserMutation) -> Result<Option<User>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Returns `false` when the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
}
