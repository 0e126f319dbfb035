use std::sync::Arc;

use tracing::{info, warn};

use crate::application::UserRepository;
use crate::domain::{DomainError, User};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthenticateUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl AuthenticateUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = match self.user_repo.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        if !user.verify_password(password) {
            warn!("Login attempt with wrong password for user {}", user.id());
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        info!("User {} logged in", user.id());
        Ok(user)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<User, DomainError> {
        if new_password.is_empty() {
            return Err(DomainError::invalid_input("A new password is required."));
        }

        let id = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?
            .id()
            .to_string();

        let password = new_password.to_string();
        let user = self
            .user_repo
            .modify(&id, Box::new(move |user: &mut User| user.set_password(&password)))
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        info!("Password reset for user {}", user.id());
        Ok(user)
    }
}
