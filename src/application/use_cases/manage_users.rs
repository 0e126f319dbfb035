use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{CatalogRepository, UserRepository};
use crate::domain::{DomainError, User, UserInput, UserWithWishlist};

pub struct ManageUsersUseCase {
    user_repo: Arc<dyn UserRepository>,
    catalog_repo: Arc<dyn CatalogRepository>,
}

impl ManageUsersUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        catalog_repo: Arc<dyn CatalogRepository>,
    ) -> Self {
        Self {
            user_repo,
            catalog_repo,
        }
    }

    pub async fn create(&self, input: UserInput) -> Result<User, DomainError> {
        let user = input.into_user()?;
        if self.user_repo.find_by_email(user.email()).await?.is_some() {
            return Err(DomainError::already_exists(format!(
                "A user with email {} already exists",
                user.email()
            )));
        }
        self.user_repo.save(&user).await?;
        info!("Created user {}", user.id());
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<UserWithWishlist>, DomainError> {
        let users = self.user_repo.list().await?;
        let mut populated = Vec::with_capacity(users.len());
        for user in &users {
            populated.push(self.populate(user).await?);
        }
        Ok(populated)
    }

    pub async fn get(&self, id: &str) -> Result<UserWithWishlist, DomainError> {
        let user = self.find(id).await?;
        self.populate(&user).await
    }

    pub async fn update(&self, id: &str, input: UserInput) -> Result<User, DomainError> {
        let email = input.email;
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(DomainError::invalid_input("Please provide a valid email."));
            }
        }
        let name = input.name.filter(|n| !n.trim().is_empty());
        let password = input.password.filter(|p| !p.is_empty());

        let user = self
            .user_repo
            .modify(
                id,
                Box::new(move |user: &mut User| {
                    if let Some(email) = email {
                        user.set_email(&email);
                    }
                    if let Some(name) = name {
                        user.set_name(name);
                    }
                    if let Some(password) = password {
                        user.set_password(&password);
                    }
                }),
            )
            .await?
            .ok_or_else(|| user_not_found(id))?;

        info!("Updated user {}", id);
        Ok(user)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        if !self.user_repo.delete(id).await? {
            return Err(user_not_found(id));
        }
        info!("Deleted user {}", id);
        Ok(())
    }

    /// Add the product to the wishlist, or remove it if it is already there.
    pub async fn toggle_wishlist(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> Result<UserWithWishlist, DomainError> {
        if product_id.trim().is_empty() {
            return Err(DomainError::invalid_input("Product ID is required."));
        }
        if self.catalog_repo.find_by_id(product_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Product not found: {}",
                product_id
            )));
        }

        let toggled = product_id.to_string();
        let user = self
            .user_repo
            .modify(
                user_id,
                Box::new(move |user: &mut User| {
                    user.toggle_wishlist(&toggled);
                }),
            )
            .await?
            .ok_or_else(|| user_not_found(user_id))?;
        let added = user.wishlist().iter().any(|p| p == product_id);

        debug!(
            "{} product {} {} wishlist of user {}",
            if added { "Added" } else { "Removed" },
            product_id,
            if added { "to" } else { "from" },
            user_id
        );

        self.populate(&user).await
    }

    async fn find(&self, id: &str) -> Result<User, DomainError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    /// Replace wishlist ids with products; ids of deleted products are skipped.
    async fn populate(&self, user: &User) -> Result<UserWithWishlist, DomainError> {
        let mut products = Vec::with_capacity(user.wishlist().len());
        for product_id in user.wishlist() {
            if let Some(product) = self.catalog_repo.find_by_id(product_id).await? {
                products.push(product);
            }
        }
        Ok(UserWithWishlist::new(user, products))
    }
}

fn user_not_found(id: &str) -> DomainError {
    DomainError::not_found(format!("User not found: {}", id))
}
