use crate::application::ports::UserDirectory;
use crate::domain::{
    entities::{CreateUserRequest, UpdateUserRequest, User},
    errors::DomainResult,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// User management service implementing business use cases over the directory
pub struct UserManagementService {
    directory: Arc<dyn UserDirectory>,
}

impl UserManagementService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        let users = self.directory.find_all_users().await?;
        info!("Found {} users", users.len());
        Ok(users)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.directory.find_user_by_id(id).await
    }

    /// Create a user and return the fully-populated record
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_user(&self, request: &CreateUserRequest) -> DomainResult<User> {
        request.validate()?;

        let user = self.directory.create_user(request).await?;
        info!(
            "Created user '{}' ({})",
            user.username,
            user.id.as_ref().map(|id| id.as_str()).unwrap_or("unknown")
        );
        Ok(user)
    }

    #[instrument(skip(self, request), fields(user_id = %id))]
    pub async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> DomainResult<()> {
        request.validate()?;
        self.directory.update_user(id, request).await?;
        info!("Updated user '{}'", id);
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &str) -> DomainResult<()> {
        self.directory.delete_user(id).await?;
        info!("Deleted user '{}'", id);
        Ok(())
    }

    #[instrument(skip(self, password), fields(user_id = %id))]
    pub async fn reset_password(&self, id: &str, password: &str) -> DomainResult<()> {
        self.directory.reset_user_password(id, password, false).await
    }
}
