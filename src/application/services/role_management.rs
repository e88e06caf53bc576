use crate::application::ports::UserDirectory;
use crate::domain::{
    entities::{CreateRoleRequest, Role, UpdateRoleRequest},
    errors::DomainResult,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Role management service: role CRUD plus user-role association
pub struct RoleManagementService {
    directory: Arc<dyn UserDirectory>,
}

impl RoleManagementService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> DomainResult<Vec<Role>> {
        let roles = self.directory.find_all_roles().await?;
        info!("Found {} roles", roles.len());
        Ok(roles)
    }

    #[instrument(skip(self), fields(role = %name))]
    pub async fn get_role(&self, name: &str) -> DomainResult<Role> {
        self.directory.find_role_by_name(name).await
    }

    #[instrument(skip(self, request), fields(role = %request.name))]
    pub async fn create_role(&self, request: &CreateRoleRequest) -> DomainResult<Role> {
        request.validate()?;

        let role = self.directory.create_role(request).await?;
        info!("Created role '{}'", role.name);
        Ok(role)
    }

    #[instrument(skip(self, request), fields(role = %name))]
    pub async fn update_role(&self, name: &str, request: &UpdateRoleRequest) -> DomainResult<()> {
        request.validate()?;
        self.directory.update_role(name, request).await?;
        info!("Updated role '{}'", name);
        Ok(())
    }

    #[instrument(skip(self), fields(role = %name))]
    pub async fn delete_role(&self, name: &str) -> DomainResult<()> {
        self.directory.delete_role(name).await?;
        info!("Deleted role '{}'", name);
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id, role = %role_name))]
    pub async fn assign_role(&self, user_id: &str, role_name: &str) -> DomainResult<()> {
        self.directory.assign_role_to_user(user_id, role_name).await
    }

    #[instrument(skip(self), fields(user_id = %user_id, role = %role_name))]
    pub async fn remove_role(&self, user_id: &str, role_name: &str) -> DomainResult<()> {
        self.directory
            .remove_role_from_user(user_id, role_name)
            .await
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn roles_for_user(&self, user_id: &str) -> DomainResult<Vec<Role>> {
        self.directory.find_roles_by_user_id(user_id).await
    }
}
