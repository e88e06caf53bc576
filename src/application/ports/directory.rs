use crate::application::ports::auth::{TokenBundle, TokenIntrospection};
use crate::domain::{entities::*, errors::DomainResult};
use async_trait::async_trait;

/// Port over the external user directory (identity provider).
///
/// Implementations map provider failures onto the domain taxonomy: 401 on
/// login is `InvalidCredentials`, 404 is `NotFound`, 409 on create is
/// `AlreadyExists`, anything else is `Upstream`.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    // Authentication
    async fn login(&self, username: &str, password: &str) -> DomainResult<TokenBundle>;

    /// Check token validity against the provider. Fails closed: any upstream
    /// failure yields `false`, never an error.
    async fn validate_token(&self, token: &str) -> bool;

    async fn introspect_token(&self, token: &str) -> DomainResult<TokenIntrospection>;

    // User operations
    async fn create_user(&self, request: &CreateUserRequest) -> DomainResult<User>;
    async fn find_all_users(&self) -> DomainResult<Vec<User>>;
    async fn find_user_by_id(&self, id: &str) -> DomainResult<User>;
    async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> DomainResult<()>;
    async fn delete_user(&self, id: &str) -> DomainResult<()>;
    async fn reset_user_password(
        &self,
        id: &str,
        password: &str,
        temporary: bool,
    ) -> DomainResult<()>;

    // Role operations
    async fn create_role(&self, request: &CreateRoleRequest) -> DomainResult<Role>;
    async fn find_all_roles(&self) -> DomainResult<Vec<Role>>;
    async fn find_role_by_name(&self, name: &str) -> DomainResult<Role>;
    async fn update_role(&self, name: &str, request: &UpdateRoleRequest) -> DomainResult<()>;
    async fn delete_role(&self, name: &str) -> DomainResult<()>;

    // Role association
    async fn assign_role_to_user(&self, user_id: &str, role_name: &str) -> DomainResult<()>;
    async fn remove_role_from_user(&self, user_id: &str, role_name: &str) -> DomainResult<()>;
    async fn find_roles_by_user_id(&self, user_id: &str) -> DomainResult<Vec<Role>>;
}
