use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use admin_domain::{
    application::ports::{
        auth::{TokenBundle, TokenIntrospection},
        directory::UserDirectory,
    },
    domain::{entities::*, errors::*},
};

/// Mock user directory for service tests
pub struct MockUserDirectory {
    pub users: Arc<Mutex<HashMap<String, User>>>,
    pub roles: Arc<Mutex<HashMap<String, Role>>>,
    pub user_roles: Arc<Mutex<HashMap<String, Vec<String>>>>, // user id -> role names
    pub valid_tokens: Arc<Mutex<Vec<String>>>,
    pub user_counter: Arc<Mutex<u32>>,
    pub should_fail: Arc<Mutex<bool>>, // For testing error scenarios
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            roles: Arc::new(Mutex::new(HashMap::new())),
            user_roles: Arc::new(Mutex::new(HashMap::new())),
            valid_tokens: Arc::new(Mutex::new(Vec::new())),
            user_counter: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    fn check_should_fail(&self) -> DomainResult<()> {
        if *self.should_fail.lock().unwrap() {
            Err(DomainError::upstream(Some(500), "Mock failure enabled"))
        } else {
            Ok(())
        }
    }

    fn generate_user_id(&self) -> String {
        let mut counter = self.user_counter.lock().unwrap();
        *counter += 1;
        format!("user-{}", counter)
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn login(&self, username: &str, password: &str) -> DomainResult<TokenBundle> {
        self.check_should_fail()?;

        if password == "wrong" {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(TokenBundle {
            access_token: format!("token-{username}"),
            expires_in: 300,
            refresh_token: None,
            refresh_expires_in: None,
            token_type: "Bearer".to_string(),
            scope: None,
            session_state: None,
        })
    }

    async fn validate_token(&self, token: &str) -> bool {
        if *self.should_fail.lock().unwrap() {
            return false;
        }
        self.valid_tokens.lock().unwrap().iter().any(|t| t == token)
    }

    async fn introspect_token(&self, token: &str) -> DomainResult<TokenIntrospection> {
        self.check_should_fail()?;
        Ok(TokenIntrospection {
            active: self.validate_token(token).await,
            username: None,
            client_id: None,
            exp: None,
            sub: None,
        })
    }

    async fn create_user(&self, request: &CreateUserRequest) -> DomainResult<User> {
        self.check_should_fail()?;

        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == request.username) {
            return Err(DomainError::already_exists("User", &request.username));
        }

        let mut user = User::new(request.username.clone())?;
        user.id = Some(EntityId::from_string(self.generate_user_id()));
        user.email = request.email.clone();
        user.first_name = request.first_name.clone();
        user.last_name = request.last_name.clone();

        let id = user.id.as_ref().unwrap().to_string();
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_all_users(&self) -> DomainResult<Vec<User>> {
        self.check_should_fail()?;
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn find_user_by_id(&self, id: &str) -> DomainResult<User> {
        self.check_should_fail()?;
        self.users
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> DomainResult<()> {
        self.check_should_fail()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("User", id))?;

        if let Some(ref email) = request.email {
            user.email = Some(email.clone());
        }
        if let Some(ref first_name) = request.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(ref last_name) = request.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(enabled) = request.enabled {
            user.enabled = enabled;
        }
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        self.check_should_fail()?;
        self.users
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn reset_user_password(
        &self,
        id: &str,
        _password: &str,
        _temporary: bool,
    ) -> DomainResult<()> {
        self.check_should_fail()?;
        if self.users.lock().unwrap().contains_key(id) {
            Ok(())
        } else {
            Err(DomainError::not_found("User", id))
        }
    }

    async fn create_role(&self, request: &CreateRoleRequest) -> DomainResult<Role> {
        self.check_should_fail()?;

        let mut roles = self.roles.lock().unwrap();
        if roles.contains_key(&request.name) {
            return Err(DomainError::already_exists("Role", &request.name));
        }

        let mut role = Role::new(request.name.clone())?;
        role.id = Some(EntityId::new());
        role.description = request.description.clone();
        role.composite = request.composite.unwrap_or(false);

        roles.insert(role.name.clone(), role.clone());
        Ok(role)
    }

    async fn find_all_roles(&self) -> DomainResult<Vec<Role>> {
        self.check_should_fail()?;
        Ok(self.roles.lock().unwrap().values().cloned().collect())
    }

    async fn find_role_by_name(&self, name: &str) -> DomainResult<Role> {
        self.check_should_fail()?;
        self.roles
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Role", name))
    }

    async fn update_role(&self, name: &str, request: &UpdateRoleRequest) -> DomainResult<()> {
        self.check_should_fail()?;
        let mut roles = self.roles.lock().unwrap();
        let role = roles
            .get_mut(name)
            .ok_or_else(|| DomainError::not_found("Role", name))?;

        if let Some(ref new_name) = request.name {
            role.name = new_name.clone();
        }
        if let Some(ref description) = request.description {
            role.description = Some(description.clone());
        }
        if let Some(composite) = request.composite {
            role.composite = composite;
        }
        Ok(())
    }

    async fn delete_role(&self, name: &str) -> DomainResult<()> {
        self.check_should_fail()?;
        self.roles
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Role", name))
    }

    async fn assign_role_to_user(&self, user_id: &str, role_name: &str) -> DomainResult<()> {
        self.check_should_fail()?;
        self.find_role_by_name(role_name).await?;
        self.find_user_by_id(user_id).await?;

        self.user_roles
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(role_name.to_string());
        Ok(())
    }

    async fn remove_role_from_user(&self, user_id: &str, role_name: &str) -> DomainResult<()> {
        self.check_should_fail()?;
        let mut user_roles = self.user_roles.lock().unwrap();
        let roles = user_roles
            .get_mut(user_id)
            .ok_or_else(|| DomainError::not_found("User", user_id))?;
        roles.retain(|r| r != role_name);
        Ok(())
    }

    async fn find_roles_by_user_id(&self, user_id: &str) -> DomainResult<Vec<Role>> {
        self.check_should_fail()?;
        let names = self
            .user_roles
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default();

        let roles = self.roles.lock().unwrap();
        Ok(names.iter().filter_map(|n| roles.get(n).cloned()).collect())
    }
}
