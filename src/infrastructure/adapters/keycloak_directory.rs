use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::application::ports::auth::{TokenBundle, TokenIntrospection};
use crate::application::ports::config::KeycloakConfig;
use crate::application::ports::directory::UserDirectory;
use crate::domain::{entities::*, errors::*};

/// Safety buffer subtracted from `expires_in` when caching the admin token,
/// covering clock skew and request latency.
const TOKEN_EXPIRY_BUFFER_SECONDS: i64 = 60;

/// Raw token response from Keycloak
#[derive(Debug, Clone, Deserialize)]
struct RawTokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
    refresh_expires_in: Option<i64>,
    token_type: String,
    scope: Option<String>,
    session_state: Option<String>,
}

/// Wire representation of a Keycloak user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRepresentation {
    id: Option<String>,
    username: Option<String>,
    email: Option<String>,
    email_verified: Option<bool>,
    first_name: Option<String>,
    last_name: Option<String>,
    enabled: Option<bool>,
    created_timestamp: Option<i64>,
}

/// Wire representation of a Keycloak role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleRepresentation {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    composite: Option<bool>,
    client_role: Option<bool>,
    container_id: Option<String>,
}

/// Cached admin bearer token with its absolute expiry
#[derive(Debug, Clone)]
struct AdminToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl AdminToken {
    fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// Keycloak adapter implementing the UserDirectory port.
///
/// Admin-scoped calls authenticate via a service-account token that is cached
/// until shortly before its expiry; the compare-and-refresh sequence runs
/// under a mutex so concurrent cache misses trigger a single refresh.
#[derive(Debug)]
pub struct KeycloakDirectoryAdapter {
    config: KeycloakConfig,
    client: reqwest::Client,
    admin_token: Mutex<Option<AdminToken>>,
}

impl KeycloakDirectoryAdapter {
    /// Build the adapter, validating connection configuration eagerly so a
    /// missing protocol/host/port/realm fails here rather than inside a call.
    pub fn new(config: KeycloakConfig) -> DomainResult<Self> {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: KeycloakConfig, client: reqwest::Client) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            admin_token: Mutex::new(None),
        })
    }

    fn request_error(e: reqwest::Error) -> DomainError {
        DomainError::upstream(
            e.status().map(|s| s.as_u16()),
            format!("HTTP request failed: {e}"),
        )
    }

    async fn upstream_error(response: reqwest::Response) -> DomainError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        DomainError::upstream(Some(status.as_u16()), body)
    }

    /// Return the cached admin token, refreshing it via a client-credentials
    /// grant once the cached expiry has passed. Demand-driven only; there is
    /// no background refresh.
    async fn admin_token(&self) -> DomainResult<String> {
        let mut cache = self.admin_token.lock().await;

        if let Some(token) = cache.as_ref() {
            if token.is_valid() {
                debug!("Using cached admin token");
                return Ok(token.access_token.clone());
            }
        }

        info!("Fetching new admin token");
        let response = self
            .client
            .post(self.config.token_url())
            .form(&[
                ("client_id", self.config.admin_client_id.as_str()),
                ("client_secret", self.config.admin_client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let raw: RawTokenResponse = response.json().await.map_err(|e| {
            DomainError::upstream(None, format!("Failed to parse token response: {e}"))
        })?;

        let token = AdminToken {
            access_token: raw.access_token,
            expires_at: Utc::now()
                + chrono::Duration::seconds(raw.expires_in - TOKEN_EXPIRY_BUFFER_SECONDS),
        };
        let access_token = token.access_token.clone();
        *cache = Some(token);

        Ok(access_token)
    }

    fn convert_user(representation: UserRepresentation) -> DomainResult<User> {
        let username = representation
            .username
            .ok_or_else(|| DomainError::Validation {
                field: "username".to_string(),
                message: "Username missing from provider response".to_string(),
            })?;

        let mut user = User::new(username)?;
        user.id = representation.id.map(EntityId::from_string);
        user.email = representation.email;
        user.email_verified = representation.email_verified.unwrap_or(false);
        user.first_name = representation.first_name;
        user.last_name = representation.last_name;
        user.enabled = representation.enabled.unwrap_or(true);
        user.created_timestamp = representation
            .created_timestamp
            .and_then(DateTime::from_timestamp_millis);

        Ok(user)
    }

    fn convert_role(representation: RoleRepresentation) -> DomainResult<Role> {
        let name = representation.name.ok_or_else(|| DomainError::Validation {
            field: "name".to_string(),
            message: "Role name missing from provider response".to_string(),
        })?;

        let mut role = Role::new(name)?;
        role.id = representation.id.map(EntityId::from_string);
        role.description = representation.description;
        role.composite = representation.composite.unwrap_or(false);
        role.client_role = representation.client_role.unwrap_or(false);
        role.container_id = representation.container_id;

        Ok(role)
    }

    /// Fetch the user's wire representation; Keycloak updates replace the
    /// full record, so patches need the current state.
    async fn fetch_user_representation(&self, id: &str) -> DomainResult<UserRepresentation> {
        let token = self.admin_token().await?;
        let url = self.config.admin_url(&format!("/users/{id}"));

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => response.json().await.map_err(|e| {
                DomainError::upstream(None, format!("Failed to parse user response: {e}"))
            }),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("User", id)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    /// Fetch the role's wire representation; role-mapping calls need the full
    /// record including its id.
    async fn fetch_role_representation(&self, name: &str) -> DomainResult<RoleRepresentation> {
        let token = self.admin_token().await?;
        let url = self.config.admin_url(&format!("/roles/{name}"));

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => response.json().await.map_err(|e| {
                DomainError::upstream(None, format!("Failed to parse role response: {e}"))
            }),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("Role", name)),
            _ => Err(Self::upstream_error(response).await),
        }
    }
}

#[async_trait]
impl UserDirectory for KeycloakDirectoryAdapter {
    async fn login(&self, username: &str, password: &str) -> DomainResult<TokenBundle> {
        info!("Attempting to log in user '{}'", username);

        let response = self
            .client
            .post(self.config.token_url())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => {
                let raw: RawTokenResponse = response.json().await.map_err(|e| {
                    DomainError::upstream(None, format!("Failed to parse token response: {e}"))
                })?;

                info!("Login successful for user '{}'", username);
                Ok(TokenBundle {
                    access_token: raw.access_token,
                    expires_in: raw.expires_in,
                    refresh_token: raw.refresh_token,
                    refresh_expires_in: raw.refresh_expires_in,
                    token_type: raw.token_type,
                    scope: raw.scope,
                    session_state: raw.session_state,
                })
            }
            StatusCode::UNAUTHORIZED => Err(DomainError::InvalidCredentials),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn validate_token(&self, token: &str) -> bool {
        // Fail closed: callers use this as a boolean gate, so any upstream
        // failure maps to "not valid" instead of propagating.
        match self.introspect_token(token).await {
            Ok(introspection) => introspection.active,
            Err(e) => {
                warn!("Token introspection failed, treating token as invalid: {e}");
                false
            }
        }
    }

    async fn introspect_token(&self, token: &str) -> DomainResult<TokenIntrospection> {
        let response = self
            .client
            .post(self.config.introspect_url())
            .form(&[
                ("token", token),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            DomainError::upstream(None, format!("Failed to parse introspection response: {e}"))
        })?;

        Ok(TokenIntrospection {
            active: body.get("active").and_then(|v| v.as_bool()).unwrap_or(false),
            username: body
                .get("username")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            client_id: body
                .get("client_id")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            exp: body.get("exp").and_then(|v| v.as_i64()),
            sub: body.get("sub").and_then(|v| v.as_str()).map(str::to_string),
        })
    }

    async fn create_user(&self, request: &CreateUserRequest) -> DomainResult<User> {
        info!("Attempting to create user '{}'", request.username);
        let token = self.admin_token().await?;
        let url = self.config.admin_url("/users");

        let payload = json!({
            "username": request.username,
            "email": request.email,
            "firstName": request.first_name,
            "lastName": request.last_name,
            "enabled": true,
            "credentials": [{
                "type": "password",
                "value": request.password,
                "temporary": false,
            }],
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => {
                // The create response body is empty; the new resource id only
                // appears in the Location header, so fetch the full record in
                // a second round trip.
                let user_id = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|location| location.rsplit('/').next())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        DomainError::upstream(
                            None,
                            "Create response missing Location header".to_string(),
                        )
                    })?;

                info!("User '{}' created as '{}'", request.username, user_id);
                self.find_user_by_id(&user_id).await
            }
            StatusCode::CONFLICT => Err(DomainError::already_exists("User", &request.username)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn find_all_users(&self) -> DomainResult<Vec<User>> {
        let token = self.admin_token().await?;
        let url = self.config.admin_url("/users");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let representations: Vec<UserRepresentation> = response.json().await.map_err(|e| {
            DomainError::upstream(None, format!("Failed to parse users response: {e}"))
        })?;

        representations.into_iter().map(Self::convert_user).collect()
    }

    async fn find_user_by_id(&self, id: &str) -> DomainResult<User> {
        let representation = self.fetch_user_representation(id).await?;
        Self::convert_user(representation)
    }

    async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> DomainResult<()> {
        // Keycloak expects the full representation on update, so merge the
        // patch over the current record.
        let current = self.fetch_user_representation(id).await?;
        let token = self.admin_token().await?;
        let url = self.config.admin_url(&format!("/users/{id}"));

        let payload = UserRepresentation {
            id: current.id,
            username: current.username,
            email: request.email.clone().or(current.email),
            email_verified: current.email_verified,
            first_name: request.first_name.clone().or(current.first_name),
            last_name: request.last_name.clone().or(current.last_name),
            enabled: request.enabled.or(current.enabled),
            created_timestamp: current.created_timestamp,
        };

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("User", id)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let token = self.admin_token().await?;
        let url = self.config.admin_url(&format!("/users/{id}"));

        let response = self
            .client
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("User", id)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn reset_user_password(
        &self,
        id: &str,
        password: &str,
        temporary: bool,
    ) -> DomainResult<()> {
        let token = self.admin_token().await?;
        let url = self.config.admin_url(&format!("/users/{id}/reset-password"));

        let payload = json!({
            "type": "password",
            "value": password,
            "temporary": temporary,
        });

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("User", id)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn create_role(&self, request: &CreateRoleRequest) -> DomainResult<Role> {
        info!("Attempting to create role '{}'", request.name);
        let token = self.admin_token().await?;
        let url = self.config.admin_url("/roles");

        let payload = json!({
            "name": request.name,
            "description": request.description.clone().unwrap_or_default(),
            "composite": request.composite.unwrap_or(false),
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            // Role creation also returns an empty body; re-fetch by name,
            // which is unique within the realm.
            s if s.is_success() => self.find_role_by_name(&request.name).await,
            StatusCode::CONFLICT => Err(DomainError::already_exists("Role", &request.name)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn find_all_roles(&self) -> DomainResult<Vec<Role>> {
        let token = self.admin_token().await?;
        let url = self.config.admin_url("/roles");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let representations: Vec<RoleRepresentation> = response.json().await.map_err(|e| {
            DomainError::upstream(None, format!("Failed to parse roles response: {e}"))
        })?;

        representations.into_iter().map(Self::convert_role).collect()
    }

    async fn find_role_by_name(&self, name: &str) -> DomainResult<Role> {
        let representation = self.fetch_role_representation(name).await?;
        Self::convert_role(representation)
    }

    async fn update_role(&self, name: &str, request: &UpdateRoleRequest) -> DomainResult<()> {
        // Keycloak expects the full representation on update, so merge the
        // patch over the current record.
        let current = self.fetch_role_representation(name).await?;
        let token = self.admin_token().await?;
        let url = self.config.admin_url(&format!("/roles/{name}"));

        let payload = RoleRepresentation {
            id: current.id,
            name: request.name.clone().or(current.name),
            description: request.description.clone().or(current.description),
            composite: request.composite.or(current.composite),
            client_role: current.client_role,
            container_id: current.container_id,
        };

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("Role", name)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn delete_role(&self, name: &str) -> DomainResult<()> {
        let token = self.admin_token().await?;
        let url = self.config.admin_url(&format!("/roles/{name}"));

        let response = self
            .client
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("Role", name)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn assign_role_to_user(&self, user_id: &str, role_name: &str) -> DomainResult<()> {
        let role = self.fetch_role_representation(role_name).await?;
        let token = self.admin_token().await?;
        let url = self
            .config
            .admin_url(&format!("/users/{user_id}/role-mappings/realm"));

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&vec![role])
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("User", user_id)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn remove_role_from_user(&self, user_id: &str, role_name: &str) -> DomainResult<()> {
        let role = self.fetch_role_representation(role_name).await?;
        let token = self.admin_token().await?;
        let url = self
            .config
            .admin_url(&format!("/users/{user_id}/role-mappings/realm"));

        let response = self
            .client
            .delete(url)
            .bearer_auth(token)
            .json(&vec![role])
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DomainError::not_found("User", user_id)),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn find_roles_by_user_id(&self, user_id: &str) -> DomainResult<Vec<Role>> {
        let token = self.admin_token().await?;
        let url = self
            .config
            .admin_url(&format!("/users/{user_id}/role-mappings/realm"));

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::request_error)?;

        match response.status() {
            s if s.is_success() => {
                let representations: Vec<RoleRepresentation> =
                    response.json().await.map_err(|e| {
                        DomainError::upstream(
                            None,
                            format!("Failed to parse role mappings response: {e}"),
                        )
                    })?;
                representations.into_iter().map(Self::convert_role).collect()
            }
            StatusCode::NOT_FOUND => Err(DomainError::not_found("User", user_id)),
            _ => Err(Self::upstream_error(response).await),
        }
    }
}
