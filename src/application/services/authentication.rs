use crate::application::ports::{TokenBundle, UserDirectory};
use crate::domain::errors::{DomainError, DomainResult};
use std::sync::Arc;
use tracing::{info, instrument};

/// Authentication service implementing the login and token-check use cases
pub struct AuthenticationService {
    directory: Arc<dyn UserDirectory>,
}

impl AuthenticationService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Exchange end-user credentials for a token bundle
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<TokenBundle> {
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::Validation {
                field: "credentials".to_string(),
                message: "Username and password are required".to_string(),
            });
        }

        info!("Logging in user '{}'", username);
        self.directory.login(username, password).await
    }

    /// Boolean gate over token introspection; never fails
    #[instrument(skip(self, token))]
    pub async fn validate_token(&self, token: &str) -> bool {
        self.directory.validate_token(token).await
    }
}
