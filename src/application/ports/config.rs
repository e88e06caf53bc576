use crate::domain::errors::{ConfigError, DomainResult};
use serde::{Deserialize, Serialize};

/// Configuration port for accessing application configuration
pub trait ConfigurationPort: Send + Sync {
    /// Get identity-provider connection configuration
    fn get_keycloak_config(&self) -> &KeycloakConfig;

    /// Validate all configuration
    fn validate(&self) -> DomainResult<()>;
}

/// Identity-provider connection configuration.
///
/// Every outbound call needs the protocol/host/port triple plus a realm;
/// `validate` is called before any network call so misconfiguration surfaces
/// as a `Configuration` error instead of a failure deep inside an HTTP call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakConfig {
    pub protocol: String,
    pub host: String,
    pub port: String,
    pub realm: String,
    /// Client used for end-user login and token introspection
    pub client_id: String,
    pub client_secret: String,
    /// Service-account client used for admin operations
    pub admin_client_id: String,
    pub admin_client_secret: String,
}

impl KeycloakConfig {
    pub fn validate(&self) -> DomainResult<()> {
        for (key, value) in [
            ("KEYCLOAK_INTERNAL_PROTOCOL", &self.protocol),
            ("KEYCLOAK_INTERNAL_HOST", &self.host),
            ("KEYCLOAK_INTERNAL_API_PORT", &self.port),
            ("KEYCLOAK_REALM", &self.realm),
            ("KEYCLOAK_CLIENT_ID", &self.client_id),
            ("KEYCLOAK_CLIENT_SECRET", &self.client_secret),
            ("KEYCLOAK_ADMIN_CLIENT_ID", &self.admin_client_id),
            ("KEYCLOAK_ADMIN_CLIENT_SECRET", &self.admin_client_secret),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingRequired {
                    key: key.to_string(),
                }
                .into());
            }
        }

        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidValue {
                key: "KEYCLOAK_INTERNAL_PROTOCOL".to_string(),
                message: "Must be http or https".to_string(),
            }
            .into());
        }

        Ok(())
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url(),
            self.realm
        )
    }

    pub fn introspect_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token/introspect",
            self.base_url(),
            self.realm
        )
    }

    pub fn admin_url(&self, path: &str) -> String {
        format!("{}/admin/realms/{}{}", self.base_url(), self.realm, path)
    }

    pub fn from_env() -> DomainResult<Self> {
        use std::env;

        fn required(key: &str) -> DomainResult<String> {
            env::var(key).map_err(|_| {
                ConfigError::MissingRequired {
                    key: key.to_string(),
                }
                .into()
            })
        }

        let config = Self {
            protocol: required("KEYCLOAK_INTERNAL_PROTOCOL")?,
            host: required("KEYCLOAK_INTERNAL_HOST")?,
            port: required("KEYCLOAK_INTERNAL_API_PORT")?,
            realm: required("KEYCLOAK_REALM")?,
            client_id: required("KEYCLOAK_CLIENT_ID")?,
            client_secret: required("KEYCLOAK_CLIENT_SECRET")?,
            admin_client_id: env::var("KEYCLOAK_ADMIN_CLIENT_ID")
                .unwrap_or_else(|_| "admin-cli".to_string()),
            admin_client_secret: required("KEYCLOAK_ADMIN_CLIENT_SECRET")?,
        };

        config.validate()?;
        Ok(config)
    }
}
