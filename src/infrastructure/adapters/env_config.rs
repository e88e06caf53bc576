use crate::application::ports::{ConfigurationPort, KeycloakConfig};
use crate::domain::errors::DomainResult;

/// Environment-based configuration adapter
pub struct EnvConfigurationAdapter {
    keycloak: KeycloakConfig,
}

impl EnvConfigurationAdapter {
    pub fn new() -> DomainResult<Self> {
        let keycloak = KeycloakConfig::from_env()?;
        Ok(Self { keycloak })
    }
}

impl ConfigurationPort for EnvConfigurationAdapter {
    fn get_keycloak_config(&self) -> &KeycloakConfig {
        &self.keycloak
    }

    fn validate(&self) -> DomainResult<()> {
        self.keycloak.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    // Environment access is process-global, so the missing-key and
    // round-trip cases share one test instead of racing each other.
    #[test]
    fn from_env_reports_missing_keys_then_round_trips() {
        let vars = [
            ("KEYCLOAK_INTERNAL_PROTOCOL", "http"),
            ("KEYCLOAK_INTERNAL_HOST", "keycloak"),
            ("KEYCLOAK_INTERNAL_API_PORT", "8080"),
            ("KEYCLOAK_REALM", "master"),
            ("KEYCLOAK_CLIENT_ID", "app"),
            ("KEYCLOAK_CLIENT_SECRET", "secret"),
            ("KEYCLOAK_ADMIN_CLIENT_SECRET", "admin-secret"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        std::env::remove_var("KEYCLOAK_ADMIN_CLIENT_ID");
        std::env::remove_var("KEYCLOAK_REALM");

        match EnvConfigurationAdapter::new() {
            Err(DomainError::Configuration { message }) => {
                assert!(message.contains("KEYCLOAK_REALM"))
            }
            Err(other) => panic!("Expected Configuration error, got {other:?}"),
            Ok(_) => panic!("Expected Configuration error"),
        }

        std::env::set_var("KEYCLOAK_REALM", "master");
        let adapter = match EnvConfigurationAdapter::new() {
            Ok(adapter) => adapter,
            Err(e) => panic!("Expected adapter, got {e:?}"),
        };
        let config = adapter.get_keycloak_config();
        assert_eq!(config.realm, "master");
        assert_eq!(config.port, "8080");
        // Unset admin client id falls back to the stock CLI client.
        assert_eq!(config.admin_client_id, "admin-cli");
        adapter.validate().unwrap();

        for (key, _) in vars {
            std::env::remove_var(key);
        }
    }
}
