use super::common::*;
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain entity representing a directory user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<EntityId>,
    pub username: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: bool,
    pub created_timestamp: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with required fields
    pub fn new(username: String) -> DomainResult<Self> {
        Self::validate_username(&username)?;

        Ok(Self {
            id: None,
            username,
            email: None,
            email_verified: false,
            first_name: None,
            last_name: None,
            enabled: true,
            created_timestamp: None,
        })
    }

    /// Validate username according to business rules
    pub fn validate_username(username: &str) -> DomainResult<()> {
        if username.is_empty() {
            return Err(DomainError::Validation {
                field: "username".to_string(),
                message: "Username cannot be empty".to_string(),
            });
        }

        if username.len() > 100 {
            return Err(DomainError::Validation {
                field: "username".to_string(),
                message: "Username cannot exceed 100 characters".to_string(),
            });
        }

        Ok(())
    }

    /// Validate email address
    pub fn validate_email(email: &str) -> DomainResult<()> {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.')
        {
            return Err(DomainError::Validation {
                field: "email".to_string(),
                message: format!("Invalid email address: {email}"),
            });
        }

        Ok(())
    }
}

/// Request to create a new user in the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> DomainResult<()> {
        User::validate_username(&self.username)?;

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password".to_string(),
                message: "Password cannot be empty".to_string(),
            });
        }

        if let Some(ref email) = self.email {
            User::validate_email(email)?;
        }

        Ok(())
    }
}

/// Request to update an existing user; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: Option<bool>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(ref email) = self.email {
            User::validate_email(email)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults_to_enabled() {
        let user = User::new("jdoe".to_string()).unwrap();
        assert!(user.enabled);
        assert!(!user.email_verified);
        assert!(user.id.is_none());
    }

    #[test]
    fn empty_username_is_rejected() {
        assert!(User::new(String::new()).is_err());
    }

    #[test]
    fn email_validation() {
        assert!(User::validate_email("a@b.com").is_ok());
        assert!(User::validate_email("not-an-email").is_err());
        assert!(User::validate_email("@b.com").is_err());
        assert!(User::validate_email("a@").is_err());
    }
}
