use super::common::*;
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Domain entity representing a realm role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Option<EntityId>,
    pub name: String,
    pub description: Option<String>,
    pub composite: bool,
    pub client_role: bool,
    /// Realm ID or client ID owning the role
    pub container_id: Option<String>,
}

impl Role {
    pub fn new(name: String) -> DomainResult<Self> {
        Self::validate_role_name(&name)?;

        Ok(Self {
            id: None,
            name,
            description: None,
            composite: false,
            client_role: false,
            container_id: None,
        })
    }

    pub fn validate_role_name(name: &str) -> DomainResult<()> {
        if name.is_empty() {
            return Err(DomainError::Validation {
                field: "name".to_string(),
                message: "Role name cannot be empty".to_string(),
            });
        }

        if name.len() > 255 {
            return Err(DomainError::Validation {
                field: "name".to_string(),
                message: "Role name cannot exceed 255 characters".to_string(),
            });
        }

        Ok(())
    }
}

/// Request to create a new role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    pub composite: Option<bool>,
}

impl CreateRoleRequest {
    pub fn validate(&self) -> DomainResult<()> {
        Role::validate_role_name(&self.name)
    }
}

/// Request to update a role; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub composite: Option<bool>,
}

impl UpdateRoleRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(ref name) = self.name {
            Role::validate_role_name(name)?;
        }
        Ok(())
    }
}
