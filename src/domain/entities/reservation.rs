use super::common::*;
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// A user authorized to access a reservation.
///
/// Lifetime is bound to the parent reservation: removing the reservation
/// removes its authorized users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    pub id: Option<EntityId>,
    pub user_id: String,
    pub name: String,
}

impl AuthorizedUser {
    pub fn new(user_id: String, name: String) -> DomainResult<Self> {
        if name.is_empty() || name.len() > 100 {
            return Err(DomainError::Validation {
                field: "name".to_string(),
                message: "Authorized user name must be 1-100 characters".to_string(),
            });
        }

        Ok(Self {
            id: None,
            user_id,
            name,
        })
    }
}

/// Domain entity representing a reservation with its authorized users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Option<EntityId>,
    /// Reservation start date, ISO-8601 (YYYY-MM-DD)
    pub initial_date: String,
    /// Reservation end date, ISO-8601 (YYYY-MM-DD)
    pub end_date: String,
    pub details: Option<String>,
    pub authorized_users: Vec<AuthorizedUser>,
    pub timestamps: Timestamps,
}

impl Reservation {
    pub fn new(initial_date: String, end_date: String) -> DomainResult<Self> {
        Self::validate_date(&initial_date, "initial_date")?;
        Self::validate_date(&end_date, "end_date")?;

        Ok(Self {
            id: None,
            initial_date,
            end_date,
            details: None,
            authorized_users: Vec::new(),
            timestamps: Timestamps::now(),
        })
    }

    fn validate_date(value: &str, field: &str) -> DomainResult<()> {
        if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
            return Err(DomainError::Validation {
                field: field.to_string(),
                message: format!("Expected ISO-8601 date (YYYY-MM-DD), got '{value}'"),
            });
        }
        Ok(())
    }
}

/// Request to create a reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub initial_date: String,
    pub end_date: String,
    pub details: Option<String>,
    #[serde(default)]
    pub authorized_users: Vec<AuthorizedUserRequest>,
}

/// Authorized-user payload within reservation requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUserRequest {
    pub user_id: String,
    pub name: String,
}

/// Full-replacement update of a reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReservationRequest {
    pub initial_date: String,
    pub end_date: String,
    pub details: Option<String>,
}

/// Partial update of a reservation; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchReservationRequest {
    pub initial_date: Option<String>,
    pub end_date: Option<String>,
    pub details: Option<String>,
}
