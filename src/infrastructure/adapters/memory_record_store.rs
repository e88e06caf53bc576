use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::application::ports::records::RecordStore;
use crate::domain::{entities::*, errors::*, query::PredicateTree};

/// In-memory record store for testing and development.
///
/// Evaluates predicate trees directly against the stored aggregates and
/// enforces the parent-child lifetime: authorized users vanish with their
/// reservation.
#[derive(Default)]
pub struct MemoryRecordStore {
    reservations: Mutex<HashMap<String, Reservation>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_of<'a>(reservation: &'a Reservation, field: &str) -> Option<&'a str> {
        match field {
            "reservation_id" => reservation.id.as_ref().map(EntityId::as_str),
            "initial_date" => Some(reservation.initial_date.as_str()),
            "end_date" => Some(reservation.end_date.as_str()),
            "details" => reservation.details.as_deref(),
            _ => None,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Reservation>> {
        // Mutex poisoning only happens if a holder panicked; propagating the
        // inner state is still sound for this store.
        match self.reservations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_reservation(&self, mut reservation: Reservation) -> DomainResult<Reservation> {
        let id = reservation.id.clone().unwrap_or_default();
        reservation.id = Some(id.clone());

        for user in &mut reservation.authorized_users {
            if user.id.is_none() {
                user.id = Some(EntityId::new());
            }
        }

        self.lock().insert(id.to_string(), reservation.clone());
        debug!("Stored reservation '{}'", id);
        Ok(reservation)
    }

    async fn find_reservations(&self, predicate: &PredicateTree) -> DomainResult<Vec<Reservation>> {
        let store = self.lock();
        let mut matches: Vec<Reservation> = store
            .values()
            .filter(|r| predicate.matches(|field| Self::field_of(r, field)))
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.initial_date.cmp(&b.initial_date));
        Ok(matches)
    }

    async fn find_reservation_by_id(&self, id: &str) -> DomainResult<Reservation> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    async fn update_reservation(&self, reservation: Reservation) -> DomainResult<Reservation> {
        let id = reservation
            .id
            .as_ref()
            .ok_or_else(|| DomainError::Validation {
                field: "id".to_string(),
                message: "Reservation ID is required for updates".to_string(),
            })?
            .to_string();

        let mut store = self.lock();
        if !store.contains_key(&id) {
            return Err(DomainError::not_found("Reservation", id));
        }
        store.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn delete_reservation(&self, id: &str) -> DomainResult<()> {
        // Authorized users live inside the aggregate, so removing the
        // reservation cascades to them.
        self.lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    async fn add_authorized_user(
        &self,
        reservation_id: &str,
        mut user: AuthorizedUser,
    ) -> DomainResult<AuthorizedUser> {
        let mut store = self.lock();
        let reservation = store
            .get_mut(reservation_id)
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))?;

        if user.id.is_none() {
            user.id = Some(EntityId::new());
        }
        reservation.authorized_users.push(user.clone());
        Ok(user)
    }

    async fn list_authorized_users(
        &self,
        reservation_id: &str,
    ) -> DomainResult<Vec<AuthorizedUser>> {
        let store = self.lock();
        let reservation = store
            .get(reservation_id)
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))?;
        Ok(reservation.authorized_users.clone())
    }

    async fn find_authorized_user(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> DomainResult<AuthorizedUser> {
        let store = self.lock();
        let reservation = store
            .get(reservation_id)
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))?;

        reservation
            .authorized_users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("AuthorizedUser", user_id))
    }

    async fn update_authorized_user(
        &self,
        reservation_id: &str,
        user_id: &str,
        name: &str,
    ) -> DomainResult<AuthorizedUser> {
        let mut store = self.lock();
        let reservation = store
            .get_mut(reservation_id)
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))?;

        let user = reservation
            .authorized_users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("AuthorizedUser", user_id))?;

        user.name = name.to_string();
        Ok(user.clone())
    }

    async fn remove_authorized_user(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> DomainResult<()> {
        let mut store = self.lock();
        let reservation = store
            .get_mut(reservation_id)
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))?;

        let before = reservation.authorized_users.len();
        reservation.authorized_users.retain(|u| u.user_id != user_id);

        if reservation.authorized_users.len() == before {
            return Err(DomainError::not_found("AuthorizedUser", user_id));
        }
        Ok(())
    }
}
