use crate::application::ports::RecordStore;
use crate::domain::{
    entities::*,
    errors::DomainResult,
    query::PredicateTree,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Reservation service: aggregate CRUD and filtered listing over the record
/// store, plus authorized-user sub-resource operations
pub struct ReservationService {
    store: Arc<dyn RecordStore>,
}

impl ReservationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: &CreateReservationRequest) -> DomainResult<Reservation> {
        let mut reservation =
            Reservation::new(request.initial_date.clone(), request.end_date.clone())?;
        reservation.details = request.details.clone();

        for au in &request.authorized_users {
            reservation
                .authorized_users
                .push(AuthorizedUser::new(au.user_id.clone(), au.name.clone())?);
        }

        let created = self.store.create_reservation(reservation).await?;
        info!(
            "Created reservation {}",
            created.id.as_ref().map(|id| id.as_str()).unwrap_or("unknown")
        );
        Ok(created)
    }

    /// List reservations matching the raw query-string filter map. Values may
    /// carry `{op}` tags; the translation to predicates is lenient (see
    /// `domain::query`).
    #[instrument(skip(self, filters))]
    pub async fn find_all(
        &self,
        filters: &BTreeMap<String, String>,
    ) -> DomainResult<Vec<Reservation>> {
        let predicate = PredicateTree::from_filters(filters);
        debug!(
            "Translated {} filter(s) into {} predicate(s)",
            filters.len(),
            predicate.predicates.len()
        );

        self.store.find_reservations(&predicate).await
    }

    #[instrument(skip(self), fields(reservation_id = %id))]
    pub async fn find_one(&self, id: &str) -> DomainResult<Reservation> {
        self.store.find_reservation_by_id(id).await
    }

    #[instrument(skip(self, request), fields(reservation_id = %id))]
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateReservationRequest,
    ) -> DomainResult<Reservation> {
        let mut reservation = self.store.find_reservation_by_id(id).await?;

        // Full replacement: validate the new dates via a throwaway build.
        Reservation::new(request.initial_date.clone(), request.end_date.clone())?;
        reservation.initial_date = request.initial_date.clone();
        reservation.end_date = request.end_date.clone();
        reservation.details = request.details.clone();
        reservation.timestamps.updated_timestamp = Some(chrono::Utc::now());

        self.store.update_reservation(reservation).await
    }

    #[instrument(skip(self, request), fields(reservation_id = %id))]
    pub async fn patch(
        &self,
        id: &str,
        request: &PatchReservationRequest,
    ) -> DomainResult<Reservation> {
        let mut reservation = self.store.find_reservation_by_id(id).await?;

        if let Some(ref initial_date) = request.initial_date {
            Reservation::new(initial_date.clone(), reservation.end_date.clone())?;
            reservation.initial_date = initial_date.clone();
        }
        if let Some(ref end_date) = request.end_date {
            Reservation::new(reservation.initial_date.clone(), end_date.clone())?;
            reservation.end_date = end_date.clone();
        }
        if request.details.is_some() {
            reservation.details = request.details.clone();
        }
        reservation.timestamps.updated_timestamp = Some(chrono::Utc::now());

        self.store.update_reservation(reservation).await
    }

    #[instrument(skip(self), fields(reservation_id = %id))]
    pub async fn remove(&self, id: &str) -> DomainResult<()> {
        self.store.delete_reservation(id).await?;
        info!("Removed reservation '{}'", id);
        Ok(())
    }

    // Authorized-user sub-resource

    #[instrument(skip(self, request), fields(reservation_id = %reservation_id))]
    pub async fn add_authorized_user(
        &self,
        reservation_id: &str,
        request: &AuthorizedUserRequest,
    ) -> DomainResult<AuthorizedUser> {
        let user = AuthorizedUser::new(request.user_id.clone(), request.name.clone())?;
        self.store.add_authorized_user(reservation_id, user).await
    }

    #[instrument(skip(self), fields(reservation_id = %reservation_id))]
    pub async fn list_authorized_users(
        &self,
        reservation_id: &str,
    ) -> DomainResult<Vec<AuthorizedUser>> {
        self.store.list_authorized_users(reservation_id).await
    }

    #[instrument(skip(self), fields(reservation_id = %reservation_id, user_id = %user_id))]
    pub async fn get_authorized_user(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> DomainResult<AuthorizedUser> {
        self.store.find_authorized_user(reservation_id, user_id).await
    }

    #[instrument(skip(self), fields(reservation_id = %reservation_id, user_id = %user_id))]
    pub async fn update_authorized_user(
        &self,
        reservation_id: &str,
        user_id: &str,
        name: &str,
    ) -> DomainResult<AuthorizedUser> {
        self.store
            .update_authorized_user(reservation_id, user_id, name)
            .await
    }

    #[instrument(skip(self), fields(reservation_id = %reservation_id, user_id = %user_id))]
    pub async fn remove_authorized_user(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> DomainResult<()> {
        self.store
            .remove_authorized_user(reservation_id, user_id)
            .await
    }
}
