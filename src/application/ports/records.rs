use crate::domain::{entities::*, errors::DomainResult, query::PredicateTree};
use async_trait::async_trait;

/// Port over the relational record store holding the reservation aggregate.
///
/// Listing takes the predicate tree produced by the query translator;
/// authorized users live inside the aggregate and are removed with their
/// parent reservation.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_reservation(&self, reservation: Reservation) -> DomainResult<Reservation>;
    async fn find_reservations(&self, predicate: &PredicateTree) -> DomainResult<Vec<Reservation>>;
    async fn find_reservation_by_id(&self, id: &str) -> DomainResult<Reservation>;
    async fn update_reservation(&self, reservation: Reservation) -> DomainResult<Reservation>;
    async fn delete_reservation(&self, id: &str) -> DomainResult<()>;

    // Authorized-user sub-resource
    async fn add_authorized_user(
        &self,
        reservation_id: &str,
        user: AuthorizedUser,
    ) -> DomainResult<AuthorizedUser>;
    async fn list_authorized_users(&self, reservation_id: &str)
        -> DomainResult<Vec<AuthorizedUser>>;
    async fn find_authorized_user(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> DomainResult<AuthorizedUser>;
    async fn update_authorized_user(
        &self,
        reservation_id: &str,
        user_id: &str,
        name: &str,
    ) -> DomainResult<AuthorizedUser>;
    async fn remove_authorized_user(&self, reservation_id: &str, user_id: &str)
        -> DomainResult<()>;
}
