/*!
# Admin Domain

Shared domain layer for an identity and reservation administration stack,
using hexagonal architecture principles.

This crate provides:
- Domain models for directory users, roles, and the reservation aggregate
- Port definitions for the external user directory and the record store
- Application services implementing the business use cases
- Infrastructure adapters: a Keycloak-backed directory (with cached admin
  token) and an in-memory record store

## Architecture

```text
┌─────────────────────────────────────────────────────────────┐
│                Application Layer                            │
├─────────────────────────────────────────────────────────────┤
│  • AuthenticationService     • UserManagementService        │
│  • RoleManagementService     • ReservationService           │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│                 Domain Layer (Ports)                        │
├─────────────────────────────────────────────────────────────┤
│  • UserDirectory             • RecordStore                  │
│  • ConfigurationPort         • PredicateTree (query)        │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│              Infrastructure Layer (Adapters)                │
├─────────────────────────────────────────────────────────────┤
│  • KeycloakDirectoryAdapter  • EnvConfigurationAdapter      │
│  • MemoryRecordStore                                        │
└─────────────────────────────────────────────────────────────┘
```

Listing endpoints accept free-form filter maps whose values may carry
operator tags (`?initial_date={gteq}2024-01-01`); `domain::query` translates
them into a flat predicate conjunction for the record store.
*/

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::ports::*;
pub use application::services::*;
pub use domain::entities::*;
pub use domain::errors::*;
pub use domain::query::*;
