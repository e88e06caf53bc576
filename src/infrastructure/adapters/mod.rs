pub mod env_config;
pub mod keycloak_directory;
pub mod memory_record_store;

pub use env_config::*;
pub use keycloak_directory::*;
pub use memory_record_store::*;
