pub mod auth;
pub mod config;
pub mod directory;
pub mod records;

pub use auth::*;
pub use config::*;
pub use directory::*;
pub use records::*;
