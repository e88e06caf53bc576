pub mod authentication;
pub mod reservation_management;
pub mod role_management;
pub mod user_management;

pub use authentication::*;
pub use reservation_management::*;
pub use role_management::*;
pub use user_management::*;
