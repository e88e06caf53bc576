pub mod common;
pub mod reservation;
pub mod role;
pub mod user;

pub use common::*;
pub use reservation::*;
pub use role::*;
pub use user::*;
