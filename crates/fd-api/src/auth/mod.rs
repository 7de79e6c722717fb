pub mod jwt;
pub mod middleware;
pub mod plan;

pub use middleware::{AuthUser, SESSION_COOKIE};
pub use plan::PRO_PLAN;
