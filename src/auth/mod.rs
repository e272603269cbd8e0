//! Authentication
//!
//! Handles:
//! - Registration, login and logout
//! - Signed session tokens
//! - Password hashing
//! - Request extractors for the current session

mod middleware;
mod password;
mod routes;
pub mod session;

pub use middleware::{CurrentUser, MaybeUser, SESSION_COOKIE};
pub use password::{hash_password, verify_password};
pub use routes::auth_router;
pub use session::{Session, create_session_token, verify_session_token};
