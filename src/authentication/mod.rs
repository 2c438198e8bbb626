mod middleware;
mod password;

pub use middleware::AuthorizedSessionLayer;
pub use password::{compute_password_hash, validate_credentials, AuthError};
