pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{CredentialValidator, JwtValidator};
pub use models::AuthUser;
