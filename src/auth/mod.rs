pub mod jwt;
pub mod password;

pub use jwt::{extract_jwt_from_header, Claims, JwtKeys};
pub use password::{verify_password, PasswordError, PasswordHasher, DEFAULT_ITERATIONS};
