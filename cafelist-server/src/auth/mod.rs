//! Bearer-token authentication
//!
//! JWT issuance and verification plus argon2 password hashing. The
//! `AuthUser` extractor in `http::extractors` ties these to requests.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtKeys, TOKEN_LIFETIME_SECS};
pub use password::{hash_password, verify_password};
