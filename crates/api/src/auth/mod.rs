pub mod config;
pub mod extractor;
pub mod jwt;
pub mod password;
pub mod permissions;

pub use config::AuthConfig;
pub use extractor::AuthUser;
pub use jwt::{Claims, JwtService};
