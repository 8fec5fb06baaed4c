pub mod accounts;
pub mod classes;
pub mod expiry_service;

pub use expiry_service::{spawn_expiry_service, ExpiryService};
