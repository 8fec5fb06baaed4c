pub mod activity_log;
pub mod auth;
pub mod bookings;
pub mod calendar;
pub mod classes;
pub mod clubs;
pub mod users;
