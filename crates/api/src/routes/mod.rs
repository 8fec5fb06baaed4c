pub mod auth;
pub mod calendar;
pub mod classes;
pub mod timeslots;
