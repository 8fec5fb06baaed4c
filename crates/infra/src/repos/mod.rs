pub mod activity_log;
pub mod bookings;
pub mod clubs;
pub mod courts;
pub mod time_slots;
pub mod users;

pub use bookings::CreateBooking;
pub use courts::CreateCourt;
pub use time_slots::{CreateTimeSlot, SlotState, TimeSlotFilter};
pub use users::{CreateUserData, UserFilter};
