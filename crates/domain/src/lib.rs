//! Booking rules for padel club classes.
//!
//! Everything in this crate is a pure function over a [`TimeSlot`] snapshot.
//! Persistence, locking and transport live in the `infra` and `api` crates.

pub mod calendar;
pub mod courts;
pub mod credits;
pub mod error;
pub mod level;
pub mod lifecycle;
pub mod modality;
pub mod proposal;
pub mod slot;

pub use calendar::{build_calendar, CalendarEntry, CalendarView, CalendarWindow, CourtLane};
pub use courts::{
    assign_court, assign_pending_courts, overlaps, unassigned_bucket, Court, CourtAssignment,
    CourtOccupancy,
};
pub use credits::{
    authorize_payment, classify_modality, classify_slot, recycling_summary, seat_cost, Charge,
    ModalityPricing, RecyclingSummary, SeatCost, SeatPayment,
};
pub use error::BookingError;
pub use level::{Category, Gender, Level, LevelValue};
pub use lifecycle::{
    accounts_to_lock, derive_status, plan_booking, plan_cancellation, plan_class_cancellation,
    plan_expiry, BookingPlan, BookingRequest, CancellationPlan, ClassCancellation, Player, Refund,
};
pub use modality::{
    check_seat_available, displaced_bookings, effective_completion, is_effectively_completed,
    occupancy, resolve_modalities, ModalityOccupancy,
};
pub use proposal::{Proposal, ProposalDraft, MAX_PRICE_CENTS};
pub use slot::{
    Booking, BookingStatus, CourtRef, GroupSize, PaymentMethod, SlotStatus, TimeSlot,
};
