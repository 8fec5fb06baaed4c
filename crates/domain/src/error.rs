use thiserror::Error;

use crate::level::{Category, Level, LevelValue};
use crate::slot::{GroupSize, SlotStatus};

/// Every way a booking rule can reject a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("invalid group size {0}: must be between 1 and 4")]
    InvalidGroupSize(i64),

    #[error("a {requested}-player booking exceeds the class maximum of {max_players}")]
    ExceedsMaxPlayers {
        requested: GroupSize,
        max_players: GroupSize,
    },

    #[error("the {0}-player modality is already full")]
    ModalityFull(GroupSize),

    #[error("you already have a booking in this class")]
    AlreadyBooked,

    #[error("this class is not accepting bookings (status: {0})")]
    SlotClosed(SlotStatus),

    #[error("the free seats in the {0}-player modality can only be paid with points")]
    PointsOnlySeat(GroupSize),

    #[error("the {0}-player modality cannot be paid with points")]
    CurrencyOnlySeat(GroupSize),

    #[error("insufficient points: {required} required, {available} available")]
    InsufficientPoints { required: i64, available: i64 },

    #[error("player level {player} is outside the class range {required}")]
    LevelMismatch {
        player: LevelValue,
        required: Level,
    },

    #[error("a player level is required to join a {0} class")]
    LevelUnknown(Level),

    #[error("this class is reserved for the {0} category")]
    CategoryMismatch(Category),

    #[error("a private booking needs every seat of the {0}-player modality free")]
    PrivateUnavailable(GroupSize),

    #[error("booking not found")]
    BookingNotFound,

    #[error("booking is already cancelled")]
    BookingNotActive,

    #[error("invalid level: {0}")]
    InvalidLevel(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid proposal: {0}")]
    InvalidProposal(String),
}

impl BookingError {
    /// True when the request collided with current occupancy rather than being malformed.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            BookingError::ModalityFull(_)
                | BookingError::AlreadyBooked
                | BookingError::SlotClosed(_)
                | BookingError::PrivateUnavailable(_)
                | BookingError::BookingNotActive
        )
    }
}
