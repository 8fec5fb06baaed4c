use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BookingError;
use crate::level::{Category, Level};

/// Number of players a class is booked for. Each size is an independent
/// modality with its own seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct GroupSize(u8);

impl GroupSize {
    pub const ONE: GroupSize = GroupSize(1);
    pub const TWO: GroupSize = GroupSize(2);
    pub const THREE: GroupSize = GroupSize(3);
    pub const FOUR: GroupSize = GroupSize(4);
    pub const ALL: [GroupSize; 4] = [Self::ONE, Self::TWO, Self::THREE, Self::FOUR];

    pub fn new(size: i64) -> Result<Self, BookingError> {
        match size {
            1..=4 => Ok(Self(size as u8)),
            _ => Err(BookingError::InvalidGroupSize(size)),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn seats(self) -> usize {
        self.0 as usize
    }

    /// Modalities offered by a class whose maximum is `max_players`.
    pub fn up_to(max_players: GroupSize) -> impl Iterator<Item = GroupSize> {
        Self::ALL.into_iter().filter(move |size| *size <= max_players)
    }
}

impl TryFrom<i64> for GroupSize {
    type Error = BookingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i32> for GroupSize {
    type Error = BookingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<GroupSize> for i64 {
    fn from(size: GroupSize) -> Self {
        i64::from(size.0)
    }
}

impl From<GroupSize> for i32 {
    fn from(size: GroupSize) -> Self {
        i32::from(size.0)
    }
}

impl fmt::Display for GroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Seat held while the modality is still filling
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(BookingError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Currency,
    Points,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Currency => "currency",
            PaymentMethod::Points => "points",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "currency" => Ok(PaymentMethod::Currency),
            "points" => Ok(PaymentMethod::Points),
            other => Err(BookingError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Offered by an instructor, nobody booked yet
    Proposal,
    /// Players hold pending seats, no modality has filled
    PreRegistration,
    /// A modality filled and is waiting for a court
    Forming,
    Confirmed,
    /// Filled by a single private booking
    ConfirmedPrivate,
    Cancelled,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Proposal => "proposal",
            SlotStatus::PreRegistration => "pre_registration",
            SlotStatus::Forming => "forming",
            SlotStatus::Confirmed => "confirmed",
            SlotStatus::ConfirmedPrivate => "confirmed_private",
            SlotStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, SlotStatus::Confirmed | SlotStatus::ConfirmedPrivate)
    }
}

impl FromStr for SlotStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposal" => Ok(SlotStatus::Proposal),
            "pre_registration" => Ok(SlotStatus::PreRegistration),
            "forming" => Ok(SlotStatus::Forming),
            "confirmed" => Ok(SlotStatus::Confirmed),
            "confirmed_private" => Ok(SlotStatus::ConfirmedPrivate),
            "cancelled" => Ok(SlotStatus::Cancelled),
            other => Err(BookingError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_size: GroupSize,
    pub status: BookingStatus,
    /// Cancelled after the class was confirmed; the seat is re-offered for points
    pub is_recycled: bool,
    /// One player paid for the whole modality
    pub is_private: bool,
    pub payment_method: PaymentMethod,
    /// Cents for currency payments, points otherwise
    pub amount_paid: i64,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn is_recycled_seat(&self) -> bool {
        self.status == BookingStatus::Cancelled && self.is_recycled
    }

    /// Seats this booking takes in its modality.
    pub fn seats(&self) -> usize {
        if self.is_private {
            self.group_size.seats()
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtRef {
    pub id: Uuid,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    pub club_id: Uuid,
    pub instructor_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub level: Level,
    pub category: Category,
    pub max_players: GroupSize,
    pub total_price_cents: i64,
    pub court: Option<CourtRef>,
    pub status: SlotStatus,
    /// Modality the class was confirmed for; fixed once set
    pub confirmed_size: Option<GroupSize>,
    /// Modalities the instructor opened to points payment
    pub credits_slots: Vec<GroupSize>,
    pub recycled_slots_only_points: bool,
    pub bookings: Vec<Booking>,
}

impl TimeSlot {
    pub fn active_bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(|b| b.is_active())
    }

    pub fn bookings_for(&self, size: GroupSize) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.group_size == size)
    }

    pub fn booking(&self, booking_id: Uuid) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == booking_id)
    }

    pub fn has_active_booking(&self, user_id: Uuid) -> bool {
        self.active_bookings().any(|b| b.user_id == user_id)
    }

    pub fn is_open_for(&self, size: GroupSize) -> bool {
        self.status != SlotStatus::Cancelled
            && self.confirmed_size.map_or(true, |locked| locked == size)
    }
}
