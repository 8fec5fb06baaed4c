use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::BookingError;
use crate::level::{Category, Level};
use crate::slot::{GroupSize, SlotStatus, TimeSlot};

/// Upper bound on a class price (100 000.00 in currency units).
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Unvalidated class offer as submitted by an instructor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDraft {
    pub club_id: Option<Uuid>,
    pub instructor_id: Option<Uuid>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub level: Option<String>,
    pub category: Option<String>,
    pub max_players: Option<i64>,
    pub total_price_cents: Option<i64>,
    #[serde(default)]
    pub credits_slots: Vec<i64>,
    pub recycled_slots_only_points: Option<bool>,
}

/// A class offer that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub club_id: Uuid,
    pub instructor_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub level: Level,
    pub category: Category,
    pub max_players: GroupSize,
    pub total_price_cents: i64,
    pub credits_slots: Vec<GroupSize>,
    pub recycled_slots_only_points: bool,
}

fn invalid(msg: &str) -> BookingError {
    BookingError::InvalidProposal(msg.to_string())
}

impl ProposalDraft {
    pub fn validate(&self) -> Result<Proposal, BookingError> {
        let club_id = self.club_id.ok_or_else(|| invalid("club is required"))?;
        let instructor_id = self
            .instructor_id
            .ok_or_else(|| invalid("instructor is required"))?;
        let start = self.start.ok_or_else(|| invalid("date is required"))?;
        let end = self.end.ok_or_else(|| invalid("end time is required"))?;
        if end <= start {
            return Err(invalid("end time must be after start time"));
        }

        let level = match self.level.as_deref().map(str::trim) {
            None | Some("") => return Err(invalid("level range is required")),
            Some(raw) => raw.parse::<Level>()?,
        };

        let category = match self.category.as_deref() {
            Some(raw) => raw.parse::<Category>()?,
            None => Category::Open,
        };

        let max_players = GroupSize::new(self.max_players.unwrap_or(4))
            .map_err(|_| invalid("max players must be between 1 and 4"))?;

        let total_price_cents = self
            .total_price_cents
            .ok_or_else(|| invalid("price is required"))?;
        if total_price_cents < 0 {
            return Err(invalid("price cannot be negative"));
        }
        if total_price_cents > MAX_PRICE_CENTS {
            return Err(invalid("price is above the allowed maximum"));
        }

        let mut credits_slots = Vec::with_capacity(self.credits_slots.len());
        for raw in &self.credits_slots {
            let size = GroupSize::new(*raw)?;
            if size > max_players {
                return Err(invalid("credits slots cannot exceed max players"));
            }
            if !credits_slots.contains(&size) {
                credits_slots.push(size);
            }
        }
        credits_slots.sort();

        Ok(Proposal {
            club_id,
            instructor_id,
            start,
            end,
            level,
            category,
            max_players,
            total_price_cents,
            credits_slots,
            recycled_slots_only_points: self.recycled_slots_only_points.unwrap_or(true),
        })
    }
}

impl Proposal {
    pub fn into_time_slot(self, id: Uuid) -> TimeSlot {
        TimeSlot {
            id,
            club_id: self.club_id,
            instructor_id: self.instructor_id,
            start: self.start,
            end: self.end,
            level: self.level,
            category: self.category,
            max_players: self.max_players,
            total_price_cents: self.total_price_cents,
            court: None,
            status: SlotStatus::Proposal,
            confirmed_size: None,
            credits_slots: self.credits_slots,
            recycled_slots_only_points: self.recycled_slots_only_points,
            bookings: Vec::new(),
        }
    }
}
