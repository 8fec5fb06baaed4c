use chrono::{DateTime, Utc};
use domain::{
    Booking, BookingError, Court, CourtOccupancy, CourtRef, Gender, GroupSize, LevelValue, Player,
    TimeSlot,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClubRow {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CourtRow {
    pub id: Uuid,
    pub club_id: Uuid,
    pub court_number: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourtRow {
    pub fn to_court(&self) -> Court {
        Court {
            id: self.id,
            club_id: self.club_id,
            number: self.court_number,
            is_active: self.is_active,
        }
    }
}

/// A court held by a class during `[start_time, end_time)`.
#[derive(Debug, Clone, FromRow)]
pub struct CourtOccupancyRow {
    pub court_id: Uuid,
    pub time_slot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<CourtOccupancyRow> for CourtOccupancy {
    fn from(row: CourtOccupancyRow) -> Self {
        CourtOccupancy {
            court_id: row.court_id,
            slot_id: row.time_slot_id,
            start: row.start_time,
            end: row.end_time,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub role: String,
    /// Skill level in tenths
    pub level_tenths: Option<i16>,
    pub gender: Option<String>,
    pub points_balance: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn level(&self) -> Result<Option<LevelValue>, BookingError> {
        self.level_tenths
            .map(|tenths| LevelValue::from_tenths(i64::from(tenths)))
            .transpose()
    }

    pub fn to_player(&self) -> Result<Player, BookingError> {
        Ok(Player {
            id: self.id,
            level: self.level()?,
            gender: self.gender.as_deref().map(str::parse::<Gender>).transpose()?,
            points_balance: self.points_balance,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserCredentialsRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimeSlotRow {
    pub id: Uuid,
    pub club_id: Uuid,
    pub instructor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub level: String,
    pub category: String,
    pub max_players: i16,
    pub total_price_cents: i64,
    pub court_id: Option<Uuid>,
    /// Joined from `courts`
    pub court_number: Option<i32>,
    pub status: String,
    pub confirmed_size: Option<i16>,
    pub credits_slots: Vec<i16>,
    pub recycled_slots_only_points: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn group_size(raw: i16) -> Result<GroupSize, BookingError> {
    GroupSize::new(i64::from(raw))
}

impl TimeSlotRow {
    /// Builds the rule snapshot from this row and every booking of the slot.
    pub fn into_time_slot(self, bookings: Vec<Booking>) -> Result<TimeSlot, BookingError> {
        let court = match (self.court_id, self.court_number) {
            (Some(id), Some(number)) => Some(CourtRef { id, number }),
            _ => None,
        };

        Ok(TimeSlot {
            id: self.id,
            club_id: self.club_id,
            instructor_id: self.instructor_id,
            start: self.start_time,
            end: self.end_time,
            level: self.level.parse()?,
            category: self.category.parse()?,
            max_players: group_size(self.max_players)?,
            total_price_cents: self.total_price_cents,
            court,
            status: self.status.parse()?,
            confirmed_size: self.confirmed_size.map(group_size).transpose()?,
            credits_slots: self
                .credits_slots
                .into_iter()
                .map(group_size)
                .collect::<Result<_, _>>()?,
            recycled_slots_only_points: self.recycled_slots_only_points,
            bookings,
        })
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: Uuid,
    pub time_slot_id: Uuid,
    pub user_id: Uuid,
    pub group_size: i16,
    pub status: String,
    pub is_recycled: bool,
    pub is_private: bool,
    pub payment_method: String,
    pub amount_paid: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = BookingError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            group_size: group_size(row.group_size)?,
            status: row.status.parse()?,
            is_recycled: row.is_recycled,
            is_private: row.is_private,
            payment_method: row.payment_method.parse()?,
            amount_paid: row.amount_paid,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SlotActivityLogRow {
    pub id: Uuid,
    pub time_slot_id: Uuid,
    pub event_category: String,
    pub event_action: String,
    pub actor_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub event_time: DateTime<Utc>,
    pub metadata: serde_json::Value,
}
