use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};

use crate::gql::types::Role;
use infra::models::UserRow;

#[derive(SimpleObject, Clone, Debug)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub role: Role,
    /// Padel level on the 0.0-7.0 scale
    pub level: Option<f64>,
    pub gender: Option<String>,
    pub points_balance: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into(),
            level: row.level_tenths.map(|tenths| f64::from(tenths) / 10.0),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: Role::from(row.role),
            gender: row.gender,
            points_balance: row.points_balance,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct UserNotification {
    pub user_id: ID,
    pub title: String,
    pub message: String,
    pub time_slot_id: Option<ID>,
    pub created_at: DateTime<Utc>,
}

// Notification titles
pub const TITLE_CLASS_CONFIRMED: &str = "Class Confirmed";
pub const TITLE_BOOKING_DISPLACED: &str = "Booking Cancelled";
pub const TITLE_CLASS_CANCELLED: &str = "Class Cancelled";
pub const TITLE_COURT_ASSIGNED: &str = "Court Assigned";
