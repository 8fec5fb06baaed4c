use async_graphql::{Enum, SimpleObject, ID};
use chrono::{DateTime, Utc};

use infra::models::SlotActivityLogRow;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum ActivityEventCategory {
    Proposal,
    Booking,
    Court,
    Lifecycle,
}

impl From<String> for ActivityEventCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "proposal" => Self::Proposal,
            "booking" => Self::Booking,
            "court" => Self::Court,
            _ => Self::Lifecycle,
        }
    }
}

impl ActivityEventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::Booking => "booking",
            Self::Court => "court",
            Self::Lifecycle => "lifecycle",
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct ActivityLogEntry {
    pub id: ID,
    pub time_slot_id: ID,
    pub event_category: ActivityEventCategory,
    pub event_action: String,
    pub actor_id: Option<ID>,
    pub subject_id: Option<ID>,
    pub event_time: DateTime<Utc>,
    pub metadata: async_graphql::Json<serde_json::Value>,
}

impl From<SlotActivityLogRow> for ActivityLogEntry {
    fn from(row: SlotActivityLogRow) -> Self {
        Self {
            id: row.id.into(),
            time_slot_id: row.time_slot_id.into(),
            event_category: ActivityEventCategory::from(row.event_category),
            event_action: row.event_action,
            actor_id: row.actor_id.map(|id| id.into()),
            subject_id: row.subject_id.map(|id| id.into()),
            event_time: row.event_time,
            metadata: async_graphql::Json(row.metadata),
        }
    }
}
