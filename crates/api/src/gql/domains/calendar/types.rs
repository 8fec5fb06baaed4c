use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};

use crate::gql::domains::classes::types::ClassCategory;
use crate::gql::types::SlotStatus;

#[derive(SimpleObject, Clone)]
pub struct CalendarEntry {
    pub time_slot_id: ID,
    pub instructor_id: ID,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SlotStatus,
    pub level: String,
    pub category: ClassCategory,
    /// Modality that filled, or the busiest one while the class is forming
    pub group_size: Option<i32>,
    pub occupied: i32,
    pub confirmed: bool,
}

impl From<&domain::CalendarEntry> for CalendarEntry {
    fn from(entry: &domain::CalendarEntry) -> Self {
        Self {
            time_slot_id: entry.slot_id.into(),
            instructor_id: entry.instructor_id.into(),
            start_time: entry.start,
            end_time: entry.end,
            status: entry.status.into(),
            level: entry.level.to_string(),
            category: entry.category.into(),
            group_size: entry.group_size.map(i32::from),
            occupied: entry.occupied as i32,
            confirmed: entry.confirmed,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct CalendarLane {
    pub court_id: ID,
    pub court_number: i32,
    pub entries: Vec<CalendarEntry>,
}

/// One lane per court plus the classes that still have no court.
#[derive(SimpleObject, Clone)]
pub struct AdminCalendar {
    pub club_id: ID,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub lanes: Vec<CalendarLane>,
    pub unassigned: Vec<CalendarEntry>,
    pub proposals: Vec<CalendarEntry>,
}

impl AdminCalendar {
    pub fn new(
        club_id: uuid::Uuid,
        window: domain::CalendarWindow,
        view: &domain::CalendarView,
    ) -> Self {
        Self {
            club_id: club_id.into(),
            from: window.from,
            to: window.to,
            lanes: view
                .lanes
                .iter()
                .map(|lane| CalendarLane {
                    court_id: lane.court.id.into(),
                    court_number: lane.court.number,
                    entries: lane.entries.iter().map(CalendarEntry::from).collect(),
                })
                .collect(),
            unassigned: view.unassigned.iter().map(CalendarEntry::from).collect(),
            proposals: view.proposals.iter().map(CalendarEntry::from).collect(),
        }
    }
}
