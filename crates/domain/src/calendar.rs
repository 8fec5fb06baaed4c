use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::courts::{overlaps, Court};
use crate::level::{Category, Level};
use crate::modality::{effective_completion, occupancy};
use crate::slot::{CourtRef, GroupSize, SlotStatus, TimeSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl CalendarWindow {
    pub fn contains(&self, slot: &TimeSlot) -> bool {
        overlaps(self.from, self.to, slot.start, slot.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub slot_id: Uuid,
    pub instructor_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: SlotStatus,
    pub level: Level,
    pub category: Category,
    /// Modality that filled, or the one with most seats taken while forming
    pub group_size: Option<GroupSize>,
    pub occupied: usize,
    pub confirmed: bool,
}

impl CalendarEntry {
    fn from_slot(slot: &TimeSlot) -> Self {
        let filled = slot
            .confirmed_size
            .or_else(|| effective_completion(&slot.bookings));

        let size = filled.or_else(|| {
            GroupSize::up_to(slot.max_players)
                .map(|size| (size, occupancy(&slot.bookings, size).occupied))
                .filter(|(_, occupied)| *occupied > 0)
                .max_by_key(|(size, occupied)| (*occupied, std::cmp::Reverse(*size)))
                .map(|(size, _)| size)
        });

        Self {
            slot_id: slot.id,
            instructor_id: slot.instructor_id,
            start: slot.start,
            end: slot.end,
            status: slot.status,
            level: slot.level,
            category: slot.category,
            group_size: size,
            occupied: size.map_or(0, |s| occupancy(&slot.bookings, s).occupied),
            confirmed: filled.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtLane {
    pub court: CourtRef,
    pub entries: Vec<CalendarEntry>,
}

/// Admin view of a club: one lane per court plus classes with no court yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub lanes: Vec<CourtLane>,
    /// Filled classes still waiting for a court
    pub unassigned: Vec<CalendarEntry>,
    /// Classes still collecting players
    pub proposals: Vec<CalendarEntry>,
}

/// Lays out the non-cancelled slots that intersect `window`. Lanes follow
/// court number; entries in every list are ordered by start time.
pub fn build_calendar(courts: &[Court], slots: &[TimeSlot], window: CalendarWindow) -> CalendarView {
    let mut visible: Vec<&TimeSlot> = slots
        .iter()
        .filter(|s| s.status != SlotStatus::Cancelled && window.contains(s))
        .collect();
    visible.sort_by_key(|s| (s.start, s.id));

    let mut active: Vec<&Court> = courts.iter().filter(|c| c.is_active).collect();
    active.sort_by_key(|c| c.number);

    let mut lanes: Vec<CourtLane> = active
        .into_iter()
        .map(|court| CourtLane {
            court: court.court_ref(),
            entries: Vec::new(),
        })
        .collect();

    let mut unassigned = Vec::new();
    let mut proposals = Vec::new();

    for slot in visible {
        let entry = CalendarEntry::from_slot(slot);
        match slot.court {
            Some(court) => match lanes.iter_mut().find(|lane| lane.court.id == court.id) {
                Some(lane) => lane.entries.push(entry),
                // court was deactivated after assignment
                None => lanes.push(CourtLane {
                    court,
                    entries: vec![entry],
                }),
            },
            None if entry.confirmed => unassigned.push(entry),
            None => proposals.push(entry),
        }
    }

    lanes.sort_by_key(|lane| lane.court.number);

    CalendarView {
        lanes,
        unassigned,
        proposals,
    }
}
