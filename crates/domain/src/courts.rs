use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::derive_status;
use crate::modality::effective_completion;
use crate::slot::{CourtRef, SlotStatus, TimeSlot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: Uuid,
    pub club_id: Uuid,
    pub number: i32,
    pub is_active: bool,
}

impl Court {
    pub fn court_ref(&self) -> CourtRef {
        CourtRef {
            id: self.id,
            number: self.number,
        }
    }
}

/// An interval during which a court is already taken by another class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtOccupancy {
    pub court_id: Uuid,
    pub slot_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CourtAssignment {
    /// The slot already holds a court; nothing changes
    AlreadyAssigned(CourtRef),
    /// No modality has filled yet
    NotReady,
    Assigned(CourtRef),
    /// Every active court overlaps; the slot waits in the unassigned bucket
    Unassigned,
}

/// Half-open interval test: touching intervals do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

fn is_court_free(court: &Court, slot: &TimeSlot, occupancy: &[CourtOccupancy]) -> bool {
    occupancy.iter().all(|used| {
        used.court_id != court.id
            || used.slot_id == slot.id
            || !overlaps(slot.start, slot.end, used.start, used.end)
    })
}

fn needs_court(slot: &TimeSlot) -> bool {
    slot.status != SlotStatus::Cancelled
        && (slot.confirmed_size.is_some() || effective_completion(&slot.bookings).is_some())
}

/// Picks the lowest-numbered active court of the slot's club that is free for
/// the whole class.
pub fn assign_court(
    slot: &TimeSlot,
    courts: &[Court],
    occupancy: &[CourtOccupancy],
) -> CourtAssignment {
    if let Some(court) = slot.court {
        return CourtAssignment::AlreadyAssigned(court);
    }

    if !needs_court(slot) {
        return CourtAssignment::NotReady;
    }

    let mut candidates: Vec<&Court> = courts
        .iter()
        .filter(|c| c.is_active && c.club_id == slot.club_id)
        .collect();
    candidates.sort_by_key(|c| c.number);

    candidates
        .into_iter()
        .find(|court| is_court_free(court, slot, occupancy))
        .map(|court| CourtAssignment::Assigned(court.court_ref()))
        .unwrap_or(CourtAssignment::Unassigned)
}

/// Assigns courts to every filled, courtless slot in start order. Each new
/// assignment is added to the occupancy before the next slot is considered.
pub fn assign_pending_courts(
    slots: &mut [TimeSlot],
    courts: &[Court],
    occupancy: &mut Vec<CourtOccupancy>,
) -> Vec<(Uuid, CourtRef)> {
    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by_key(|&i| slots[i].start);

    let mut assigned = Vec::new();
    for i in order {
        let slot = &mut slots[i];
        if let CourtAssignment::Assigned(court) = assign_court(slot, courts, occupancy) {
            slot.court = Some(court);
            slot.status = derive_status(slot);
            occupancy.push(CourtOccupancy {
                court_id: court.id,
                slot_id: slot.id,
                start: slot.start,
                end: slot.end,
            });
            assigned.push((slot.id, court));
        }
    }
    assigned
}

/// Filled slots still waiting for a court, earliest first.
pub fn unassigned_bucket(slots: &[TimeSlot]) -> Vec<&TimeSlot> {
    let mut waiting: Vec<&TimeSlot> = slots
        .iter()
        .filter(|s| s.court.is_none() && needs_court(s))
        .collect();
    waiting.sort_by_key(|s| s.start);
    waiting
}
