mod common;

use common::*;
use domain::{
    assign_court, assign_pending_courts, overlaps, unassigned_bucket, BookingStatus, CourtAssignment,
    CourtOccupancy, CourtRef, GroupSize, SlotStatus,
};
use uuid::Uuid;

fn taken(court: &domain::Court, start_hour: u32, end_hour: u32) -> CourtOccupancy {
    CourtOccupancy {
        court_id: court.id,
        slot_id: Uuid::new_v4(),
        start: at(start_hour, 0),
        end: at(end_hour, 0),
    }
}

#[test]
fn touching_intervals_do_not_overlap() {
    assert!(!overlaps(at(10, 0), at(11, 0), at(11, 0), at(12, 0)));
    assert!(overlaps(at(10, 0), at(11, 1), at(11, 0), at(12, 0)));
    assert!(overlaps(at(9, 0), at(13, 0), at(10, 0), at(11, 0)));
}

#[test]
fn slot_with_a_court_is_left_alone() {
    let mut slot = filled_slot(GroupSize::FOUR);
    let existing = CourtRef {
        id: Uuid::new_v4(),
        number: 7,
    };
    slot.court = Some(existing);

    let outcome = assign_court(&slot, &[court(1), court(2)], &[]);
    assert_eq!(outcome, CourtAssignment::AlreadyAssigned(existing));
}

#[test]
fn slot_that_has_not_filled_is_not_ready() {
    let mut slot = slot();
    slot.bookings.push(booking(GroupSize::FOUR, BookingStatus::Pending));

    assert_eq!(assign_court(&slot, &[court(1)], &[]), CourtAssignment::NotReady);
}

#[test]
fn lowest_numbered_free_court_wins() {
    let slot = filled_slot(GroupSize::TWO);
    let (c1, c2, c3) = (court(1), court(2), court(3));
    let occupancy = vec![taken(&c1, 9, 11)];

    let outcome = assign_court(&slot, &[c3.clone(), c2.clone(), c1], &occupancy);
    assert_eq!(outcome, CourtAssignment::Assigned(c2.court_ref()));
}

#[test]
fn inactive_and_foreign_courts_are_skipped() {
    let slot = filled_slot(GroupSize::TWO);
    let mut closed = court(1);
    closed.is_active = false;
    let mut elsewhere = court(2);
    elsewhere.club_id = Uuid::new_v4();
    let open = court(5);

    let outcome = assign_court(&slot, &[closed, elsewhere, open.clone()], &[]);
    assert_eq!(outcome, CourtAssignment::Assigned(open.court_ref()));
}

#[test]
fn back_to_back_classes_share_a_court() {
    let mut slot = slot_between(at(10, 0), at(11, 0));
    slot.bookings.push(booking(GroupSize::ONE, BookingStatus::Confirmed));
    let c1 = court(1);

    let outcome = assign_court(&slot, &[c1.clone()], &[taken(&c1, 11, 12)]);
    assert_eq!(outcome, CourtAssignment::Assigned(c1.court_ref()));
}

#[test]
fn no_free_court_falls_back_to_the_unassigned_bucket() {
    let slot = filled_slot(GroupSize::FOUR);
    let (c1, c2) = (court(1), court(2));
    let occupancy = vec![taken(&c1, 10, 11), taken(&c2, 11, 12)];

    assert_eq!(
        assign_court(&slot, &[c1, c2], &occupancy),
        CourtAssignment::Unassigned
    );
    assert_eq!(unassigned_bucket(std::slice::from_ref(&slot)).len(), 1);
}

#[test]
fn the_slots_own_occupancy_is_ignored() {
    let slot = filled_slot(GroupSize::ONE);
    let c1 = court(1);
    let own = CourtOccupancy {
        court_id: c1.id,
        slot_id: slot.id,
        start: slot.start,
        end: slot.end,
    };

    assert_eq!(
        assign_court(&slot, &[c1.clone()], &[own]),
        CourtAssignment::Assigned(c1.court_ref())
    );
}

#[test]
fn batch_assignment_never_double_books_a_court() {
    let mut slots = vec![
        filled_slot(GroupSize::FOUR),
        filled_slot(GroupSize::TWO),
        filled_slot(GroupSize::ONE),
    ];
    slots[2].start = at(12, 0);
    slots[2].end = at(13, 0);
    let courts = vec![court(1), court(2)];
    let mut occupancy = Vec::new();

    let assigned = assign_pending_courts(&mut slots, &courts, &mut occupancy);

    assert_eq!(assigned.len(), 3);
    assert_eq!(slots[0].court.map(|c| c.number), Some(1));
    assert_eq!(slots[1].court.map(|c| c.number), Some(2));
    assert_eq!(slots[2].court.map(|c| c.number), Some(1));
    assert!(slots.iter().all(|s| s.status == SlotStatus::Confirmed));

    for (i, a) in occupancy.iter().enumerate() {
        for b in occupancy.iter().skip(i + 1) {
            assert!(a.court_id != b.court_id || !overlaps(a.start, a.end, b.start, b.end));
        }
    }
}

#[test]
fn batch_assignment_leaves_overflow_unassigned() {
    let mut slots = vec![filled_slot(GroupSize::FOUR), filled_slot(GroupSize::FOUR)];
    let courts = vec![court(1)];
    let mut occupancy = Vec::new();

    let assigned = assign_pending_courts(&mut slots, &courts, &mut occupancy);

    assert_eq!(assigned.len(), 1);
    let waiting = unassigned_bucket(&slots);
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].status, SlotStatus::Forming);
}

#[test]
fn unassigned_bucket_skips_cancelled_and_unfilled_slots() {
    let mut cancelled = filled_slot(GroupSize::TWO);
    cancelled.status = SlotStatus::Cancelled;
    let open = slot();
    let mut later = filled_slot(GroupSize::ONE);
    later.start = at(15, 0);
    later.end = at(16, 0);
    let early = filled_slot(GroupSize::ONE);

    let slots = vec![cancelled, open, later.clone(), early.clone()];
    let ids: Vec<Uuid> = unassigned_bucket(&slots).iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![early.id, later.id]);
}
