mod common;

use common::*;
use domain::{
    classify_slot, BookingError, Category, GroupSize, Level, ProposalDraft, SlotStatus,
    MAX_PRICE_CENTS,
};
use uuid::Uuid;

fn draft() -> ProposalDraft {
    ProposalDraft {
        club_id: Some(club_id()),
        instructor_id: Some(Uuid::new_v4()),
        start: Some(at(18, 0)),
        end: Some(at(19, 30)),
        level: Some("2.5-3.5".to_string()),
        category: Some("femenino".to_string()),
        max_players: Some(4),
        total_price_cents: Some(4800),
        credits_slots: vec![2, 1, 2],
        recycled_slots_only_points: None,
    }
}

fn rejection(draft: ProposalDraft) -> String {
    match draft.validate() {
        Err(BookingError::InvalidProposal(msg)) => msg,
        other => panic!("expected invalid proposal, got {other:?}"),
    }
}

#[test]
fn valid_draft_becomes_a_proposal_slot() {
    let proposal = draft().validate().unwrap();
    assert_eq!(proposal.category, Category::Female);
    assert_eq!(proposal.credits_slots, vec![GroupSize::ONE, GroupSize::TWO]);
    assert!(proposal.recycled_slots_only_points);

    let id = Uuid::new_v4();
    let slot = proposal.into_time_slot(id);
    assert_eq!(slot.id, id);
    assert_eq!(slot.status, SlotStatus::Proposal);
    assert!(slot.bookings.is_empty());
    assert!(slot.court.is_none());
}

#[test]
fn missing_club_or_date_is_rejected() {
    let mut no_club = draft();
    no_club.club_id = None;
    assert_eq!(rejection(no_club), "club is required");

    let mut no_date = draft();
    no_date.start = None;
    assert_eq!(rejection(no_date), "date is required");
}

#[test]
fn end_must_follow_start() {
    let mut same = draft();
    same.end = same.start;
    assert_eq!(rejection(same), "end time must be after start time");
}

#[test]
fn level_is_required_and_ordered() {
    let mut blank = draft();
    blank.level = Some("  ".to_string());
    assert_eq!(rejection(blank), "level range is required");

    let mut inverted = draft();
    inverted.level = Some("5.0-3.0".to_string());
    assert!(matches!(
        inverted.validate(),
        Err(BookingError::InvalidLevel(_))
    ));

    let mut open = draft();
    open.level = Some("abierto".to_string());
    assert_eq!(open.validate().unwrap().level, Level::Open);
}

#[test]
fn max_players_must_be_a_group_size() {
    for bad in [0, 5, -1] {
        let mut d = draft();
        d.max_players = Some(bad);
        assert_eq!(rejection(d), "max players must be between 1 and 4");
    }

    let mut default = draft();
    default.max_players = None;
    assert_eq!(default.validate().unwrap().max_players, GroupSize::FOUR);
}

#[test]
fn negative_price_is_rejected() {
    let mut d = draft();
    d.total_price_cents = Some(-1);
    assert_eq!(rejection(d), "price cannot be negative");
}

#[test]
fn absurd_price_is_rejected() {
    let mut d = draft();
    d.total_price_cents = Some(i64::MAX);
    assert_eq!(rejection(d), "price is above the allowed maximum");

    let mut just_over = draft();
    just_over.total_price_cents = Some(MAX_PRICE_CENTS + 1);
    assert_eq!(rejection(just_over), "price is above the allowed maximum");
}

#[test]
fn highest_allowed_price_still_prices_every_modality() {
    let mut d = draft();
    d.total_price_cents = Some(MAX_PRICE_CENTS);
    let slot = d.validate().unwrap().into_time_slot(Uuid::new_v4());

    let pricing = classify_slot(&slot);
    assert_eq!(pricing.len(), 4);
    assert_eq!(pricing[0].cost.cents, MAX_PRICE_CENTS);
    assert_eq!(pricing[3].cost.cents, MAX_PRICE_CENTS / 4);
    assert!(pricing.iter().all(|p| p.cost.cents > 0 && p.cost.points > 0));
}

#[test]
fn credits_slots_cannot_exceed_max_players() {
    let mut d = draft();
    d.max_players = Some(2);
    d.credits_slots = vec![3];
    assert_eq!(rejection(d), "credits slots cannot exceed max players");
}
