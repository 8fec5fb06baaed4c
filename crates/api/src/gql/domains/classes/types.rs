use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::error::ResultExt;
use crate::gql::loaders::{ClubLoader, UserLoader};
use crate::gql::types::{Club, User};
use domain::{
    classify_slot, recycling_summary, resolve_modalities, CourtAssignment, ProposalDraft,
    SeatPayment,
};

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum SlotStatus {
    /// Offered by an instructor, nobody booked yet
    Proposal,
    PreRegistration,
    /// A modality filled; waiting for a court or more confirmations
    Forming,
    Confirmed,
    ConfirmedPrivate,
    Cancelled,
}

impl From<domain::SlotStatus> for SlotStatus {
    fn from(status: domain::SlotStatus) -> Self {
        match status {
            domain::SlotStatus::Proposal => Self::Proposal,
            domain::SlotStatus::PreRegistration => Self::PreRegistration,
            domain::SlotStatus::Forming => Self::Forming,
            domain::SlotStatus::Confirmed => Self::Confirmed,
            domain::SlotStatus::ConfirmedPrivate => Self::ConfirmedPrivate,
            domain::SlotStatus::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum ClassCategory {
    Open,
    Male,
    Female,
}

impl From<domain::Category> for ClassCategory {
    fn from(category: domain::Category) -> Self {
        match category {
            domain::Category::Open => Self::Open,
            domain::Category::Male => Self::Male,
            domain::Category::Female => Self::Female,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum SeatPaymentRule {
    Currency,
    PointsOnly,
    CurrencyOrPoints,
}

impl From<SeatPayment> for SeatPaymentRule {
    fn from(rule: SeatPayment) -> Self {
        match rule {
            SeatPayment::Currency => Self::Currency,
            SeatPayment::PointsOnly => Self::PointsOnly,
            SeatPayment::CurrencyOrPoints => Self::CurrencyOrPoints,
        }
    }
}

/// Seat usage and pricing of one group-size option.
#[derive(SimpleObject, Clone, Debug)]
pub struct Modality {
    pub group_size: i32,
    pub occupied: i32,
    pub confirmed: i32,
    pub available: i32,
    pub complete: bool,
    pub seat_price_cents: i64,
    pub seat_price_points: i64,
    pub has_recycled: bool,
    /// How the next free seat can be paid; null when the modality is full
    pub next_seat_payment: Option<SeatPaymentRule>,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct RecyclingInfo {
    pub has_recycled_slots: bool,
    pub available_recycled_slots: i32,
    pub recycled_slots_only_points: bool,
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct TimeSlot {
    pub id: ID,
    pub club_id: ID,
    pub instructor_id: ID,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// "open" or a range such as "2.5-3.5"
    pub level: String,
    pub category: ClassCategory,
    pub max_players: i32,
    pub total_price_cents: i64,
    pub court_id: Option<ID>,
    pub court_number: Option<i32>,
    pub status: SlotStatus,
    pub confirmed_size: Option<i32>,
    pub credits_slots: Vec<i32>,
    pub recycled_slots_only_points: bool,
    pub modalities: Vec<Modality>,
    pub recycling: RecyclingInfo,
    #[graphql(skip)]
    pub club_uuid: Uuid,
    #[graphql(skip)]
    pub instructor_uuid: Uuid,
}

#[ComplexObject]
impl TimeSlot {
    async fn instructor(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loader = ctx.data::<DataLoader<UserLoader>>()?;
        let row = loader
            .load_one(self.instructor_uuid)
            .await
            .gql_err("Data loading failed")?;
        Ok(row.map(User::from))
    }

    async fn club(&self, ctx: &Context<'_>) -> Result<Option<Club>> {
        let loader = ctx.data::<DataLoader<ClubLoader>>()?;
        let row = loader
            .load_one(self.club_uuid)
            .await
            .gql_err("Data loading failed")?;
        Ok(row.map(Club::from))
    }
}

impl From<&domain::TimeSlot> for TimeSlot {
    fn from(slot: &domain::TimeSlot) -> Self {
        let modalities = resolve_modalities(slot)
            .into_iter()
            .zip(classify_slot(slot))
            .map(|(seats, pricing)| Modality {
                group_size: i32::from(seats.size),
                occupied: seats.occupied as i32,
                confirmed: seats.confirmed as i32,
                available: seats.available as i32,
                complete: seats.complete,
                seat_price_cents: pricing.cost.cents,
                seat_price_points: pricing.cost.points,
                has_recycled: pricing.has_recycled,
                next_seat_payment: pricing.next_seat().map(SeatPaymentRule::from),
            })
            .collect();

        let recycling = recycling_summary(slot);

        Self {
            id: slot.id.into(),
            club_id: slot.club_id.into(),
            instructor_id: slot.instructor_id.into(),
            start_time: slot.start,
            end_time: slot.end,
            level: slot.level.to_string(),
            category: slot.category.into(),
            max_players: i32::from(slot.max_players),
            total_price_cents: slot.total_price_cents,
            court_id: slot.court.map(|c| c.id.into()),
            court_number: slot.court.map(|c| c.number),
            status: slot.status.into(),
            confirmed_size: slot.confirmed_size.map(i32::from),
            credits_slots: slot.credits_slots.iter().map(|s| i32::from(*s)).collect(),
            recycled_slots_only_points: slot.recycled_slots_only_points,
            modalities,
            recycling: RecyclingInfo {
                has_recycled_slots: recycling.has_recycled_slots,
                available_recycled_slots: recycling.available_recycled_slots as i32,
                recycled_slots_only_points: recycling.recycled_slots_only_points,
            },
            club_uuid: slot.club_id,
            instructor_uuid: slot.instructor_id,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct ProposeClassInput {
    pub club_id: Uuid,
    /// Defaults to the caller; only admins may propose for someone else
    pub instructor_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub level: String,
    pub category: Option<String>,
    pub max_players: Option<i32>,
    pub total_price_cents: i64,
    pub credits_slots: Option<Vec<i32>>,
    pub recycled_slots_only_points: Option<bool>,
}

impl From<ProposeClassInput> for ProposalDraft {
    fn from(input: ProposeClassInput) -> Self {
        ProposalDraft {
            club_id: Some(input.club_id),
            instructor_id: input.instructor_id,
            start: Some(input.start_time),
            end: Some(input.end_time),
            level: Some(input.level),
            category: input.category,
            max_players: input.max_players.map(i64::from),
            total_price_cents: Some(input.total_price_cents),
            credits_slots: input
                .credits_slots
                .unwrap_or_default()
                .into_iter()
                .map(i64::from)
                .collect(),
            recycled_slots_only_points: input.recycled_slots_only_points,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum CourtAssignmentOutcome {
    AlreadyAssigned,
    NotReady,
    Assigned,
    /// No court is free; the class waits in the unassigned bucket
    Unassigned,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct CourtAssignmentResult {
    pub time_slot_id: ID,
    pub outcome: CourtAssignmentOutcome,
    pub court_id: Option<ID>,
    pub court_number: Option<i32>,
}

impl CourtAssignmentResult {
    pub fn new(time_slot_id: Uuid, assignment: CourtAssignment) -> Self {
        let (outcome, court) = match assignment {
            CourtAssignment::AlreadyAssigned(c) => (CourtAssignmentOutcome::AlreadyAssigned, Some(c)),
            CourtAssignment::NotReady => (CourtAssignmentOutcome::NotReady, None),
            CourtAssignment::Assigned(c) => (CourtAssignmentOutcome::Assigned, Some(c)),
            CourtAssignment::Unassigned => (CourtAssignmentOutcome::Unassigned, None),
        };
        Self {
            time_slot_id: time_slot_id.into(),
            outcome,
            court_id: court.map(|c| c.id.into()),
            court_number: court.map(|c| c.number),
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum SlotEventType {
    Proposed,
    Booked,
    BookingCancelled,
    Completed,
    CourtAssigned,
    Cancelled,
    Expired,
}

/// Broadcast on the club channel whenever a class changes.
#[derive(SimpleObject, Clone, Debug)]
pub struct SlotUpdateEvent {
    pub club_id: ID,
    pub time_slot_id: ID,
    pub event_type: SlotEventType,
    pub status: SlotStatus,
    pub court_number: Option<i32>,
    pub occurred_at: DateTime<Utc>,
}

impl SlotUpdateEvent {
    pub fn new(slot: &domain::TimeSlot, event_type: SlotEventType) -> Self {
        Self {
            club_id: slot.club_id.into(),
            time_slot_id: slot.id.into(),
            event_type,
            status: slot.status.into(),
            court_number: slot.court.map(|c| c.number),
            occurred_at: Utc::now(),
        }
    }
}
