//! Class booking workflows.
//!
//! Every write locks the slot row (`FOR UPDATE`) before the booking rules run,
//! applies the resulting plan inside the same transaction and only then
//! publishes events. Resolvers and REST handlers stay thin wrappers around
//! these functions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgConnection, PgExecutor, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use domain::{
    accounts_to_lock, assign_court, assign_pending_courts, build_calendar, derive_status,
    plan_booking, plan_cancellation, plan_class_cancellation, plan_expiry, Booking, BookingError,
    BookingPlan, BookingRequest, BookingStatus, CalendarView, CalendarWindow, CancellationPlan,
    ClassCancellation, Court, CourtAssignment, CourtOccupancy, CourtRef, PaymentMethod,
    ProposalDraft, Refund, TimeSlot,
};
use infra::models::{BookingRow, CourtRow, TimeSlotRow, UserRow};
use infra::pagination::LimitOffset;
use infra::repos::{
    bookings, clubs, courts, time_slots, users, CreateBooking, CreateTimeSlot, SlotState,
    TimeSlotFilter,
};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::gql::domains::activity_log::log_and_publish;
use crate::gql::domains::users::types::{
    TITLE_BOOKING_DISPLACED, TITLE_CLASS_CANCELLED, TITLE_CLASS_CONFIRMED, TITLE_COURT_ASSIGNED,
};
use crate::gql::subscriptions::{
    cleanup_slot_channel, publish_slot_update, publish_user_notification,
};
use crate::gql::types::{
    ActivityEventCategory, Role, SlotEventType, SlotUpdateEvent, UserNotification,
};

/// Upper bound on classes shown in one calendar window.
const CALENDAR_MAX_SLOTS: i64 = 500;

fn slot_not_found() -> AppError {
    AppError::NotFound("Time slot not found".to_string())
}

fn slot_state(slot: &TimeSlot) -> SlotState {
    SlotState {
        status: slot.status.as_str().to_string(),
        court_id: slot.court.map(|c| c.id),
        confirmed_size: slot.confirmed_size.map(|s| i16::from(s.get())),
    }
}

fn to_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, AppError> {
    rows.into_iter()
        .map(|row| Booking::try_from(row).map_err(AppError::from))
        .collect()
}

async fn attach_bookings<'e>(
    executor: impl PgExecutor<'e>,
    rows: Vec<TimeSlotRow>,
) -> Result<Vec<TimeSlot>, AppError> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut by_slot: HashMap<Uuid, Vec<Booking>> = HashMap::new();

    if !ids.is_empty() {
        for row in bookings::list_by_slots(executor, &ids).await? {
            let slot_id = row.time_slot_id;
            by_slot
                .entry(slot_id)
                .or_default()
                .push(Booking::try_from(row)?);
        }
    }

    rows.into_iter()
        .map(|row| {
            let slot_bookings = by_slot.remove(&row.id).unwrap_or_default();
            row.into_time_slot(slot_bookings).map_err(AppError::from)
        })
        .collect()
}

/// Locks the slot row and reads every booking of the slot under that lock.
async fn lock_slot(conn: &mut PgConnection, slot_id: Uuid) -> Result<TimeSlot, AppError> {
    let row = time_slots::get_for_update(&mut *conn, slot_id)
        .await?
        .ok_or_else(slot_not_found)?;
    let slot_bookings = to_bookings(bookings::list_by_slot(&mut *conn, slot_id).await?)?;
    Ok(row.into_time_slot(slot_bookings)?)
}

pub async fn load_slot(pool: &PgPool, slot_id: Uuid) -> Result<TimeSlot, AppError> {
    let row = time_slots::get_by_id(pool, slot_id)
        .await?
        .ok_or_else(slot_not_found)?;
    let slot_bookings = to_bookings(bookings::list_by_slot(pool, slot_id).await?)?;
    Ok(row.into_time_slot(slot_bookings)?)
}

pub async fn load_slots(
    pool: &PgPool,
    filter: TimeSlotFilter,
    page: Option<LimitOffset>,
) -> Result<Vec<TimeSlot>, AppError> {
    let rows = time_slots::list(pool, filter, page).await?;
    attach_bookings(pool, rows).await
}

pub async fn load_slots_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<TimeSlot>, AppError> {
    let rows = time_slots::get_by_ids(pool, ids).await?;
    attach_bookings(pool, rows).await
}

/// Credits points refunds back to their owners. Currency refunds go through
/// the club's payment desk and are only recorded.
/// Locks every account touched by `refunds` (plus `payer`) in id order.
async fn lock_accounts(
    conn: &mut PgConnection,
    refunds: &[Refund],
    payer: Option<Uuid>,
) -> Result<Vec<UserRow>, AppError> {
    let ids = accounts_to_lock(refunds, payer);
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(users::lock_many(&mut *conn, &ids).await?)
}

async fn settle_refunds(conn: &mut PgConnection, refunds: &[Refund]) -> Result<(), AppError> {
    lock_accounts(&mut *conn, refunds, None).await?;

    let mut ordered: Vec<&Refund> = refunds.iter().filter(|r| r.amount > 0).collect();
    ordered.sort_by_key(|r| r.user_id);
    for refund in ordered {
        match refund.method {
            PaymentMethod::Points => {
                users::adjust_points(&mut *conn, refund.user_id, refund.amount).await?;
            }
            PaymentMethod::Currency => info!(
                booking_id = %refund.booking_id,
                user_id = %refund.user_id,
                amount_cents = refund.amount,
                "currency refund owed"
            ),
        }
    }
    Ok(())
}

/// Runs court assignment for a slot whose row is already locked.
async fn try_assign_court(
    conn: &mut PgConnection,
    slot: &mut TimeSlot,
) -> Result<CourtAssignment, AppError> {
    let active: Vec<Court> = courts::list_active_by_club_for_update(&mut *conn, slot.club_id)
        .await?
        .iter()
        .map(CourtRow::to_court)
        .collect();
    let occupancy: Vec<CourtOccupancy> =
        courts::occupancy_for_club(&mut *conn, slot.club_id, slot.start, slot.end)
            .await?
            .into_iter()
            .map(CourtOccupancy::from)
            .collect();

    let outcome = assign_court(slot, &active, &occupancy);
    if let CourtAssignment::Assigned(court) = outcome {
        slot.court = Some(court);
        slot.status = derive_status(slot);
    }
    Ok(outcome)
}

fn notify(user_id: Uuid, slot: &TimeSlot, title: &str, message: String) {
    publish_user_notification(UserNotification {
        user_id: user_id.into(),
        title: title.to_string(),
        message,
        time_slot_id: Some(slot.id.into()),
        created_at: Utc::now(),
    });
}

fn ensure_owner_or_admin(slot: &TimeSlot, actor: &AuthUser) -> Result<(), AppError> {
    if slot.instructor_id == actor.id || actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the class instructor or an administrator can manage this class".to_string(),
        ))
    }
}

async fn announce_court(pool: &PgPool, slot: &TimeSlot, court: CourtRef, actor: Option<Uuid>) {
    log_and_publish(
        pool,
        slot.id,
        ActivityEventCategory::Court,
        "court_assigned",
        actor,
        Some(court.id),
        json!({ "courtNumber": court.number }),
    )
    .await;

    for booking in slot.active_bookings() {
        notify(
            booking.user_id,
            slot,
            TITLE_COURT_ASSIGNED,
            format!("Your class at {} will be played on court {}", slot.start, court.number),
        );
    }
    publish_slot_update(SlotUpdateEvent::new(slot, SlotEventType::CourtAssigned));
}

// ── Proposals ────────────────────────────────────────────────────────

pub async fn propose_class(
    pool: &PgPool,
    actor: &AuthUser,
    mut draft: ProposalDraft,
    now: DateTime<Utc>,
) -> Result<TimeSlot, AppError> {
    actor.require(Role::Instructor)?;
    match draft.instructor_id {
        None => draft.instructor_id = Some(actor.id),
        Some(id) if id != actor.id && !actor.is_admin() => {
            return Err(AppError::Forbidden(
                "Instructors can only propose their own classes".to_string(),
            ))
        }
        Some(_) => {}
    }

    let proposal = draft.validate()?;
    if proposal.start <= now {
        return Err(BookingError::InvalidProposal("date must be in the future".to_string()).into());
    }

    clubs::get_by_id(pool, proposal.club_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Club not found".to_string()))?;

    let instructor = users::get_by_id(pool, proposal.instructor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;
    if Role::from(instructor.role) == Role::Player {
        return Err(AppError::BadRequest(
            "Classes can only be assigned to instructors".to_string(),
        ));
    }

    let slot = proposal.into_time_slot(Uuid::new_v4());
    time_slots::create(
        pool,
        CreateTimeSlot {
            id: slot.id,
            club_id: slot.club_id,
            instructor_id: slot.instructor_id,
            start_time: slot.start,
            end_time: slot.end,
            level: slot.level.to_string(),
            category: slot.category.as_str().to_string(),
            max_players: i16::from(slot.max_players.get()),
            total_price_cents: slot.total_price_cents,
            credits_slots: slot
                .credits_slots
                .iter()
                .map(|s| i16::from(s.get()))
                .collect(),
            recycled_slots_only_points: slot.recycled_slots_only_points,
        },
    )
    .await?;

    info!(slot_id = %slot.id, club_id = %slot.club_id, "class proposed");

    log_and_publish(
        pool,
        slot.id,
        ActivityEventCategory::Proposal,
        "proposed",
        Some(actor.id),
        Some(slot.instructor_id),
        json!({
            "level": slot.level.to_string(),
            "category": slot.category.as_str(),
            "maxPlayers": i64::from(slot.max_players),
            "totalPriceCents": slot.total_price_cents,
        }),
    )
    .await;
    publish_slot_update(SlotUpdateEvent::new(&slot, SlotEventType::Proposed));

    Ok(slot)
}

// ── Booking ──────────────────────────────────────────────────────────

pub struct BookClassParams {
    pub slot_id: Uuid,
    pub user_id: Uuid,
    pub request: BookingRequest,
    pub now: DateTime<Utc>,
}

#[derive(Debug)]
pub struct BookClassResult {
    pub slot: TimeSlot,
    pub plan: BookingPlan,
    pub points_balance: i64,
    /// Present when this booking filled its modality
    pub court: Option<CourtAssignment>,
}

/// Books one seat (or a whole modality when private) for the caller.
///
/// The slot row is locked first, then the booker and every refunded account
/// in id order. Two players racing for the last seat are serialized and the
/// loser gets `ModalityFull`.
pub async fn book_class(pool: &PgPool, params: BookClassParams) -> Result<BookClassResult, AppError> {
    let mut tx = pool.begin().await?;

    let mut slot = lock_slot(&mut tx, params.slot_id).await?;
    let unlocked = users::get_by_id(&mut *tx, params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // Displaced bookings depend only on the slot and the request
    let displaced = plan_booking(&slot, &unlocked.to_player()?, &params.request, params.now)
        .map(|preview| preview.displaced)
        .unwrap_or_default();
    let user = lock_accounts(&mut tx, &displaced, Some(params.user_id))
        .await?
        .into_iter()
        .find(|u| u.id == params.user_id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if !user.is_active {
        return Err(AppError::Forbidden("Account is disabled".to_string()));
    }
    let player = user.to_player()?;

    let plan = plan_booking(&slot, &player, &params.request, params.now)?;

    let mut points_balance = user.points_balance;
    if plan.charge.method == PaymentMethod::Points && plan.charge.amount > 0 {
        points_balance = users::adjust_points(&mut *tx, user.id, -plan.charge.amount)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => BookingError::InsufficientPoints {
                    required: plan.charge.amount,
                    available: user.points_balance,
                }
                .into(),
                other => AppError::from(other),
            })?;
    }

    bookings::create(
        &mut *tx,
        CreateBooking {
            id: plan.booking.id,
            time_slot_id: slot.id,
            user_id: user.id,
            group_size: i16::from(plan.booking.group_size.get()),
            status: plan.booking.status.as_str().to_string(),
            is_private: plan.booking.is_private,
            payment_method: plan.booking.payment_method.as_str().to_string(),
            amount_paid: plan.booking.amount_paid,
        },
    )
    .await?;

    bookings::update_status_many(&mut *tx, &plan.promote, BookingStatus::Confirmed.as_str())
        .await?;
    let displaced: Vec<Uuid> = plan.displaced.iter().map(|r| r.booking_id).collect();
    bookings::update_status_many(&mut *tx, &displaced, BookingStatus::Cancelled.as_str()).await?;
    settle_refunds(&mut tx, &plan.displaced).await?;

    plan.apply(&mut slot);

    let court = match plan.completed {
        Some(_) => Some(try_assign_court(&mut tx, &mut slot).await?),
        None => None,
    };

    time_slots::update_state(&mut *tx, slot.id, &slot_state(&slot)).await?;
    tx.commit().await?;

    info!(
        slot_id = %slot.id,
        user_id = %user.id,
        group_size = %plan.booking.group_size,
        status = %slot.status,
        "class booked"
    );

    announce_booking(pool, &slot, &plan, court).await;

    Ok(BookClassResult {
        slot,
        plan,
        points_balance,
        court,
    })
}

async fn announce_booking(
    pool: &PgPool,
    slot: &TimeSlot,
    plan: &BookingPlan,
    court: Option<CourtAssignment>,
) {
    let booking = &plan.booking;
    log_and_publish(
        pool,
        slot.id,
        ActivityEventCategory::Booking,
        "booked",
        Some(booking.user_id),
        Some(booking.id),
        json!({
            "groupSize": i64::from(booking.group_size),
            "paymentMethod": booking.payment_method.as_str(),
            "amount": booking.amount_paid,
            "private": booking.is_private,
        }),
    )
    .await;

    let Some(size) = plan.completed else {
        publish_slot_update(SlotUpdateEvent::new(slot, SlotEventType::Booked));
        return;
    };

    log_and_publish(
        pool,
        slot.id,
        ActivityEventCategory::Lifecycle,
        "completed",
        Some(booking.user_id),
        None,
        json!({ "groupSize": i64::from(size), "displaced": plan.displaced.len() }),
    )
    .await;

    for member in slot.bookings_for(size).filter(|b| b.is_confirmed()) {
        notify(
            member.user_id,
            slot,
            TITLE_CLASS_CONFIRMED,
            format!("Your {size}-player class at {} is full", slot.start),
        );
    }

    for refund in &plan.displaced {
        log_and_publish(
            pool,
            slot.id,
            ActivityEventCategory::Booking,
            "displaced",
            None,
            Some(refund.booking_id),
            json!({ "refundMethod": refund.method.as_str(), "refundAmount": refund.amount }),
        )
        .await;
        notify(
            refund.user_id,
            slot,
            TITLE_BOOKING_DISPLACED,
            format!(
                "The class at {} filled as a {size}-player class; your booking was refunded",
                slot.start
            ),
        );
    }

    publish_slot_update(SlotUpdateEvent::new(slot, SlotEventType::Completed));

    match court {
        Some(CourtAssignment::Assigned(court)) => announce_court(pool, slot, court, None).await,
        Some(CourtAssignment::Unassigned) => {
            warn!(slot_id = %slot.id, club_id = %slot.club_id, "no free court for filled class");
            log_and_publish(
                pool,
                slot.id,
                ActivityEventCategory::Court,
                "court_unassigned",
                None,
                None,
                json!({}),
            )
            .await;
        }
        _ => {}
    }
}

// ── Cancellation ─────────────────────────────────────────────────────

pub struct CancelBookingResult {
    pub slot: TimeSlot,
    pub plan: CancellationPlan,
}

/// Cancels a booking of the caller (admins may cancel any booking).
pub async fn cancel_booking(
    pool: &PgPool,
    booking_id: Uuid,
    actor: &AuthUser,
    now: DateTime<Utc>,
) -> Result<CancelBookingResult, AppError> {
    let row = bookings::get_by_id(pool, booking_id)
        .await?
        .ok_or(AppError::Booking(BookingError::BookingNotFound))?;
    if row.user_id != actor.id && !actor.is_admin() {
        return Err(AppError::Forbidden(
            "You can only cancel your own bookings".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    let mut slot = lock_slot(&mut tx, row.time_slot_id).await?;

    let plan = plan_cancellation(&slot, booking_id, now)?;

    bookings::update_status(
        &mut *tx,
        booking_id,
        BookingStatus::Cancelled.as_str(),
        plan.recycled,
    )
    .await?;
    settle_refunds(&mut tx, std::slice::from_ref(&plan.refund)).await?;

    plan.apply(&mut slot);
    time_slots::update_state(&mut *tx, slot.id, &slot_state(&slot)).await?;
    tx.commit().await?;

    info!(
        slot_id = %slot.id,
        booking_id = %booking_id,
        recycled = plan.recycled,
        "booking cancelled"
    );

    log_and_publish(
        pool,
        slot.id,
        ActivityEventCategory::Booking,
        if plan.recycled { "recycled" } else { "cancelled" },
        Some(actor.id),
        Some(booking_id),
        json!({
            "refundMethod": plan.refund.method.as_str(),
            "refundAmount": plan.refund.amount,
            "releasedCourt": plan.release_court,
        }),
    )
    .await;
    publish_slot_update(SlotUpdateEvent::new(&slot, SlotEventType::BookingCancelled));

    Ok(CancelBookingResult { slot, plan })
}

async fn close_class(
    conn: &mut PgConnection,
    slot: &mut TimeSlot,
    cancellation: &ClassCancellation,
) -> Result<(), AppError> {
    let ids: Vec<Uuid> = cancellation.refunds.iter().map(|r| r.booking_id).collect();
    bookings::update_status_many(&mut *conn, &ids, BookingStatus::Cancelled.as_str()).await?;
    settle_refunds(&mut *conn, &cancellation.refunds).await?;
    cancellation.apply(slot);
    time_slots::update_state(&mut *conn, slot.id, &slot_state(slot)).await?;
    Ok(())
}

fn announce_closed(slot: &TimeSlot, cancellation: &ClassCancellation, reason: &str) {
    for refund in &cancellation.refunds {
        notify(
            refund.user_id,
            slot,
            TITLE_CLASS_CANCELLED,
            format!("The class at {} was {reason}; your booking was refunded", slot.start),
        );
    }
}

/// Instructor or admin calls off a class; every active booking is refunded.
pub async fn cancel_class(
    pool: &PgPool,
    slot_id: Uuid,
    actor: &AuthUser,
    now: DateTime<Utc>,
) -> Result<TimeSlot, AppError> {
    let mut tx = pool.begin().await?;
    let mut slot = lock_slot(&mut tx, slot_id).await?;
    ensure_owner_or_admin(&slot, actor)?;

    let cancellation = plan_class_cancellation(&slot, now)?;
    close_class(&mut tx, &mut slot, &cancellation).await?;
    tx.commit().await?;

    info!(slot_id = %slot.id, refunds = cancellation.refunds.len(), "class cancelled");

    log_and_publish(
        pool,
        slot.id,
        ActivityEventCategory::Lifecycle,
        "class_cancelled",
        Some(actor.id),
        None,
        json!({ "refunds": cancellation.refunds.len() }),
    )
    .await;
    announce_closed(&slot, &cancellation, "cancelled");
    publish_slot_update(SlotUpdateEvent::new(&slot, SlotEventType::Cancelled));
    cleanup_slot_channel(slot.id);

    Ok(slot)
}

/// Cancels classes that reached their start time without a full modality.
/// Returns the slots that were expired.
pub async fn expire_stale(
    pool: &PgPool,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<TimeSlot>, AppError> {
    let mut tx = pool.begin().await?;

    let rows = time_slots::list_expirable_for_update(&mut *tx, now, limit).await?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let slots = attach_bookings(&mut *tx, rows).await?;

    let mut expired: Vec<(TimeSlot, ClassCancellation)> = slots
        .into_iter()
        .filter_map(|slot| plan_expiry(&slot, now).map(|cancellation| (slot, cancellation)))
        .collect();

    let refunds: Vec<Refund> = expired
        .iter()
        .flat_map(|(_, cancellation)| cancellation.refunds.iter().copied())
        .collect();
    lock_accounts(&mut tx, &refunds, None).await?;

    for (slot, cancellation) in expired.iter_mut() {
        close_class(&mut tx, slot, cancellation).await?;
    }

    tx.commit().await?;

    for (slot, cancellation) in &expired {
        info!(slot_id = %slot.id, refunds = cancellation.refunds.len(), "class expired");
        log_and_publish(
            pool,
            slot.id,
            ActivityEventCategory::Lifecycle,
            "expired",
            None,
            None,
            json!({ "refunds": cancellation.refunds.len() }),
        )
        .await;
        announce_closed(slot, cancellation, "not filled in time");
        publish_slot_update(SlotUpdateEvent::new(slot, SlotEventType::Expired));
        cleanup_slot_channel(slot.id);
    }

    Ok(expired.into_iter().map(|(slot, _)| slot).collect())
}

// ── Courts ───────────────────────────────────────────────────────────

/// Manual court assignment. A slot that already holds a court is returned
/// untouched.
pub async fn assign_court_to_slot(
    pool: &PgPool,
    slot_id: Uuid,
    actor: &AuthUser,
) -> Result<(TimeSlot, CourtAssignment), AppError> {
    let mut tx = pool.begin().await?;
    let mut slot = lock_slot(&mut tx, slot_id).await?;
    ensure_owner_or_admin(&slot, actor)?;

    let outcome = try_assign_court(&mut tx, &mut slot).await?;
    if let CourtAssignment::Assigned(court) = outcome {
        time_slots::update_state(&mut *tx, slot.id, &slot_state(&slot)).await?;
        tx.commit().await?;

        info!(slot_id = %slot.id, court_number = court.number, "court assigned");
        announce_court(pool, &slot, court, Some(actor.id)).await;
    }

    Ok((slot, outcome))
}

/// Gives courts to every filled upcoming class of a club still waiting for
/// one, earliest first.
pub async fn assign_pending_for_club(
    pool: &PgPool,
    club_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<(Uuid, CourtRef)>, AppError> {
    let mut tx = pool.begin().await?;

    let active: Vec<Court> = courts::list_active_by_club_for_update(&mut *tx, club_id)
        .await?
        .iter()
        .map(CourtRow::to_court)
        .collect();
    let rows = time_slots::list_awaiting_court_for_update(&mut *tx, club_id, now).await?;
    let mut slots = attach_bookings(&mut *tx, rows).await?;

    let window = (
        slots.iter().map(|s| s.start).min(),
        slots.iter().map(|s| s.end).max(),
    );
    let (Some(from), Some(to)) = window else {
        return Ok(Vec::new());
    };

    let mut occupancy: Vec<CourtOccupancy> = courts::occupancy_for_club(&mut *tx, club_id, from, to)
        .await?
        .into_iter()
        .map(CourtOccupancy::from)
        .collect();

    let assigned = assign_pending_courts(&mut slots, &active, &mut occupancy);
    for slot in slots.iter().filter(|s| assigned.iter().any(|(id, _)| *id == s.id)) {
        time_slots::update_state(&mut *tx, slot.id, &slot_state(slot)).await?;
    }
    tx.commit().await?;

    for (slot_id, court) in &assigned {
        if let Some(slot) = slots.iter().find(|s| s.id == *slot_id) {
            info!(slot_id = %slot.id, court_number = court.number, "court assigned on retry");
            announce_court(pool, slot, *court, None).await;
        }
    }

    Ok(assigned)
}

// ── Calendar ─────────────────────────────────────────────────────────

pub async fn admin_calendar(
    pool: &PgPool,
    club_id: Uuid,
    window: CalendarWindow,
) -> Result<CalendarView, AppError> {
    if window.to <= window.from {
        return Err(AppError::BadRequest(
            "Calendar window must end after it starts".to_string(),
        ));
    }

    let club_courts: Vec<Court> = courts::list_by_club(pool, club_id)
        .await?
        .iter()
        .map(CourtRow::to_court)
        .collect();

    let slots = load_slots(
        pool,
        TimeSlotFilter {
            club_id: Some(club_id),
            from: Some(window.from),
            to: Some(window.to),
            ..Default::default()
        },
        Some(LimitOffset {
            limit: CALENDAR_MAX_SLOTS,
            offset: 0,
        }),
    )
    .await?;

    Ok(build_calendar(&club_courts, &slots, window))
}
