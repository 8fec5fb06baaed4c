use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::credits::{authorize_payment, classify_modality, seat_cost, Charge};
use crate::error::BookingError;
use crate::level::{Gender, LevelValue};
use crate::modality::{
    check_seat_available, displaced_bookings, effective_completion, ModalityOccupancy,
};
use crate::slot::{
    Booking, BookingStatus, GroupSize, PaymentMethod, SlotStatus, TimeSlot,
};

/// Status implied by the slot's bookings and court.
///
/// A cancelled slot stays cancelled. Once a modality has filled the slot is
/// `Forming` until a court is assigned, then `Confirmed` (or
/// `ConfirmedPrivate` when one player paid for the whole modality). Recycled
/// seats never demote a confirmed class.
pub fn derive_status(slot: &TimeSlot) -> SlotStatus {
    if slot.status == SlotStatus::Cancelled {
        return SlotStatus::Cancelled;
    }

    let filled = slot
        .confirmed_size
        .or_else(|| effective_completion(&slot.bookings));

    match (filled, slot.court) {
        (Some(size), Some(_)) => {
            let private = slot
                .bookings_for(size)
                .any(|b| b.is_private && b.is_active());
            if private {
                SlotStatus::ConfirmedPrivate
            } else {
                SlotStatus::Confirmed
            }
        }
        (Some(_), None) => SlotStatus::Forming,
        (None, _) => {
            if slot.active_bookings().next().is_none() {
                SlotStatus::Proposal
            } else if slot.active_bookings().any(|b| b.is_confirmed()) {
                SlotStatus::Forming
            } else {
                SlotStatus::PreRegistration
            }
        }
    }
}

/// The booking party as the rules see them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: Uuid,
    pub level: Option<LevelValue>,
    pub gender: Option<Gender>,
    pub points_balance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub group_size: GroupSize,
    pub payment_method: PaymentMethod,
    /// Book every seat of the modality at once
    pub private: bool,
}

/// Money or points owed back to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub method: PaymentMethod,
    pub amount: i64,
}

impl Refund {
    /// Return exactly what was paid, by the same method.
    pub fn in_full(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            user_id: booking.user_id,
            method: booking.payment_method,
            amount: booking.amount_paid,
        }
    }
}

/// Accounts whose points balance a change touches, sorted by id.
///
/// Balances are updated under row locks, so every transaction takes them in
/// this order.
pub fn accounts_to_lock(refunds: &[Refund], payer: Option<Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = refunds
        .iter()
        .filter(|r| r.method == PaymentMethod::Points && r.amount > 0)
        .map(|r| r.user_id)
        .chain(payer)
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPlan {
    pub booking: Booking,
    pub charge: Charge,
    /// Pending bookings confirmed because this booking filled their modality
    pub promote: Vec<Uuid>,
    pub completed: Option<GroupSize>,
    /// Bookings in other modalities that lose their seat, with their refunds
    pub displaced: Vec<Refund>,
}

impl BookingPlan {
    pub fn apply(&self, slot: &mut TimeSlot) {
        for booking in slot.bookings.iter_mut() {
            if self.promote.contains(&booking.id) {
                booking.status = BookingStatus::Confirmed;
            }
            if self.displaced.iter().any(|r| r.booking_id == booking.id) {
                booking.status = BookingStatus::Cancelled;
                booking.is_recycled = false;
            }
        }
        slot.bookings.push(self.booking.clone());
        if let Some(size) = self.completed {
            slot.confirmed_size = Some(size);
        }
        slot.status = derive_status(slot);
    }
}

/// Validates a booking request against a slot snapshot and works out every
/// change it implies. The snapshot itself is not modified.
pub fn plan_booking(
    slot: &TimeSlot,
    player: &Player,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<BookingPlan, BookingError> {
    if slot.status == SlotStatus::Cancelled || slot.start <= now {
        return Err(BookingError::SlotClosed(slot.status));
    }

    slot.level.check(player.level)?;
    slot.category.check(player.gender)?;

    let size = request.group_size;
    let current = check_seat_available(slot, player.id, size)?;

    if request.private {
        return plan_private_booking(slot, player, request, current, now);
    }

    let pricing = classify_modality(slot, size);
    let charge = authorize_payment(&pricing, request.payment_method, player.points_balance)?;

    let refill = slot.confirmed_size.is_some();
    let fills = !refill && current.occupied + 1 == size.seats();

    let booking = Booking {
        id: Uuid::new_v4(),
        user_id: player.id,
        group_size: size,
        status: if refill || fills {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        },
        is_recycled: false,
        is_private: false,
        payment_method: charge.method,
        amount_paid: charge.amount,
        created_at: now,
    };

    let (promote, displaced) = if fills {
        (
            slot.bookings_for(size)
                .filter(|b| b.status == BookingStatus::Pending)
                .map(|b| b.id)
                .collect(),
            displaced_bookings(slot, size)
                .into_iter()
                .map(Refund::in_full)
                .collect(),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(BookingPlan {
        booking,
        charge,
        promote,
        completed: fills.then_some(size),
        displaced,
    })
}

fn plan_private_booking(
    slot: &TimeSlot,
    player: &Player,
    request: &BookingRequest,
    current: ModalityOccupancy,
    now: DateTime<Utc>,
) -> Result<BookingPlan, BookingError> {
    let size = request.group_size;
    if slot.confirmed_size.is_some() || current.occupied > 0 {
        return Err(BookingError::PrivateUnavailable(size));
    }
    if request.payment_method != PaymentMethod::Currency {
        return Err(BookingError::CurrencyOnlySeat(size));
    }

    let charge = Charge {
        method: PaymentMethod::Currency,
        amount: slot.total_price_cents.max(0),
        points_balance_after: player.points_balance,
    };

    Ok(BookingPlan {
        booking: Booking {
            id: Uuid::new_v4(),
            user_id: player.id,
            group_size: size,
            status: BookingStatus::Confirmed,
            is_recycled: false,
            is_private: true,
            payment_method: PaymentMethod::Currency,
            amount_paid: charge.amount,
            created_at: now,
        },
        charge,
        promote: Vec::new(),
        completed: Some(size),
        displaced: displaced_bookings(slot, size)
            .into_iter()
            .map(Refund::in_full)
            .collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPlan {
    pub booking_id: Uuid,
    /// The seat is re-offered for points
    pub recycled: bool,
    pub refund: Refund,
    /// The class loses its court and reopens as a proposal
    pub release_court: bool,
}

impl CancellationPlan {
    pub fn apply(&self, slot: &mut TimeSlot) {
        if let Some(booking) = slot.bookings.iter_mut().find(|b| b.id == self.booking_id) {
            booking.status = BookingStatus::Cancelled;
            booking.is_recycled = self.recycled;
        }
        if self.release_court {
            slot.court = None;
            slot.confirmed_size = None;
        }
        slot.status = derive_status(slot);
    }
}

/// Cancelling a seat before the class fills returns the payment as made.
/// Cancelling a seat of a filled class recycles it and credits the seat price
/// as points. Cancelling a private booking frees the whole class.
pub fn plan_cancellation(
    slot: &TimeSlot,
    booking_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CancellationPlan, BookingError> {
    let booking = slot
        .booking(booking_id)
        .ok_or(BookingError::BookingNotFound)?;

    if !booking.is_active() {
        return Err(BookingError::BookingNotActive);
    }
    if slot.status == SlotStatus::Cancelled || slot.start <= now {
        return Err(BookingError::SlotClosed(slot.status));
    }

    let filled = slot.confirmed_size == Some(booking.group_size);

    let plan = if filled && booking.is_private {
        CancellationPlan {
            booking_id,
            recycled: false,
            refund: Refund::in_full(booking),
            release_court: true,
        }
    } else if filled {
        CancellationPlan {
            booking_id,
            recycled: true,
            refund: Refund {
                booking_id,
                user_id: booking.user_id,
                method: PaymentMethod::Points,
                amount: seat_cost(slot.total_price_cents, booking.group_size).points,
            },
            release_court: false,
        }
    } else {
        CancellationPlan {
            booking_id,
            recycled: false,
            refund: Refund::in_full(booking),
            release_court: false,
        }
    };

    Ok(plan)
}

/// Cancels the whole class, refunding every active booking as paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCancellation {
    pub refunds: Vec<Refund>,
}

impl ClassCancellation {
    pub fn apply(&self, slot: &mut TimeSlot) {
        for booking in slot.bookings.iter_mut().filter(|b| b.is_active()) {
            booking.status = BookingStatus::Cancelled;
            booking.is_recycled = false;
        }
        slot.court = None;
        slot.status = SlotStatus::Cancelled;
    }
}

fn cancel_class(slot: &TimeSlot) -> ClassCancellation {
    ClassCancellation {
        refunds: slot.active_bookings().map(Refund::in_full).collect(),
    }
}

/// Instructor or admin calls off a class that has not started.
pub fn plan_class_cancellation(
    slot: &TimeSlot,
    now: DateTime<Utc>,
) -> Result<ClassCancellation, BookingError> {
    if slot.status == SlotStatus::Cancelled || slot.start <= now {
        return Err(BookingError::SlotClosed(slot.status));
    }
    Ok(cancel_class(slot))
}

/// A class that reaches its start time without any modality filled is
/// cancelled. Returns `None` when the slot should be left alone.
pub fn plan_expiry(slot: &TimeSlot, now: DateTime<Utc>) -> Option<ClassCancellation> {
    let stale = slot.status != SlotStatus::Cancelled
        && slot.start <= now
        && slot.confirmed_size.is_none()
        && effective_completion(&slot.bookings).is_none();

    stale.then(|| cancel_class(slot))
}
