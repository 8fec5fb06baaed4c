use serde::Serialize;

use crate::error::BookingError;
use crate::modality::occupancy;
use crate::slot::{GroupSize, PaymentMethod, TimeSlot};

const CENTS_PER_POINT: i64 = 100;

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let numerator = numerator.max(0);
    numerator / denominator + i64::from(numerator % denominator != 0)
}

/// Price of one seat, in cents and in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatCost {
    pub cents: i64,
    pub points: i64,
}

/// One point buys one currency unit; both figures round up.
pub fn seat_cost(total_price_cents: i64, size: GroupSize) -> SeatCost {
    let seats = i64::from(size);
    SeatCost {
        cents: ceil_div(total_price_cents, seats),
        points: ceil_div(total_price_cents, seats * CENTS_PER_POINT),
    }
}

/// How an empty seat may be paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatPayment {
    Currency,
    PointsOnly,
    CurrencyOrPoints,
}

impl SeatPayment {
    pub fn accepts(&self, method: PaymentMethod) -> bool {
        match (self, method) {
            (SeatPayment::CurrencyOrPoints, _) => true,
            (SeatPayment::Currency, PaymentMethod::Currency) => true,
            (SeatPayment::PointsOnly, PaymentMethod::Points) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalityPricing {
    pub size: GroupSize,
    pub cost: SeatCost,
    pub has_recycled: bool,
    pub free_seats: Vec<SeatPayment>,
}

impl ModalityPricing {
    pub fn next_seat(&self) -> Option<SeatPayment> {
        self.free_seats.first().copied()
    }

    pub fn points_only(&self) -> bool {
        !self.free_seats.is_empty()
            && self
                .free_seats
                .iter()
                .all(|seat| *seat == SeatPayment::PointsOnly)
    }
}

fn has_recycled(slot: &TimeSlot, size: GroupSize) -> bool {
    slot.bookings_for(size).any(|b| b.is_recycled_seat())
}

/// Payment rule applied to every empty seat of `size`.
///
/// A recycled booking makes the modality points-only. Clearing
/// `recycled_slots_only_points` on the class relaxes that to currency or points.
pub fn seat_payment(slot: &TimeSlot, size: GroupSize) -> SeatPayment {
    if has_recycled(slot, size) {
        if slot.recycled_slots_only_points {
            SeatPayment::PointsOnly
        } else {
            SeatPayment::CurrencyOrPoints
        }
    } else if slot.credits_slots.contains(&size) {
        SeatPayment::CurrencyOrPoints
    } else {
        SeatPayment::Currency
    }
}

pub fn classify_modality(slot: &TimeSlot, size: GroupSize) -> ModalityPricing {
    let free = occupancy(&slot.bookings, size).available;
    let payment = seat_payment(slot, size);

    ModalityPricing {
        size,
        cost: seat_cost(slot.total_price_cents, size),
        has_recycled: has_recycled(slot, size),
        free_seats: vec![payment; free],
    }
}

pub fn classify_slot(slot: &TimeSlot) -> Vec<ModalityPricing> {
    GroupSize::up_to(slot.max_players)
        .map(|size| classify_modality(slot, size))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingSummary {
    pub has_recycled_slots: bool,
    /// Free seats in modalities that hold a recycled booking
    pub available_recycled_slots: usize,
    pub recycled_slots_only_points: bool,
}

pub fn recycling_summary(slot: &TimeSlot) -> RecyclingSummary {
    let recycled: Vec<ModalityPricing> = classify_slot(slot)
        .into_iter()
        .filter(|pricing| pricing.has_recycled)
        .collect();

    RecyclingSummary {
        has_recycled_slots: !recycled.is_empty(),
        available_recycled_slots: recycled.iter().map(|p| p.free_seats.len()).sum(),
        recycled_slots_only_points: slot.recycled_slots_only_points,
    }
}

/// Amount to take from a player for one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub method: PaymentMethod,
    /// Cents for currency, points otherwise
    pub amount: i64,
    pub points_balance_after: i64,
}

/// Validates a payment for the next free seat. Nothing is deducted unless the
/// whole cost is covered.
pub fn authorize_payment(
    pricing: &ModalityPricing,
    requested: PaymentMethod,
    points_balance: i64,
) -> Result<Charge, BookingError> {
    let seat = pricing
        .next_seat()
        .ok_or(BookingError::ModalityFull(pricing.size))?;

    if !seat.accepts(requested) {
        return Err(match requested {
            PaymentMethod::Currency => BookingError::PointsOnlySeat(pricing.size),
            PaymentMethod::Points => BookingError::CurrencyOnlySeat(pricing.size),
        });
    }

    match requested {
        PaymentMethod::Currency => Ok(Charge {
            method: PaymentMethod::Currency,
            amount: pricing.cost.cents,
            points_balance_after: points_balance,
        }),
        PaymentMethod::Points => {
            let required = pricing.cost.points;
            if points_balance < required {
                return Err(BookingError::InsufficientPoints {
                    required,
                    available: points_balance,
                });
            }
            Ok(Charge {
                method: PaymentMethod::Points,
                amount: required,
                points_balance_after: points_balance - required,
            })
        }
    }
}
