#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain::{
    Booking, BookingStatus, Category, Court, GroupSize, Level, PaymentMethod, Player, SlotStatus,
    TimeSlot,
};
use uuid::Uuid;

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
}

/// A point in time well before any fixture slot starts.
pub fn before_class() -> DateTime<Utc> {
    at(8, 0)
}

pub fn slot() -> TimeSlot {
    slot_between(at(10, 0), at(11, 30))
}

pub fn slot_between(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeSlot {
    TimeSlot {
        id: Uuid::new_v4(),
        club_id: club_id(),
        instructor_id: Uuid::new_v4(),
        start,
        end,
        level: Level::Open,
        category: Category::Open,
        max_players: GroupSize::FOUR,
        total_price_cents: 4800,
        court: None,
        status: SlotStatus::Proposal,
        confirmed_size: None,
        credits_slots: Vec::new(),
        recycled_slots_only_points: true,
        bookings: Vec::new(),
    }
}

pub fn club_id() -> Uuid {
    Uuid::from_u128(0x00c1_0b00)
}

pub fn booking(size: GroupSize, status: BookingStatus) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        group_size: size,
        status,
        is_recycled: false,
        is_private: false,
        payment_method: PaymentMethod::Currency,
        amount_paid: 4800 / i64::from(size),
        created_at: at(9, 0),
    }
}

pub fn recycled(size: GroupSize) -> Booking {
    Booking {
        is_recycled: true,
        ..booking(size, BookingStatus::Cancelled)
    }
}

pub fn player() -> Player {
    player_with_points(0)
}

pub fn player_with_points(points_balance: i64) -> Player {
    Player {
        id: Uuid::new_v4(),
        level: None,
        gender: None,
        points_balance,
    }
}

pub fn court(number: i32) -> Court {
    Court {
        id: Uuid::new_v4(),
        club_id: club_id(),
        number,
        is_active: true,
    }
}

/// A slot whose modality of `size` is fully confirmed.
pub fn filled_slot(size: GroupSize) -> TimeSlot {
    let mut slot = slot();
    for _ in 0..size.seats() {
        slot.bookings.push(booking(size, BookingStatus::Confirmed));
    }
    slot.confirmed_size = Some(size);
    slot.status = SlotStatus::Forming;
    slot
}

pub fn minutes(n: i64) -> Duration {
    Duration::minutes(n)
}
