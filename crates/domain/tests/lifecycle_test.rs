mod common;

use common::*;
use domain::{
    accounts_to_lock, derive_status, occupancy, plan_booking, plan_cancellation,
    plan_class_cancellation, plan_expiry, BookingError, BookingRequest, BookingStatus, Category,
    CourtRef, Gender, GroupSize, Level, LevelValue, PaymentMethod, Refund, SlotStatus,
};
use uuid::Uuid;

fn seat(size: GroupSize) -> BookingRequest {
    BookingRequest {
        group_size: size,
        payment_method: PaymentMethod::Currency,
        private: false,
    }
}

fn court_ref() -> CourtRef {
    CourtRef {
        id: Uuid::new_v4(),
        number: 1,
    }
}

#[test]
fn status_follows_bookings_and_court() {
    let mut slot = slot();
    assert_eq!(derive_status(&slot), SlotStatus::Proposal);

    slot.bookings.push(booking(GroupSize::TWO, BookingStatus::Pending));
    assert_eq!(derive_status(&slot), SlotStatus::PreRegistration);

    slot.bookings.push(booking(GroupSize::TWO, BookingStatus::Confirmed));
    assert_eq!(derive_status(&slot), SlotStatus::Forming);

    slot.bookings[0].status = BookingStatus::Confirmed;
    assert_eq!(derive_status(&slot), SlotStatus::Forming);

    slot.court = Some(court_ref());
    assert_eq!(derive_status(&slot), SlotStatus::Confirmed);

    slot.status = SlotStatus::Cancelled;
    assert_eq!(derive_status(&slot), SlotStatus::Cancelled);
}

#[test]
fn recycled_seats_keep_a_confirmed_class_confirmed() {
    let mut slot = filled_slot(GroupSize::FOUR);
    slot.court = Some(court_ref());
    slot.bookings[0].status = BookingStatus::Cancelled;
    slot.bookings[0].is_recycled = true;

    assert_eq!(derive_status(&slot), SlotStatus::Confirmed);
}

#[test]
fn first_booking_is_pending() {
    let mut slot = slot();
    let plan = plan_booking(&slot, &player(), &seat(GroupSize::FOUR), before_class()).unwrap();

    assert_eq!(plan.booking.status, BookingStatus::Pending);
    assert_eq!(plan.charge.amount, 1200);
    assert_eq!(plan.completed, None);

    plan.apply(&mut slot);
    assert_eq!(slot.status, SlotStatus::PreRegistration);
}

#[test]
fn booking_the_last_seat_fills_the_modality() {
    let mut slot = slot();
    let first = booking(GroupSize::TWO, BookingStatus::Pending);
    let other = booking(GroupSize::FOUR, BookingStatus::Pending);
    slot.bookings.extend([first.clone(), other.clone()]);

    let plan = plan_booking(&slot, &player(), &seat(GroupSize::TWO), before_class()).unwrap();

    assert_eq!(plan.booking.status, BookingStatus::Confirmed);
    assert_eq!(plan.completed, Some(GroupSize::TWO));
    assert_eq!(plan.promote, vec![first.id]);
    assert_eq!(plan.displaced.len(), 1);
    assert_eq!(plan.displaced[0].booking_id, other.id);
    assert_eq!(plan.displaced[0].amount, other.amount_paid);

    plan.apply(&mut slot);
    assert_eq!(slot.confirmed_size, Some(GroupSize::TWO));
    assert_eq!(slot.status, SlotStatus::Forming);
    assert!(occupancy(&slot.bookings, GroupSize::TWO).complete);
    assert_eq!(
        slot.booking(other.id).map(|b| b.status),
        Some(BookingStatus::Cancelled)
    );
}

#[test]
fn started_or_cancelled_classes_reject_bookings() {
    let slot = slot();
    let err = plan_booking(&slot, &player(), &seat(GroupSize::ONE), slot.start).unwrap_err();
    assert!(matches!(err, BookingError::SlotClosed(_)));

    let mut cancelled = common::slot();
    cancelled.status = SlotStatus::Cancelled;
    let err = plan_booking(&cancelled, &player(), &seat(GroupSize::ONE), before_class())
        .unwrap_err();
    assert_eq!(err, BookingError::SlotClosed(SlotStatus::Cancelled));
}

#[test]
fn level_range_is_enforced() {
    let mut slot = slot();
    slot.level = "2.5-3.5".parse().unwrap();

    let mut strong = player();
    strong.level = Some(LevelValue::from_tenths(45).unwrap());
    let err = plan_booking(&slot, &strong, &seat(GroupSize::ONE), before_class()).unwrap_err();
    assert!(matches!(err, BookingError::LevelMismatch { .. }));

    let unrated = player();
    let err = plan_booking(&slot, &unrated, &seat(GroupSize::ONE), before_class()).unwrap_err();
    assert!(matches!(err, BookingError::LevelUnknown(Level::Range { .. })));

    let mut fitting = player();
    fitting.level = Some(LevelValue::from_tenths(30).unwrap());
    assert!(plan_booking(&slot, &fitting, &seat(GroupSize::ONE), before_class()).is_ok());
}

#[test]
fn category_is_enforced() {
    let mut slot = slot();
    slot.category = Category::Female;

    let mut male = player();
    male.gender = Some(Gender::Male);
    let err = plan_booking(&slot, &male, &seat(GroupSize::TWO), before_class()).unwrap_err();
    assert_eq!(err, BookingError::CategoryMismatch(Category::Female));

    let mut female = player();
    female.gender = Some(Gender::Female);
    assert!(plan_booking(&slot, &female, &seat(GroupSize::TWO), before_class()).is_ok());
}

#[test]
fn private_booking_confirms_the_whole_modality() {
    let mut slot = slot();
    let request = BookingRequest {
        group_size: GroupSize::FOUR,
        payment_method: PaymentMethod::Currency,
        private: true,
    };

    let plan = plan_booking(&slot, &player(), &request, before_class()).unwrap();
    assert!(plan.booking.is_private);
    assert_eq!(plan.charge.amount, 4800);
    assert_eq!(plan.completed, Some(GroupSize::FOUR));

    plan.apply(&mut slot);
    slot.court = Some(court_ref());
    assert_eq!(derive_status(&slot), SlotStatus::ConfirmedPrivate);
}

#[test]
fn private_booking_needs_an_empty_modality() {
    let mut slot = slot();
    slot.bookings.push(booking(GroupSize::FOUR, BookingStatus::Pending));
    let request = BookingRequest {
        group_size: GroupSize::FOUR,
        payment_method: PaymentMethod::Currency,
        private: true,
    };

    let err = plan_booking(&slot, &player(), &request, before_class()).unwrap_err();
    assert_eq!(err, BookingError::PrivateUnavailable(GroupSize::FOUR));
}

#[test]
fn cancelling_before_the_class_fills_refunds_the_payment() {
    let mut slot = slot();
    let pending = booking(GroupSize::FOUR, BookingStatus::Pending);
    slot.bookings.push(pending.clone());

    let plan = plan_cancellation(&slot, pending.id, before_class()).unwrap();
    assert!(!plan.recycled);
    assert_eq!(plan.refund.method, PaymentMethod::Currency);
    assert_eq!(plan.refund.amount, pending.amount_paid);

    plan.apply(&mut slot);
    assert_eq!(slot.status, SlotStatus::Proposal);
}

#[test]
fn cancelling_a_confirmed_seat_recycles_it_for_points() {
    let mut slot = filled_slot(GroupSize::FOUR);
    let court = court_ref();
    slot.court = Some(court);
    let leaving = slot.bookings[2].id;

    let plan = plan_cancellation(&slot, leaving, before_class()).unwrap();
    assert!(plan.recycled);
    assert!(!plan.release_court);
    assert_eq!(plan.refund.method, PaymentMethod::Points);
    assert_eq!(plan.refund.amount, 12);

    plan.apply(&mut slot);
    assert_eq!(slot.court, Some(court));
    assert_eq!(slot.status, SlotStatus::Confirmed);

    let refill = BookingRequest {
        group_size: GroupSize::FOUR,
        payment_method: PaymentMethod::Points,
        private: false,
    };
    let plan = plan_booking(&slot, &player_with_points(20), &refill, before_class()).unwrap();
    assert_eq!(plan.booking.status, BookingStatus::Confirmed);
    assert_eq!(plan.charge.points_balance_after, 8);
    assert_eq!(plan.completed, None);
}

#[test]
fn cancelling_a_private_booking_releases_the_court() {
    let mut slot = slot();
    let request = BookingRequest {
        group_size: GroupSize::TWO,
        payment_method: PaymentMethod::Currency,
        private: true,
    };
    let booked = plan_booking(&slot, &player(), &request, before_class()).unwrap();
    booked.apply(&mut slot);
    slot.court = Some(court_ref());

    let plan = plan_cancellation(&slot, booked.booking.id, before_class()).unwrap();
    assert!(plan.release_court);
    assert_eq!(plan.refund.amount, 4800);

    plan.apply(&mut slot);
    assert_eq!(slot.court, None);
    assert_eq!(slot.confirmed_size, None);
    assert_eq!(slot.status, SlotStatus::Proposal);
}

#[test]
fn cancelling_twice_is_rejected() {
    let mut slot = slot();
    slot.bookings.push(booking(GroupSize::ONE, BookingStatus::Cancelled));
    let id = slot.bookings[0].id;

    assert_eq!(
        plan_cancellation(&slot, id, before_class()).unwrap_err(),
        BookingError::BookingNotActive
    );
    assert_eq!(
        plan_cancellation(&slot, Uuid::new_v4(), before_class()).unwrap_err(),
        BookingError::BookingNotFound
    );
}

#[test]
fn unfilled_class_expires_at_start() {
    let mut slot = slot();
    slot.bookings.push(booking(GroupSize::FOUR, BookingStatus::Pending));
    slot.bookings.push(booking(GroupSize::FOUR, BookingStatus::Pending));

    assert!(plan_expiry(&slot, before_class()).is_none());

    let expiry = plan_expiry(&slot, slot.start + minutes(1)).unwrap();
    assert_eq!(expiry.refunds.len(), 2);

    expiry.apply(&mut slot);
    assert_eq!(slot.status, SlotStatus::Cancelled);
    assert!(slot.active_bookings().next().is_none());
}

#[test]
fn filled_class_does_not_expire() {
    let slot = filled_slot(GroupSize::TWO);
    assert!(plan_expiry(&slot, slot.start + minutes(1)).is_none());
}

#[test]
fn class_cancellation_refunds_everyone() {
    let mut slot = filled_slot(GroupSize::THREE);
    slot.court = Some(court_ref());

    let cancellation = plan_class_cancellation(&slot, before_class()).unwrap();
    assert_eq!(cancellation.refunds.len(), 3);

    cancellation.apply(&mut slot);
    assert_eq!(slot.status, SlotStatus::Cancelled);
    assert_eq!(slot.court, None);
    assert!(plan_class_cancellation(&slot, before_class()).is_err());
}

#[test]
fn accounts_are_locked_in_id_order_with_points_refunds_only() {
    let low = Uuid::from_u128(1);
    let mid = Uuid::from_u128(2);
    let high = Uuid::from_u128(3);
    let refund = |user_id: Uuid, method: PaymentMethod, amount: i64| Refund {
        booking_id: Uuid::new_v4(),
        user_id,
        method,
        amount,
    };

    let refunds = [
        refund(high, PaymentMethod::Points, 12),
        refund(low, PaymentMethod::Currency, 1200),
        refund(high, PaymentMethod::Points, 12),
        refund(low, PaymentMethod::Points, 0),
    ];

    assert_eq!(accounts_to_lock(&refunds, Some(mid)), vec![mid, high]);
    assert_eq!(accounts_to_lock(&refunds, None), vec![high]);
    assert_eq!(accounts_to_lock(&[], Some(low)), vec![low]);

    // Crossed bookers agree on the order
    let one_way = accounts_to_lock(&[refund(high, PaymentMethod::Points, 12)], Some(low));
    let other_way = accounts_to_lock(&[refund(low, PaymentMethod::Points, 12)], Some(high));
    assert_eq!(one_way, other_way);
}
