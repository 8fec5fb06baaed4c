use serde::Serialize;
use uuid::Uuid;

use crate::error::BookingError;
use crate::slot::{Booking, GroupSize, TimeSlot};

/// Seat usage of one group-size option inside a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalityOccupancy {
    pub size: GroupSize,
    /// Seats held by pending or confirmed bookings
    pub occupied: usize,
    pub confirmed: usize,
    pub available: usize,
    pub complete: bool,
}

/// Counts seats for a single modality. Bookings of other sizes never count.
pub fn occupancy(bookings: &[Booking], size: GroupSize) -> ModalityOccupancy {
    let (occupied, confirmed) = bookings
        .iter()
        .filter(|b| b.group_size == size && b.is_active())
        .fold((0, 0), |(occupied, confirmed), b| {
            let seats = b.seats();
            if b.is_confirmed() {
                (occupied + seats, confirmed + seats)
            } else {
                (occupied + seats, confirmed)
            }
        });

    ModalityOccupancy {
        size,
        occupied,
        confirmed,
        available: size.seats().saturating_sub(occupied),
        complete: confirmed == size.seats(),
    }
}

pub fn resolve_modalities(slot: &TimeSlot) -> Vec<ModalityOccupancy> {
    GroupSize::up_to(slot.max_players)
        .map(|size| occupancy(&slot.bookings, size))
        .collect()
}

/// The smallest modality that has filled, if any.
pub fn effective_completion(bookings: &[Booking]) -> Option<GroupSize> {
    GroupSize::ALL
        .into_iter()
        .find(|size| occupancy(bookings, *size).complete)
}

pub fn is_effectively_completed(bookings: &[Booking]) -> bool {
    effective_completion(bookings).is_some()
}

/// Checks that `user_id` can take one more seat of `size` in this class.
pub fn check_seat_available(
    slot: &TimeSlot,
    user_id: Uuid,
    size: GroupSize,
) -> Result<ModalityOccupancy, BookingError> {
    if size > slot.max_players {
        return Err(BookingError::ExceedsMaxPlayers {
            requested: size,
            max_players: slot.max_players,
        });
    }

    if !slot.is_open_for(size) {
        return Err(BookingError::SlotClosed(slot.status));
    }

    if slot.has_active_booking(user_id) {
        return Err(BookingError::AlreadyBooked);
    }

    let current = occupancy(&slot.bookings, size);
    if current.available == 0 {
        return Err(BookingError::ModalityFull(size));
    }

    Ok(current)
}

/// Active bookings in every modality other than `completed`. Once a
/// modality fills these lose their seat.
pub fn displaced_bookings(slot: &TimeSlot, completed: GroupSize) -> Vec<&Booking> {
    slot.active_bookings()
        .filter(|b| b.group_size != completed)
        .collect()
}
