use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::error::GqlError;
use crate::gql::types::TimeSlot;
use crate::services::classes;
use crate::state::AppState;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl From<domain::BookingStatus> for BookingStatus {
    fn from(status: domain::BookingStatus) -> Self {
        match status {
            domain::BookingStatus::Pending => Self::Pending,
            domain::BookingStatus::Confirmed => Self::Confirmed,
            domain::BookingStatus::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum PaymentMethod {
    #[default]
    Currency,
    Points,
}

impl From<domain::PaymentMethod> for PaymentMethod {
    fn from(method: domain::PaymentMethod) -> Self {
        match method {
            domain::PaymentMethod::Currency => Self::Currency,
            domain::PaymentMethod::Points => Self::Points,
        }
    }
}

impl From<PaymentMethod> for domain::PaymentMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Currency => Self::Currency,
            PaymentMethod::Points => Self::Points,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Booking {
    pub id: ID,
    pub time_slot_id: ID,
    pub user_id: ID,
    pub group_size: i32,
    pub status: BookingStatus,
    /// Cancelled after the class filled; the seat is offered again
    pub is_recycled: bool,
    pub is_private: bool,
    pub payment_method: PaymentMethod,
    /// Cents for currency, points otherwise
    pub amount_paid: i64,
    pub created_at: DateTime<Utc>,
    #[graphql(skip)]
    pub slot_uuid: Uuid,
}

#[ComplexObject]
impl Booking {
    async fn time_slot(&self, ctx: &Context<'_>) -> Result<TimeSlot> {
        let state = ctx.data::<AppState>()?;
        let slot = classes::load_slot(&state.db, self.slot_uuid)
            .await
            .map_err(GqlError::from)?;
        Ok(TimeSlot::from(&slot))
    }
}

impl Booking {
    pub fn new(time_slot_id: Uuid, booking: &domain::Booking) -> Self {
        Self {
            id: booking.id.into(),
            time_slot_id: time_slot_id.into(),
            user_id: booking.user_id.into(),
            group_size: i32::from(booking.group_size),
            status: booking.status.into(),
            is_recycled: booking.is_recycled,
            is_private: booking.is_private,
            payment_method: booking.payment_method.into(),
            amount_paid: booking.amount_paid,
            created_at: booking.created_at,
            slot_uuid: time_slot_id,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct BookClassInput {
    pub time_slot_id: Uuid,
    pub group_size: i32,
    #[graphql(default)]
    pub payment_method: PaymentMethod,
    /// Take every seat of the modality at once
    #[graphql(default)]
    pub private: bool,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct Refund {
    pub booking_id: ID,
    pub user_id: ID,
    pub method: PaymentMethod,
    pub amount: i64,
}

impl From<&domain::Refund> for Refund {
    fn from(refund: &domain::Refund) -> Self {
        Self {
            booking_id: refund.booking_id.into(),
            user_id: refund.user_id.into(),
            method: refund.method.into(),
            amount: refund.amount,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct BookClassPayload {
    pub booking: Booking,
    pub time_slot: TimeSlot,
    pub points_balance: i64,
    /// This booking filled its modality
    pub completed: bool,
    pub displaced: Vec<Refund>,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct CancelBookingPayload {
    pub booking_id: ID,
    pub recycled: bool,
    pub refund: Refund,
    pub time_slot: TimeSlot,
}
