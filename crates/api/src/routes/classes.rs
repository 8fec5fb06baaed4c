use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::timeslots::SlotView;
use crate::services::classes::{self, BookClassParams};
use crate::state::AppState;
use domain::{Booking, BookingRequest, GroupSize, PaymentMethod, Refund};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub time_slot_id: Uuid,
    pub group_size: i64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub private: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub booking: Booking,
    pub time_slot: SlotView,
    pub points_balance: i64,
    pub completed: Option<GroupSize>,
    pub displaced: Vec<Refund>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub booking_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub booking_id: Uuid,
    pub recycled: bool,
    pub refund: Refund,
    pub time_slot: SlotView,
}

pub async fn book(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<BookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    let group_size = GroupSize::new(body.group_size)?;

    let result = classes::book_class(
        &state.db,
        BookClassParams {
            slot_id: body.time_slot_id,
            user_id: user.id,
            request: BookingRequest {
                group_size,
                payment_method: body.payment_method,
                private: body.private,
            },
            now: Utc::now(),
        },
    )
    .await?;

    let booking = result
        .slot
        .booking(result.plan.booking.id)
        .cloned()
        .unwrap_or_else(|| result.plan.booking.clone());

    Ok(Json(BookResponse {
        booking,
        points_balance: result.points_balance,
        completed: result.plan.completed,
        displaced: result.plan.displaced,
        time_slot: result.slot.into(),
    }))
}

pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CancelRequest>,
) -> Result<Json<CancelResponse>, AppError> {
    let result = classes::cancel_booking(&state.db, body.booking_id, &user, Utc::now()).await?;

    Ok(Json(CancelResponse {
        booking_id: body.booking_id,
        recycled: result.plan.recycled,
        refund: result.plan.refund,
        time_slot: result.slot.into(),
    }))
}
