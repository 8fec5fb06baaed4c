use async_graphql::{Context, Object, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::permissions::require_auth;
use crate::gql::error::GqlError;
use crate::gql::types::{
    BookClassInput, BookClassPayload, Booking, CancelBookingPayload, Refund, TimeSlot,
};
use crate::services::classes::{self, BookClassParams};
use crate::state::AppState;
use domain::{BookingRequest, GroupSize};
use infra::repos::bookings;

#[derive(Default)]
pub struct BookingQuery;

#[Object]
impl BookingQuery {
    /// The caller's bookings ordered by class start
    async fn my_bookings(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] include_cancelled: bool,
    ) -> Result<Vec<Booking>> {
        let user = require_auth(ctx)?;
        let state = ctx.data::<AppState>()?;

        let rows = bookings::list_by_user(&state.db, user.id, include_cancelled)
            .await
            .map_err(GqlError::from)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let slot_id = row.time_slot_id;
            let booking = domain::Booking::try_from(row).map_err(GqlError::from)?;
            items.push(Booking::new(slot_id, &booking));
        }
        Ok(items)
    }
}

#[derive(Default)]
pub struct BookingMutation;

#[Object]
impl BookingMutation {
    async fn book_class(&self, ctx: &Context<'_>, input: BookClassInput) -> Result<BookClassPayload> {
        let user = require_auth(ctx)?;
        let state = ctx.data::<AppState>()?;

        let group_size = GroupSize::new(i64::from(input.group_size)).map_err(GqlError::from)?;

        let result = classes::book_class(
            &state.db,
            BookClassParams {
                slot_id: input.time_slot_id,
                user_id: user.id,
                request: BookingRequest {
                    group_size,
                    payment_method: input.payment_method.into(),
                    private: input.private,
                },
                now: Utc::now(),
            },
        )
        .await
        .map_err(GqlError::from)?;

        let slot_id = result.slot.id;
        let booking = result
            .slot
            .booking(result.plan.booking.id)
            .unwrap_or(&result.plan.booking);

        Ok(BookClassPayload {
            booking: Booking::new(slot_id, booking),
            time_slot: TimeSlot::from(&result.slot),
            points_balance: result.points_balance,
            completed: result.plan.completed.is_some(),
            displaced: result.plan.displaced.iter().map(Refund::from).collect(),
        })
    }

    async fn cancel_booking(
        &self,
        ctx: &Context<'_>,
        booking_id: Uuid,
    ) -> Result<CancelBookingPayload> {
        let user = require_auth(ctx)?;
        let state = ctx.data::<AppState>()?;

        let result = classes::cancel_booking(&state.db, booking_id, &user, Utc::now())
            .await
            .map_err(GqlError::from)?;

        Ok(CancelBookingPayload {
            booking_id: booking_id.into(),
            recycled: result.plan.recycled,
            refund: Refund::from(&result.plan.refund),
            time_slot: TimeSlot::from(&result.slot),
        })
    }
}
