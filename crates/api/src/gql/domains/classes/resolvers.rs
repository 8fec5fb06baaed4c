use async_graphql::{Context, Object, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::permissions::{require_auth, require_role};
use crate::gql::error::GqlError;
use crate::gql::types::{
    CourtAssignmentResult, PaginationInput, ProposeClassInput, Role, TimeSlot,
};
use crate::services::classes;
use crate::state::AppState;
use infra::repos::TimeSlotFilter;

#[derive(Default)]
pub struct ClassQuery;

#[Object]
impl ClassQuery {
    /// Classes ordered by start time, with per-modality seats and pricing
    #[allow(clippy::too_many_arguments)]
    async fn time_slots(
        &self,
        ctx: &Context<'_>,
        club_id: Option<Uuid>,
        instructor_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        #[graphql(default)] include_cancelled: bool,
        pagination: Option<PaginationInput>,
    ) -> Result<Vec<TimeSlot>> {
        let state = ctx.data::<AppState>()?;

        let filter = TimeSlotFilter {
            club_id,
            instructor_id,
            from,
            to,
            include_cancelled,
        };
        let page = pagination.unwrap_or_default().to_limit_offset();

        let slots = classes::load_slots(&state.db, filter, Some(page))
            .await
            .map_err(GqlError::from)?;

        Ok(slots.iter().map(TimeSlot::from).collect())
    }

    async fn time_slot(&self, ctx: &Context<'_>, id: Uuid) -> Result<TimeSlot> {
        let state = ctx.data::<AppState>()?;
        let slot = classes::load_slot(&state.db, id)
            .await
            .map_err(GqlError::from)?;
        Ok(TimeSlot::from(&slot))
    }
}

#[derive(Default)]
pub struct ClassMutation;

#[Object]
impl ClassMutation {
    /// Offer a new class (instructors and admins)
    async fn propose_class(&self, ctx: &Context<'_>, input: ProposeClassInput) -> Result<TimeSlot> {
        let actor = require_role(ctx, Role::Instructor)?;
        let state = ctx.data::<AppState>()?;

        let slot = classes::propose_class(&state.db, &actor, input.into(), Utc::now())
            .await
            .map_err(GqlError::from)?;

        Ok(TimeSlot::from(&slot))
    }

    /// Call off a class and refund every booking
    async fn cancel_class(&self, ctx: &Context<'_>, time_slot_id: Uuid) -> Result<TimeSlot> {
        let actor = require_role(ctx, Role::Instructor)?;
        let state = ctx.data::<AppState>()?;

        let slot = classes::cancel_class(&state.db, time_slot_id, &actor, Utc::now())
            .await
            .map_err(GqlError::from)?;

        Ok(TimeSlot::from(&slot))
    }

    /// Give a filled class the lowest-numbered free court
    async fn assign_court(
        &self,
        ctx: &Context<'_>,
        time_slot_id: Uuid,
    ) -> Result<CourtAssignmentResult> {
        let actor = require_auth(ctx)?;
        let state = ctx.data::<AppState>()?;

        let (slot, outcome) = classes::assign_court_to_slot(&state.db, time_slot_id, &actor)
            .await
            .map_err(GqlError::from)?;

        Ok(CourtAssignmentResult::new(slot.id, outcome))
    }
}
