use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::auth::permissions::require_role;
use crate::gql::error::ResultExt;
use crate::gql::types::{
    ActivityEventCategory, ActivityLogEntry, PaginatedResponse, PaginationInput, Role,
};
use crate::state::AppState;
use infra::repos::activity_log;

#[derive(Default)]
pub struct ActivityLogQuery;

#[Object]
impl ActivityLogQuery {
    /// Audit trail of a class, newest first (instructors and admins)
    async fn slot_activity_log(
        &self,
        ctx: &Context<'_>,
        time_slot_id: Uuid,
        category: Option<ActivityEventCategory>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<ActivityLogEntry>> {
        require_role(ctx, Role::Instructor)?;
        let state = ctx.data::<AppState>()?;

        let limit_offset = pagination.unwrap_or_default().to_limit_offset();
        let category_str = category.map(|c| c.as_str());

        let (rows, total_count) = tokio::try_join!(
            activity_log::list_by_slot(
                &state.db,
                time_slot_id,
                category_str,
                limit_offset.limit,
                limit_offset.offset,
            ),
            activity_log::count_by_slot(&state.db, time_slot_id, category_str)
        )
        .gql_err("Database operation failed")?;

        let items: Vec<ActivityLogEntry> = rows.into_iter().map(ActivityLogEntry::from).collect();
        Ok(PaginatedResponse::new(items, limit_offset, total_count))
    }
}
