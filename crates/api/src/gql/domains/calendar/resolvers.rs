use async_graphql::{Context, Object, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::permissions::require_role;
use crate::gql::error::GqlError;
use crate::gql::types::{AdminCalendar, Role};
use crate::services::classes;
use crate::state::AppState;
use domain::CalendarWindow;

#[derive(Default)]
pub struct CalendarQuery;

#[Object]
impl CalendarQuery {
    /// Court-by-court schedule of a club between `from` and `to` (admin only)
    async fn admin_calendar(
        &self,
        ctx: &Context<'_>,
        club_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<AdminCalendar> {
        require_role(ctx, Role::Admin)?;
        let state = ctx.data::<AppState>()?;

        let window = CalendarWindow { from, to };
        let view = classes::admin_calendar(&state.db, club_id, window)
            .await
            .map_err(GqlError::from)?;

        Ok(AdminCalendar::new(club_id, window, &view))
    }
}
