use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::gql::types::Role;
use crate::services::classes;
use crate::state::AppState;
use domain::{CalendarView, CalendarWindow};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub club_id: Uuid,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

pub async fn admin_calendar(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarView>, AppError> {
    user.require(Role::Admin)?;

    let window = CalendarWindow {
        from: query.from,
        to: query.to,
    };
    let view = classes::admin_calendar(&state.db, query.club_id, window).await?;
    Ok(Json(view))
}
