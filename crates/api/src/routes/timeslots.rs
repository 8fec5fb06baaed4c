use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::gql::types::Role;
use crate::services::classes;
use crate::state::AppState;
use domain::{
    classify_slot, recycling_summary, resolve_modalities, ModalityOccupancy, ModalityPricing,
    ProposalDraft, RecyclingSummary, TimeSlot,
};
use infra::pagination::LimitOffset;
use infra::repos::TimeSlotFilter;

const MAX_LIST_LIMIT: i64 = 200;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotQuery {
    pub club_id: Option<Uuid>,
    pub instructor_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub include_cancelled: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A class together with its per-modality seat and price breakdown.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    #[serde(flatten)]
    pub slot: TimeSlot,
    pub modalities: Vec<ModalityOccupancy>,
    pub pricing: Vec<ModalityPricing>,
    pub recycling: RecyclingSummary,
}

impl From<TimeSlot> for SlotView {
    fn from(slot: TimeSlot) -> Self {
        Self {
            modalities: resolve_modalities(&slot),
            pricing: classify_slot(&slot),
            recycling: recycling_summary(&slot),
            slot,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TimeSlotQuery>,
) -> Result<Json<Vec<SlotView>>, AppError> {
    let page = LimitOffset {
        limit: query.limit.unwrap_or(50).clamp(1, MAX_LIST_LIMIT),
        offset: query.offset.unwrap_or(0).max(0),
    };

    let slots = classes::load_slots(
        &state.db,
        TimeSlotFilter {
            club_id: query.club_id,
            instructor_id: query.instructor_id,
            from: query.from,
            to: query.to,
            include_cancelled: query.include_cancelled,
        },
        Some(page),
    )
    .await?;

    Ok(Json(slots.into_iter().map(SlotView::from).collect()))
}

pub async fn propose(
    State(state): State<AppState>,
    user: AuthUser,
    Json(draft): Json<ProposalDraft>,
) -> Result<(StatusCode, Json<SlotView>), AppError> {
    user.require(Role::Instructor)?;

    let slot = classes::propose_class(&state.db, &user, draft, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(slot.into())))
}
