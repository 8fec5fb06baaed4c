use async_graphql::{Context, Object, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::permissions::require_role;
use crate::gql::error::GqlError;
use crate::gql::types::{Club, Court, Role};
use crate::services::classes;
use crate::state::AppState;
use infra::repos::{clubs, courts, CreateCourt};

#[derive(Default)]
pub struct ClubQuery;

#[Object]
impl ClubQuery {
    async fn clubs(&self, ctx: &Context<'_>) -> Result<Vec<Club>> {
        let state = ctx.data::<AppState>()?;
        let rows = clubs::list(&state.db).await?;
        Ok(rows.into_iter().map(Club::from).collect())
    }

    async fn club(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Club>> {
        let state = ctx.data::<AppState>()?;
        Ok(clubs::get_by_id(&state.db, id).await?.map(Club::from))
    }

    /// All courts of a club, inactive ones included
    async fn club_courts(&self, ctx: &Context<'_>, club_id: Uuid) -> Result<Vec<Court>> {
        let state = ctx.data::<AppState>()?;
        let rows = courts::list_by_club(&state.db, club_id).await?;
        Ok(rows.into_iter().map(Court::from).collect())
    }
}

#[derive(Default)]
pub struct ClubMutation;

#[Object]
impl ClubMutation {
    async fn create_court(
        &self,
        ctx: &Context<'_>,
        club_id: Uuid,
        court_number: i32,
    ) -> Result<Court> {
        require_role(ctx, Role::Admin)?;
        let state = ctx.data::<AppState>()?;

        if court_number < 1 {
            return Err(async_graphql::Error::new("Court number must be positive"));
        }
        clubs::get_by_id(&state.db, club_id)
            .await?
            .ok_or_else(|| async_graphql::Error::new("Club not found"))?;

        let row = courts::create(
            &state.db,
            CreateCourt {
                club_id,
                court_number,
            },
        )
        .await?;

        tracing::info!(club_id = %club_id, court_number, "court created");
        retry_assignments(state, club_id).await;

        Ok(row.into())
    }

    /// Activating a court retries every class of the club waiting for one.
    async fn set_court_active(
        &self,
        ctx: &Context<'_>,
        court_id: Uuid,
        is_active: bool,
    ) -> Result<Court> {
        require_role(ctx, Role::Admin)?;
        let state = ctx.data::<AppState>()?;

        let row = courts::set_active(&state.db, court_id, is_active)
            .await?
            .ok_or_else(|| GqlError::new("Court not found"))?;

        if is_active {
            retry_assignments(state, row.club_id).await;
        }

        Ok(row.into())
    }
}

async fn retry_assignments(state: &AppState, club_id: Uuid) {
    if let Err(e) = classes::assign_pending_for_club(&state.db, club_id, Utc::now()).await {
        tracing::warn!(club_id = %club_id, "court assignment retry failed: {e}");
    }
}
