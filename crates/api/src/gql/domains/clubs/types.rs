use async_graphql::{ComplexObject, Context, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::state::AppState;
use infra::models::{ClubRow, CourtRow};
use infra::repos::courts;

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Club {
    pub id: ID,
    pub name: String,
    pub city: Option<String>,
    #[graphql(skip)]
    pub club_uuid: Uuid,
}

#[ComplexObject]
impl Club {
    async fn courts(&self, ctx: &Context<'_>) -> Result<Vec<Court>> {
        let state = ctx.data::<AppState>()?;
        let rows = courts::list_by_club(&state.db, self.club_uuid).await?;
        Ok(rows.into_iter().map(Court::from).collect())
    }
}

impl From<ClubRow> for Club {
    fn from(row: ClubRow) -> Self {
        Self {
            id: row.id.into(),
            club_uuid: row.id,
            name: row.name,
            city: row.city,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct Court {
    pub id: ID,
    pub club_id: ID,
    pub court_number: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourtRow> for Court {
    fn from(row: CourtRow) -> Self {
        Self {
            id: row.id.into(),
            club_id: row.club_id.into(),
            court_number: row.court_number,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
