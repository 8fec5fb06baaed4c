use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{CourtOccupancyRow, CourtRow};

#[derive(Debug, Clone)]
pub struct CreateCourt {
    pub club_id: Uuid,
    pub court_number: i32,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateCourt) -> SqlxResult<CourtRow> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        INSERT INTO courts (club_id, court_number)
        VALUES ($1, $2)
        RETURNING id, club_id, court_number, is_active, created_at, updated_at
        "#,
    )
    .bind(data.club_id)
    .bind(data.court_number)
    .fetch_one(executor)
    .await
}

pub async fn list_by_club<'e>(
    executor: impl PgExecutor<'e>,
    club_id: Uuid,
) -> SqlxResult<Vec<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, club_id, court_number, is_active, created_at, updated_at
        FROM courts
        WHERE club_id = $1
        ORDER BY court_number ASC
        "#,
    )
    .bind(club_id)
    .fetch_all(executor)
    .await
}

/// Locks the club's active courts so concurrent assignments run one at a time.
pub async fn list_active_by_club_for_update<'e>(
    executor: impl PgExecutor<'e>,
    club_id: Uuid,
) -> SqlxResult<Vec<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, club_id, court_number, is_active, created_at, updated_at
        FROM courts
        WHERE club_id = $1 AND is_active = true
        ORDER BY court_number ASC
        FOR UPDATE
        "#,
    )
    .bind(club_id)
    .fetch_all(executor)
    .await
}

pub async fn set_active<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    is_active: bool,
) -> SqlxResult<Option<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        UPDATE courts
        SET is_active = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, club_id, court_number, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(is_active)
    .fetch_optional(executor)
    .await
}

/// Courts of a club held by non-cancelled classes that intersect `[from, to)`.
pub async fn occupancy_for_club<'e>(
    executor: impl PgExecutor<'e>,
    club_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> SqlxResult<Vec<CourtOccupancyRow>> {
    sqlx::query_as::<_, CourtOccupancyRow>(
        r#"
        SELECT court_id, id AS time_slot_id, start_time, end_time
        FROM time_slots
        WHERE club_id = $1
          AND court_id IS NOT NULL
          AND status <> 'cancelled'
          AND start_time < $3
          AND end_time > $2
        "#,
    )
    .bind(club_id)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await
}
