use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::TimeSlotRow, pagination::LimitOffset};

const SELECT_SLOT: &str = r#"
    SELECT ts.id, ts.club_id, ts.instructor_id, ts.start_time, ts.end_time,
           ts.level, ts.category, ts.max_players, ts.total_price_cents,
           ts.court_id, c.court_number, ts.status, ts.confirmed_size,
           ts.credits_slots, ts.recycled_slots_only_points,
           ts.created_at, ts.updated_at
    FROM time_slots ts
    LEFT JOIN courts c ON c.id = ts.court_id
"#;

#[derive(Debug, Clone, Default)]
pub struct TimeSlotFilter {
    pub club_id: Option<Uuid>,
    pub instructor_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub include_cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct CreateTimeSlot {
    pub id: Uuid,
    pub club_id: Uuid,
    pub instructor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub level: String,
    pub category: String,
    pub max_players: i16,
    pub total_price_cents: i64,
    pub credits_slots: Vec<i16>,
    pub recycled_slots_only_points: bool,
}

/// Mutable lifecycle columns, written back after the booking rules ran.
#[derive(Debug, Clone)]
pub struct SlotState {
    pub status: String,
    pub court_id: Option<Uuid>,
    pub confirmed_size: Option<i16>,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateTimeSlot) -> SqlxResult<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO time_slots
            (id, club_id, instructor_id, start_time, end_time, level, category,
             max_players, total_price_cents, credits_slots, recycled_slots_only_points)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(data.id)
    .bind(data.club_id)
    .bind(data.instructor_id)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(&data.level)
    .bind(&data.category)
    .bind(data.max_players)
    .bind(data.total_price_cents)
    .bind(&data.credits_slots)
    .bind(data.recycled_slots_only_points)
    .fetch_one(executor)
    .await?;

    Ok(row.0)
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<TimeSlotRow>> {
    sqlx::query_as::<_, TimeSlotRow>(&format!("{SELECT_SLOT} WHERE ts.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Locks the slot row for the rest of the transaction. Every booking change
/// goes through this lock, so two players never take the same last seat.
pub async fn get_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<TimeSlotRow>> {
    sqlx::query_as::<_, TimeSlotRow>(&format!(
        "{SELECT_SLOT} WHERE ts.id = $1 FOR UPDATE OF ts"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<TimeSlotRow>> {
    sqlx::query_as::<_, TimeSlotRow>(&format!("{SELECT_SLOT} WHERE ts.id = ANY($1)"))
        .bind(ids)
        .fetch_all(executor)
        .await
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: TimeSlotFilter,
    page: Option<LimitOffset>,
) -> SqlxResult<Vec<TimeSlotRow>> {
    let p = page.unwrap_or_default();

    sqlx::query_as::<_, TimeSlotRow>(&format!(
        r#"{SELECT_SLOT}
        WHERE ($1::uuid IS NULL OR ts.club_id = $1)
          AND ($2::uuid IS NULL OR ts.instructor_id = $2)
          AND ($3::timestamptz IS NULL OR ts.end_time > $3)
          AND ($4::timestamptz IS NULL OR ts.start_time < $4)
          AND ($5 OR ts.status <> 'cancelled')
        ORDER BY ts.start_time ASC, ts.id ASC
        LIMIT $6 OFFSET $7
        "#
    ))
    .bind(filter.club_id)
    .bind(filter.instructor_id)
    .bind(filter.from)
    .bind(filter.to)
    .bind(filter.include_cancelled)
    .bind(p.limit)
    .bind(p.offset)
    .fetch_all(executor)
    .await
}

pub async fn update_state<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    state: &SlotState,
) -> SqlxResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE time_slots
        SET status = $2, court_id = $3, confirmed_size = $4, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&state.status)
    .bind(state.court_id)
    .bind(state.confirmed_size)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Slots that reached their start time without filling. Rows already locked
/// by a booking in flight are skipped and picked up on the next tick.
pub async fn list_expirable_for_update<'e>(
    executor: impl PgExecutor<'e>,
    now: DateTime<Utc>,
    limit: i64,
) -> SqlxResult<Vec<TimeSlotRow>> {
    sqlx::query_as::<_, TimeSlotRow>(&format!(
        r#"{SELECT_SLOT}
        WHERE ts.start_time <= $1
          AND ts.status <> 'cancelled'
          AND ts.confirmed_size IS NULL
        ORDER BY ts.start_time ASC
        LIMIT $2
        FOR UPDATE OF ts SKIP LOCKED
        "#
    ))
    .bind(now)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Filled upcoming classes of a club that still have no court.
pub async fn list_awaiting_court_for_update<'e>(
    executor: impl PgExecutor<'e>,
    club_id: Uuid,
    now: DateTime<Utc>,
) -> SqlxResult<Vec<TimeSlotRow>> {
    sqlx::query_as::<_, TimeSlotRow>(&format!(
        r#"{SELECT_SLOT}
        WHERE ts.club_id = $1
          AND ts.court_id IS NULL
          AND ts.confirmed_size IS NOT NULL
          AND ts.status <> 'cancelled'
          AND ts.start_time > $2
        ORDER BY ts.start_time ASC
        FOR UPDATE OF ts SKIP LOCKED
        "#
    ))
    .bind(club_id)
    .bind(now)
    .fetch_all(executor)
    .await
}

/// Clubs with at least one filled upcoming class waiting for a court.
pub async fn clubs_awaiting_court<'e>(
    executor: impl PgExecutor<'e>,
    now: DateTime<Utc>,
) -> SqlxResult<Vec<Uuid>> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT club_id
        FROM time_slots
        WHERE court_id IS NULL
          AND confirmed_size IS NOT NULL
          AND status <> 'cancelled'
          AND start_time > $1
        "#,
    )
    .bind(now)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Classes whose end time falls in `(after, until]`.
pub async fn finished_between<'e>(
    executor: impl PgExecutor<'e>,
    after: DateTime<Utc>,
    until: DateTime<Utc>,
) -> SqlxResult<Vec<Uuid>> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM time_slots
        WHERE end_time > $1 AND end_time <= $2
        "#,
    )
    .bind(after)
    .bind(until)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}
