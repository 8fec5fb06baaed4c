use crate::models::SlotActivityLogRow;
use sqlx::{PgPool, Postgres, Result as SqlxResult};
use uuid::Uuid;

/// Insert a new activity log entry and return it.
pub async fn log_activity(
    executor: impl sqlx::Executor<'_, Database = Postgres>,
    time_slot_id: Uuid,
    event_category: &str,
    event_action: &str,
    actor_id: Option<Uuid>,
    subject_id: Option<Uuid>,
    metadata: serde_json::Value,
) -> SqlxResult<SlotActivityLogRow> {
    sqlx::query_as::<_, SlotActivityLogRow>(
        "INSERT INTO slot_activity_log
         (time_slot_id, event_category, event_action, actor_id, subject_id, metadata)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, time_slot_id, event_category, event_action, actor_id, subject_id, event_time, metadata",
    )
    .bind(time_slot_id)
    .bind(event_category)
    .bind(event_action)
    .bind(actor_id)
    .bind(subject_id)
    .bind(metadata)
    .fetch_one(executor)
    .await
}

/// Entries for a slot, newest first.
pub async fn list_by_slot(
    pool: &PgPool,
    time_slot_id: Uuid,
    category_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> SqlxResult<Vec<SlotActivityLogRow>> {
    sqlx::query_as::<_, SlotActivityLogRow>(
        "SELECT id, time_slot_id, event_category, event_action, actor_id, subject_id, event_time, metadata
         FROM slot_activity_log
         WHERE time_slot_id = $1 AND ($2::text IS NULL OR event_category = $2)
         ORDER BY event_time DESC
         LIMIT $3 OFFSET $4",
    )
    .bind(time_slot_id)
    .bind(category_filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_by_slot(
    pool: &PgPool,
    time_slot_id: Uuid,
    category_filter: Option<&str>,
) -> SqlxResult<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM slot_activity_log
         WHERE time_slot_id = $1 AND ($2::text IS NULL OR event_category = $2)",
    )
    .bind(time_slot_id)
    .bind(category_filter)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
