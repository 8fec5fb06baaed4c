use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::BookingRow;

#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub id: Uuid,
    pub time_slot_id: Uuid,
    pub user_id: Uuid,
    pub group_size: i16,
    pub status: String,
    pub is_private: bool,
    pub payment_method: String,
    pub amount_paid: i64,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateBooking,
) -> SqlxResult<BookingRow> {
    sqlx::query_as::<_, BookingRow>(
        r#"
        INSERT INTO bookings
            (id, time_slot_id, user_id, group_size, status, is_private, payment_method, amount_paid)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, time_slot_id, user_id, group_size, status, is_recycled, is_private,
                  payment_method, amount_paid, created_at, updated_at
        "#,
    )
    .bind(data.id)
    .bind(data.time_slot_id)
    .bind(data.user_id)
    .bind(data.group_size)
    .bind(&data.status)
    .bind(data.is_private)
    .bind(&data.payment_method)
    .bind(data.amount_paid)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<BookingRow>> {
    sqlx::query_as::<_, BookingRow>(
        r#"
        SELECT id, time_slot_id, user_id, group_size, status, is_recycled, is_private,
               payment_method, amount_paid, created_at, updated_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Every booking of a slot, cancelled ones included; recycled seats are
/// cancelled bookings and the pricing rules need them.
pub async fn list_by_slot<'e>(
    executor: impl PgExecutor<'e>,
    time_slot_id: Uuid,
) -> SqlxResult<Vec<BookingRow>> {
    sqlx::query_as::<_, BookingRow>(
        r#"
        SELECT id, time_slot_id, user_id, group_size, status, is_recycled, is_private,
               payment_method, amount_paid, created_at, updated_at
        FROM bookings
        WHERE time_slot_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(time_slot_id)
    .fetch_all(executor)
    .await
}

pub async fn list_by_slots<'e>(
    executor: impl PgExecutor<'e>,
    time_slot_ids: &[Uuid],
) -> SqlxResult<Vec<BookingRow>> {
    sqlx::query_as::<_, BookingRow>(
        r#"
        SELECT id, time_slot_id, user_id, group_size, status, is_recycled, is_private,
               payment_method, amount_paid, created_at, updated_at
        FROM bookings
        WHERE time_slot_id = ANY($1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(time_slot_ids)
    .fetch_all(executor)
    .await
}

pub async fn list_by_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    include_cancelled: bool,
) -> SqlxResult<Vec<BookingRow>> {
    sqlx::query_as::<_, BookingRow>(
        r#"
        SELECT b.id, b.time_slot_id, b.user_id, b.group_size, b.status, b.is_recycled,
               b.is_private, b.payment_method, b.amount_paid, b.created_at, b.updated_at
        FROM bookings b
        JOIN time_slots ts ON ts.id = b.time_slot_id
        WHERE b.user_id = $1
          AND ($2 OR b.status <> 'cancelled')
        ORDER BY ts.start_time ASC
        "#,
    )
    .bind(user_id)
    .bind(include_cancelled)
    .fetch_all(executor)
    .await
}

pub async fn update_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: &str,
    is_recycled: bool,
) -> SqlxResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET status = $2, is_recycled = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(is_recycled)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Sets the same status on several bookings, clearing their recycled flag.
pub async fn update_status_many<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
    status: &str,
) -> SqlxResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET status = $2, is_recycled = false, updated_at = NOW()
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .bind(status)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
