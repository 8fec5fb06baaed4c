use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::{
    models::{UserCredentialsRow, UserRow},
    pagination::LimitOffset,
};

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub level_tenths: Option<i16>,
    pub gender: Option<String>,
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, first_name, last_name, role, level_tenths, gender,
               points_balance, is_active, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, first_name, last_name, role, level_tenths, gender,
               points_balance, is_active, created_at, updated_at
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await
}

fn push_filter(query: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>, filter: &UserFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search.to_lowercase());
        query.push(" AND (LOWER(email) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR LOWER(first_name) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR LOWER(last_name) LIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    if let Some(role) = &filter.role {
        query.push(" AND role = ");
        query.push_bind(role.clone());
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: UserFilter,
    page: Option<LimitOffset>,
) -> SqlxResult<Vec<UserRow>> {
    let page = page.unwrap_or_default();

    let mut query = sqlx::QueryBuilder::new(
        "SELECT id, email, first_name, last_name, role, level_tenths, gender, points_balance, is_active, created_at, updated_at FROM users WHERE 1=1",
    );
    push_filter(&mut query, &filter);

    query.push(" ORDER BY created_at DESC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<UserRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: UserFilter) -> SqlxResult<i64> {
    let mut query = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
    push_filter(&mut query, &filter);

    let row: (i64,) = query.build_query_as().fetch_one(executor).await?;
    Ok(row.0)
}

pub async fn get_credentials_by_email<'e>(
    executor: impl PgExecutor<'e>,
    email: &str,
) -> SqlxResult<Option<UserCredentialsRow>> {
    sqlx::query_as::<_, UserCredentialsRow>(
        r#"
        SELECT id, email, password_hash, role, is_active
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateUserData) -> SqlxResult<UserRow> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, first_name, last_name, password_hash, role, level_tenths, gender)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, email, first_name, last_name, role, level_tenths, gender,
                  points_balance, is_active, created_at, updated_at
        "#,
    )
    .bind(&data.email)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.password_hash)
    .bind(&data.role)
    .bind(data.level_tenths)
    .bind(&data.gender)
    .fetch_one(executor)
    .await
}

/// Adds `delta` points (negative to deduct) and returns the new balance.
/// Fails with `RowNotFound` rather than letting a balance go negative.
pub async fn adjust_points<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    delta: i64,
) -> SqlxResult<i64> {
    let row: (i64,) = sqlx::query_as(
        r#"
        UPDATE users
        SET points_balance = points_balance + $2, updated_at = NOW()
        WHERE id = $1 AND points_balance + $2 >= 0
        RETURNING points_balance
        "#,
    )
    .bind(id)
    .bind(delta)
    .fetch_one(executor)
    .await?;

    Ok(row.0)
}

/// Locks several user rows, always in id order.
pub async fn lock_many<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, first_name, last_name, role, level_tenths, gender,
               points_balance, is_active, created_at, updated_at
        FROM users
        WHERE id = ANY($1)
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await
}
