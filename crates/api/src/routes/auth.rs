use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::accounts::{self, RegisterParams, Session};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub level: Option<String>,
    pub gender: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub role: String,
    pub level: Option<f64>,
    pub gender: Option<String>,
    pub points_balance: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        let user = session.user;
        let level = user.level().ok().flatten().map(|l| l.as_f64());
        Self {
            token: session.token,
            user: UserResponse {
                id: user.id,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                role: user.role,
                level,
                gender: user.gender,
                points_balance: user.points_balance,
                created_at: user.created_at,
            },
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = accounts::login(&state.db, state.jwt_service(), &body.email, &body.password).await?;
    Ok(Json(session.into()))
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = accounts::register(
        &state.db,
        state.jwt_service(),
        RegisterParams {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            level: body.level,
            gender: body.gender,
        },
    )
    .await?;

    Ok(Json(session.into()))
}
