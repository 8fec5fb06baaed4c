use domain::{Gender, LevelValue};
use infra::models::UserRow;
use infra::repos::{users, CreateUserData};
use sqlx::PgPool;

use crate::auth::password::PasswordService;
use crate::auth::JwtService;
use crate::error::AppError;
use crate::gql::types::Role;

pub struct RegisterParams {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Free text such as "3.5" or "3,5"
    pub level: Option<String>,
    pub gender: Option<String>,
}

/// A signed-in user and their access token.
pub struct Session {
    pub user: UserRow,
    pub token: String,
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::BadRequest("A valid email address is required".to_string())),
    }
}

/// Creates a player account. Instructors and admins are provisioned directly
/// in the database.
pub async fn register(
    pool: &PgPool,
    jwt: &JwtService,
    params: RegisterParams,
) -> Result<Session, AppError> {
    let email = normalize_email(&params.email)?;
    PasswordService::validate_password_strength(&params.password)?;

    let first_name = params.first_name.trim().to_string();
    if first_name.is_empty() {
        return Err(AppError::BadRequest("First name is required".to_string()));
    }

    let level_tenths = params
        .level
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| raw.parse::<LevelValue>())
        .transpose()?
        .map(|level| i16::from(level.tenths()));

    let gender = params
        .gender
        .as_deref()
        .map(str::parse::<Gender>)
        .transpose()?
        .map(|g| g.as_str().to_string());

    if users::get_credentials_by_email(pool, &email).await?.is_some() {
        return Err(AppError::BadRequest(
            "A user with this email already exists".to_string(),
        ));
    }

    let password_hash = PasswordService::hash_password(&params.password)?;

    let user = users::create(
        pool,
        CreateUserData {
            email,
            first_name,
            last_name: params.last_name.filter(|n| !n.trim().is_empty()),
            password_hash,
            role: Role::Player.as_str().to_string(),
            level_tenths,
            gender,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "registered new player");

    let token = jwt.create_token(user.id, user.email.clone(), Role::Player)?;
    Ok(Session { user, token })
}

pub async fn login(
    pool: &PgPool,
    jwt: &JwtService,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let credentials = users::get_credentials_by_email(pool, email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !credentials.is_active {
        return Err(AppError::Unauthorized("Account is disabled".to_string()));
    }

    let hash = credentials.password_hash.as_deref().ok_or_else(invalid)?;
    if !PasswordService::verify_password(password, hash)? {
        return Err(invalid());
    }

    let user = users::get_by_id(pool, credentials.id)
        .await?
        .ok_or_else(invalid)?;

    let token = jwt.create_token(user.id, user.email.clone(), Role::from(credentials.role))?;
    Ok(Session { user, token })
}
