use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::gql::types::Role;

/// Caller identity taken from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        Ok(Self {
            id: claims.user_id()?,
            email: claims.email.clone(),
            role: claims.role(),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require(&self, required: Role) -> Result<(), AppError> {
        if crate::auth::permissions::has_required_role(&self.role, required) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "{} privileges required",
                required.as_str()
            )))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        AuthUser::from_claims(claims)
    }
}
