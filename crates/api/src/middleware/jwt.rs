use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Verifies a bearer token when one is present and stores its claims in the
/// request extensions. Requests without a token pass through anonymously;
/// handlers decide whether they need a caller.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(request.headers()) {
        let claims = state
            .jwt_service()
            .verify_token(token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
        request.extensions_mut().insert::<Claims>(claims);
    }

    Ok(next.run(request).await)
}
