use async_graphql::{Context, Object, Result};

use crate::auth::permissions::require_auth;
use crate::gql::error::GqlError;
use crate::gql::types::User;
use crate::services::accounts::{self, RegisterParams};
use crate::state::AppState;

use super::types::{AuthPayload, UserLoginInput, UserRegistrationInput};

// ── Queries ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// Get the current authenticated user's information
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let caller = require_auth(ctx)?;
        let state = ctx.data::<AppState>()?;

        let user = infra::repos::users::get_by_id(&state.db, caller.id)
            .await?
            .ok_or_else(|| async_graphql::Error::new("User not found"))?;

        Ok(user.into())
    }
}

// ── Mutations ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    async fn login_user(&self, ctx: &Context<'_>, input: UserLoginInput) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;

        let session = accounts::login(&state.db, state.jwt_service(), &input.email, &input.password)
            .await
            .map_err(GqlError::from)?;

        Ok(AuthPayload {
            token: session.token,
            user: session.user.into(),
        })
    }

    async fn register_user(
        &self,
        ctx: &Context<'_>,
        input: UserRegistrationInput,
    ) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;

        let session = accounts::register(
            &state.db,
            state.jwt_service(),
            RegisterParams {
                email: input.email,
                password: input.password,
                first_name: input.first_name,
                last_name: input.last_name,
                level: input.level,
                gender: input.gender,
            },
        )
        .await
        .map_err(GqlError::from)?;

        Ok(AuthPayload {
            token: session.token,
            user: session.user.into(),
        })
    }
}
