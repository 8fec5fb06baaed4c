use async_graphql::{Context, Object, Result};

use crate::auth::permissions::require_role;
use crate::gql::types::{PaginatedResponse, PaginationInput, Role, User};
use crate::state::AppState;
use infra::repos::{users, UserFilter};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Club members, newest first (admins only)
    async fn users(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        role: Option<Role>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<User>> {
        require_role(ctx, Role::Admin)?;
        let state = ctx.data::<AppState>()?;

        let filter = UserFilter {
            search,
            role: role.map(String::from),
        };
        let limit_offset = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            users::list(&state.db, filter.clone(), Some(limit_offset)),
            users::count(&state.db, filter)
        )?;

        let items: Vec<User> = rows.into_iter().map(User::from).collect();
        Ok(PaginatedResponse::new(items, limit_offset, total_count))
    }
}
