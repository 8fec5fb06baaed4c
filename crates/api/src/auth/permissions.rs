use async_graphql::{Context, Error, Result};

use crate::auth::{AuthUser, Claims};
use crate::gql::types::Role;

/// The authenticated caller, or an error when the request carried no token.
pub fn require_auth(ctx: &Context<'_>) -> Result<AuthUser> {
    let claims = ctx
        .data::<Claims>()
        .map_err(|_| Error::new("You must be logged in to perform this action"))?;

    AuthUser::from_claims(claims).map_err(|e| Error::new(e.to_string()))
}

/// Check if the authenticated user has the required role
pub fn require_role(ctx: &Context<'_>, required_role: Role) -> Result<AuthUser> {
    let user = require_auth(ctx)?;

    if !has_required_role(&user.role, required_role) {
        return Err(Error::new(match required_role {
            Role::Admin => format!(
                "Access denied: Administrator privileges required. Your current role is {:?}",
                user.role
            ),
            Role::Instructor => format!(
                "Access denied: Instructor privileges required. Your current role is {:?}",
                user.role
            ),
            Role::Player => "Access denied: You need to be registered as a player".to_string(),
        }));
    }

    Ok(user)
}

pub fn has_required_role(user_role: &Role, required_role: Role) -> bool {
    match required_role {
        Role::Admin => *user_role == Role::Admin,
        Role::Instructor => *user_role == Role::Instructor || *user_role == Role::Admin,
        Role::Player => true,
    }
}
