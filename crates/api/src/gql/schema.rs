use async_graphql::dataloader::DataLoader;
use async_graphql::Schema;

use super::loaders::{ClubLoader, UserLoader};
use super::{MutationRoot, QueryRoot, SubscriptionRoot};
use crate::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the GraphQL schema and inject shared state (AppState) into the context.
pub fn build_schema(state: AppState) -> AppSchema {
    let club_loader = DataLoader::new(ClubLoader::new(state.db.clone()), tokio::spawn);
    let user_loader = DataLoader::new(UserLoader::new(state.db.clone()), tokio::spawn);

    let introspection_enabled = state.server_config().gql_introspection;

    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot,
    )
    .data(state)
    .data(club_loader)
    .data(user_loader)
    .limit_depth(15)
    .limit_complexity(200);

    if !introspection_enabled {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
