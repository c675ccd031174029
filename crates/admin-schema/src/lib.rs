//! The GraphQL schema served by the admin endpoint.

mod service;
mod users;

use async_graphql::{EmptySubscription, MergedObject, Schema};

pub use users::{User, UserInput, UserStore};

pub type AdminSchema = Schema<Query, Mutation, EmptySubscription>;

#[derive(Debug, MergedObject, Default)]
pub struct Query(service::ServiceQuery, users::UsersQuery);

#[derive(Debug, MergedObject, Default)]
pub struct Mutation(users::UsersMutation);

/// Builds the admin schema once for the whole process. The returned schema is
/// cheap to clone and safe to share between requests.
pub fn build(config: &admin_config::Config, store: UserStore) -> AdminSchema {
    let mut builder = Schema::build(Query::default(), Mutation::default(), EmptySubscription).data(store);

    if !config.graph.introspection {
        builder = builder.disable_introspection();
    }

    if let Some(depth) = config.operation_limits.depth {
        builder = builder.limit_depth(depth);
    }

    if let Some(complexity) = config.operation_limits.complexity {
        builder = builder.limit_complexity(complexity);
    }

    builder.finish()
}
