//! GraphQL schema assembly.
//!
//! Query and mutation roots are merged from per-resource resolver structs;
//! the database pool is attached as schema data and each request adds its
//! own [`Session`](crate::session::Session) before execution.

pub mod post;
pub mod user;

use async_graphql::{EmptySubscription, MergedObject, Object, Schema};

use lireddit_db::DbPool;

use post::{PostMutation, PostQuery};
use user::{UserMutation, UserQuery};

/// Smoke-test resolver, handy for checking the endpoint is alive.
#[derive(Default)]
pub struct MetaQuery;

#[Object]
impl MetaQuery {
    async fn hello(&self) -> &'static str {
        "hello world"
    }
}

/// Combined query root.
#[derive(MergedObject, Default)]
pub struct QueryRoot(MetaQuery, UserQuery, PostQuery);

/// Combined mutation root.
#[derive(MergedObject, Default)]
pub struct MutationRoot(UserMutation, PostMutation);

/// The executable schema type.
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the database pool available to all resolvers.
pub fn build_schema(pool: DbPool) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(pool)
    .finish()
}
