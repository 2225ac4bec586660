use std::sync::Arc;

use crate::config::ServerConfig;
use crate::graphql::AppSchema;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lireddit_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The executable GraphQL schema.
    pub schema: AppSchema,
}
