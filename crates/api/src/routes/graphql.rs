//! The GraphQL endpoint and its in-browser IDE.
//!
//! ```text
//! GET  /graphql   -> GraphiQL IDE
//! POST /graphql   -> execute a query/mutation
//! ```
//!
//! The POST handler owns the session lifecycle: load from the `qid` cookie,
//! attach to the request's GraphQL context, and flush any change back to the
//! store (adding the cookie when a session row was just created) before the
//! response leaves.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::CookieJar;

use crate::session::Session;
use crate::state::AppState;

/// Sanitized GraphQL error response for session-store faults. No internal
/// details ever reach the caller.
fn internal_error() -> GraphQLResponse {
    async_graphql::Response::from_errors(vec![async_graphql::ServerError::new(
        "Internal server error",
        None,
    )])
    .into()
}

/// POST /graphql -- execute with the request's session attached.
async fn graphql_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    req: GraphQLRequest,
) -> (CookieJar, GraphQLResponse) {
    let session = match Session::load(&state.pool, &jar).await {
        Ok(session) => session,
        Err(err) => {
            tracing::error!(error = %err, "Failed to load session");
            return (jar, internal_error());
        }
    };

    let request = req.into_inner().data(session.clone());
    let response = state.schema.execute(request).await;

    // Session changes must hit the store before the response is sent. A
    // failed flush must not hand the client a cookie for a row that was
    // never written, so the error path responds with an empty jar.
    let jar = match session.flush(&state.pool, &state.config.session, jar).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!(error = %err, "Failed to flush session");
            return (CookieJar::new(), internal_error());
        }
    };

    (jar, response.into())
}

/// GET /graphql -- serve the GraphiQL IDE.
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Mount the GraphQL routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", get(graphiql).post(graphql_handler))
}
