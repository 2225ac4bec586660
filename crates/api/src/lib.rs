//! lireddit API server library.
//!
//! Exposes the core building blocks (config, state, sessions, GraphQL
//! schema, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod auth;
pub mod config;
pub mod graphql;
pub mod routes;
pub mod session;
pub mod state;
