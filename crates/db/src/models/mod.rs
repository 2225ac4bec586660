//! Entity models and DTOs, one module per table.

pub mod post;
pub mod session;
pub mod user;
