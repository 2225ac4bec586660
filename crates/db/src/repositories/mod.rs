//! Repositories, one per table. Each is a unit struct with associated
//! async functions taking a `&PgPool`.

pub mod post_repo;
pub mod session_repo;
pub mod user_repo;

pub use post_repo::PostRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
