//! SocialWeb users service
//!
//! Accepts user registrations on `POST /api/1.0/users` and stores them in
//! PostgreSQL or, for local runs and tests, in memory.

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

use sqlx::migrate::Migrator;

pub use routes::create_router;
pub use state::AppState;

/// Schema migrations for the `users` table
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
