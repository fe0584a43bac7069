//! Personal fitness logbook backend core.
//!
//! Users authenticate with bearer tokens, log workouts composed of
//! exercises with sets/reps/weight, and query aggregated attendance and
//! performance statistics. The crate is transport-agnostic: a host wires
//! the functions under [`commands`] to whatever protocol it speaks, after
//! building an [`AppState`] from configuration.
//!
//! ```no_run
//! use fitness_logbook::{AppConfig, AppState};
//!
//! # async fn start() -> Result<(), fitness_logbook::Error> {
//! let config = AppConfig::from_env()?;
//! let state = AppState::initialize(&config).await?;
//! let page = fitness_logbook::commands::workouts::all_workouts(
//!   &state,
//!   Some("Bearer <token>"),
//!   Some(10),
//!   Some(0),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod attendance;
pub mod auth;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod grouping;
pub mod models;
pub mod mutations;
pub mod performance;
pub mod repository;

#[cfg(test)]
pub mod test_utils;

pub use config::{AppConfig, AuthConfig};
pub use db::{AppState, DbPool};
pub use error::Error;
pub use grouping::{WorkoutGroup, WorkoutPage};
