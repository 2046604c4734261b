//! Tabular value estimation for a blackjack-style card game
//!
//! This crate provides:
//! - Monte Carlo policy evaluation of a fixed hit/stand policy
//! - TD(0) policy evaluation with online bootstrapped updates
//! - Q-learning control with an epsilon-greedy behavior policy
//! - A plain-text persistence codec for all seven value tables
//!
//! The game rules engine itself is an external collaborator reached through
//! the [`ports::Environment`] port; the crate never deals cards or resolves
//! busts. Test adapters under `tests/` show what an implementation of the
//! port looks like.

pub mod codec;
pub mod error;
pub mod estimator;
pub mod observers;
pub mod policy;
pub mod ports;
pub mod summary;
pub mod tables;
pub mod types;

pub use error::{Error, Result};
pub use estimator::{DEFAULT_EPSILON, Estimator, Trajectory};
pub use policy::default_policy;
pub use ports::{Environment, Observer};
pub use summary::{Algorithm, RunSummary};
pub use tables::{DISCOUNT, ValueTables, alpha};
pub use types::{Action, State};
