//! Environment port - the contract with the external game rules engine.

use crate::types::{Action, State};

/// Stepping interface over a finite, enumerable episodic game.
///
/// The estimation engine consumes this port and never implements it: card
/// dealing, turn resolution, bust/stand logic, and reward computation all
/// live behind it. The engine owns the environment handle exclusively for
/// the duration of a run procedure; the port is neither reentrant nor
/// thread-safe, and a concurrent caller must give each run its own instance.
///
/// # Contract
///
/// - Episodes terminate in a bounded, finite number of steps.
/// - [`current_state`](Environment::current_state) returns `None` exactly
///   when the episode has ended ([`is_over`](Environment::is_over) is true).
/// - Non-terminal rewards are zero in this domain; the single non-zero
///   reward arrives with the terminal transition.
/// - [`state_universe`](Environment::state_universe) is stable: it is read
///   once, at engine construction, to pre-populate every value table, and
///   every state the environment ever reports must be drawn from it.
pub trait Environment {
    /// Start a new episode. Side effect only.
    fn reset(&mut self);

    /// The current state, or `None` once the episode has ended.
    fn current_state(&self) -> Option<State>;

    /// The reward associated with the current position, or `None` when no
    /// reward is defined (not expected mid-episode).
    fn current_reward(&self) -> Option<f64>;

    /// Apply a move. Calling this after the episode has ended is a contract
    /// violation that the engine treats as a no-op, never as state
    /// corruption.
    fn apply(&mut self, action: Action);

    /// True once no further actions are possible.
    fn is_over(&self) -> bool;

    /// The finite enumeration of every reachable state.
    fn state_universe(&self) -> Vec<State>;
}
