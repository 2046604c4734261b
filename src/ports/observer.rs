//! Observer port - abstraction for run observation and progress reporting.

use crate::{Result, summary::Algorithm};

/// Observer trait for monitoring run procedures.
///
/// Observers can be composed to collect different kinds of data while an
/// estimation run is in flight, without coupling the update loops to any
/// particular output format. The methods are called in a fixed order:
///
/// 1. `on_run_start(algorithm, total_episodes)` - once at the beginning
/// 2. `on_episode_end(episode)` - after each completed episode (1-based)
/// 3. `on_run_end()` - once at the end
///
/// Every hook has a no-op default, so an observer only implements the
/// events it cares about.
pub trait Observer: Send {
    /// Called when a run procedure starts.
    fn on_run_start(&mut self, _algorithm: Algorithm, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each completed episode. `episode` counts from 1.
    fn on_episode_end(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called when the run completes. Use this to finalize output.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}
