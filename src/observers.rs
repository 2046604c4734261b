//! Observer implementations for run progress reporting.
//!
//! Observers allow composable data collection during estimation runs without
//! coupling the update loops to specific output formats.

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Result, ports::Observer, summary::Algorithm};

/// Progress bar observer - shows episode progress for a run
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self { progress_bar: None }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, algorithm: Algorithm, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        pb.set_message(algorithm.label());
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64);
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish();
        }
        Ok(())
    }
}
