//! Runtime settings resolved from the command line

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::render::DEFAULT_BATCH_SIZE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Dataset file; the embedded dataset when `None`
    pub dataset: Option<PathBuf>,
    /// Card template file; the embedded template when `None`
    pub template: Option<PathBuf>,
    /// Shuffle seed for render order
    pub seed: u64,
    pub batch_size: usize,
    /// Extra pause after each yield between batches
    pub batch_delay: Duration,
    /// Fetch artwork for the selected card
    pub artwork: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: None,
            template: None,
            seed: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::ZERO,
            artwork: true,
        }
    }
}

/// A different render order each run
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
