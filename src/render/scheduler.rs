//! Work units for incremental rendering

use std::ops::Range;
use std::time::Duration;

/// Species rendered per scheduling tick
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Splits `total` species into consecutive batches of at most `batch_size`.
///
/// Offsets are the number of species already rendered, so the reducer can
/// resume from the card count alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    total: usize,
    batch_size: usize,
}

impl BatchPlan {
    pub fn new(total: usize, batch_size: usize) -> Self {
        Self {
            total,
            batch_size: batch_size.max(1),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Index range of the batch starting at `offset`, or `None` when done
    pub fn range(&self, offset: usize) -> Option<Range<usize>> {
        if offset >= self.total {
            return None;
        }
        Some(offset..(offset + self.batch_size).min(self.total))
    }

    pub fn next_offset(&self, offset: usize) -> usize {
        (offset + self.batch_size).min(self.total)
    }

    pub fn is_finished(&self, offset: usize) -> bool {
        offset >= self.total
    }

    pub fn batch_count(&self) -> usize {
        self.total.div_ceil(self.batch_size)
    }
}

/// Hands control back to the runtime between batches so input and redraws
/// interleave with card construction.
pub async fn yield_between_batches(delay: Duration) {
    tokio::task::yield_now().await;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
