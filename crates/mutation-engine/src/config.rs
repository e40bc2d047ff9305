//! Run-level configuration

use std::path::PathBuf;

use crate::constants::run::{BATCH_SIZE, MAX_ATTEMPTS_PER_ITEM, PROGRESS_INTERVAL};

/// Knobs for one generation run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory for batch files and the report
    pub output_dir: PathBuf,
    /// Records per batch file
    pub batch_size: u64,
    /// Valid items between progress log lines
    pub progress_interval: u64,
    /// Attempt ceiling per requested document in uncontrolled runs;
    /// 0 removes the ceiling
    pub max_attempts_per_item: u64,
    /// Seed for a reproducible run; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            batch_size: BATCH_SIZE,
            progress_interval: PROGRESS_INTERVAL,
            max_attempts_per_item: MAX_ATTEMPTS_PER_ITEM,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Total attempt budget for `target` documents, if bounded
    pub fn attempt_ceiling(&self, target: u64) -> Option<u64> {
        if self.max_attempts_per_item == 0 {
            None
        } else {
            Some(target.saturating_mul(self.max_attempts_per_item))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_ceiling() {
        let mut config = EngineConfig::default();
        assert_eq!(config.attempt_ceiling(10), Some(1000));
        config.max_attempts_per_item = 0;
        assert_eq!(config.attempt_ceiling(10), None);
    }
}
