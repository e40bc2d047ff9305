//! Run counters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::records::MutationRecord;

/// Attempt outcomes and per-category mutation counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub attempted: u64,
    pub valid: u64,
    pub invalid: u64,
    pub duplicates: u64,
    /// Mutations per category across all persisted records
    pub by_category: BTreeMap<String, u64>,
}

impl RunStats {
    pub fn record_attempt(&mut self) {
        self.attempted += 1;
    }

    pub fn record_invalid(&mut self) {
        self.invalid += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    /// Count a persisted record and its mutations
    pub fn record_valid(&mut self, mutations: &[MutationRecord]) {
        self.valid += 1;
        for mutation in mutations {
            *self.by_category.entry(mutation.category.clone()).or_insert(0) += 1;
        }
    }

    /// Share of attempts that were persisted
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.valid as f64 / self.attempted as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Change;

    #[test]
    fn test_counts_accumulate() {
        let mut stats = RunStats::default();
        for _ in 0..4 {
            stats.record_attempt();
        }
        stats.record_invalid();
        stats.record_duplicate();
        let mutations = vec![
            Change::new("a", "widget.padding", 1, 2).into_record(1, "changeWidgetPadding", "style"),
            Change::new("b", "root.gap", 1, 2).into_record(2, "changeGap", "layout"),
            Change::new("c", "root.padding", 1, 2).into_record(3, "changePadding", "layout"),
        ];
        stats.record_valid(&mutations);
        stats.record_valid(&mutations[..1]);

        assert_eq!(stats.valid, 2);
        assert_eq!(stats.by_category["layout"], 2);
        assert_eq!(stats.by_category["style"], 2);
        assert_eq!(stats.attempted, stats.valid + stats.invalid + stats.duplicates);
        assert!((stats.acceptance_rate() - 0.5).abs() < f64::EPSILON);
    }
}
