use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{CallVerdict, Graded, WordVerdict};

/// Pass/fail totals over one rubric run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub passed: usize,
    pub failed: usize,
    /// Calls with no verdict; never counted as passed or failed
    pub skipped: usize,
    /// Scored calls (passed + failed)
    pub total: usize,
}

impl PassSummary {
    pub fn from_verdicts<T: Graded>(verdicts: &[CallVerdict<T>]) -> Self {
        let mut summary = Self::default();
        for verdict in verdicts {
            match verdict.scored() {
                Some(v) if v.passed() => summary.passed += 1,
                Some(_) => summary.failed += 1,
                None => summary.skipped += 1,
            }
        }
        summary.total = summary.passed + summary.failed;
        summary
    }

    /// Fraction of scored calls that passed; 0 when nothing was scored
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }
}

/// Number of calls per match count
pub fn match_count_distribution(verdicts: &[CallVerdict<WordVerdict>]) -> BTreeMap<usize, usize> {
    let mut distribution = BTreeMap::new();
    for verdict in verdicts.iter().filter_map(|v| v.scored()) {
        *distribution.entry(verdict.match_count).or_insert(0) += 1;
    }
    distribution
}
