// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{collections::BTreeMap, time::Duration};

/// Prefix of every quantifier column. Keeps quantifier names apart from
/// [`EXECUTION_TIME_COLUMN`].
pub const QUANTIFIER_PREFIX: &str = "qi-";

pub const EXECUTION_TIME_COLUMN: &str = "execution_time";

/// Latest instantiation count per prefixed quantifier key.
pub type QuantifierCounts = BTreeMap<String, u64>;

pub fn quantifier_key(name: &str) -> String {
    format!("{QUANTIFIER_PREFIX}{name}")
}

/// The result of one profiling iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecord {
    instantiation_counts: QuantifierCounts,
    execution_time: f64,
}

impl RunRecord {
    pub fn new(instantiation_counts: QuantifierCounts, execution_time: Duration) -> Self {
        Self::from_seconds(instantiation_counts, execution_time.as_secs_f64())
    }

    pub fn from_seconds(instantiation_counts: QuantifierCounts, execution_time: f64) -> Self {
        debug_assert!(execution_time >= 0.0);
        debug_assert!(instantiation_counts
            .keys()
            .all(|key| key.starts_with(QUANTIFIER_PREFIX)));
        Self {
            instantiation_counts,
            execution_time,
        }
    }

    pub fn instantiation_counts(&self) -> &QuantifierCounts {
        &self.instantiation_counts
    }

    pub fn count(&self, key: &str) -> Option<u64> {
        self.instantiation_counts.get(key).copied()
    }

    /// Seconds the external tool needed for this iteration.
    pub fn execution_time(&self) -> f64 {
        self.execution_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_stored_in_seconds() {
        let record = RunRecord::new(QuantifierCounts::new(), Duration::from_millis(1500));
        assert_eq!(record.execution_time(), 1.5);
    }

    #[test]
    fn prefixed_keys_do_not_clash_with_execution_time() {
        assert_eq!(quantifier_key(EXECUTION_TIME_COLUMN), "qi-execution_time");
    }
}
