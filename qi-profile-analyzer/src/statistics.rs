// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::Serialize;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut values = values.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

/// The `q`-quantile of already sorted values, linearly interpolated between
/// the two closest ranks.
fn quantile_of_sorted(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let position = (values.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(values[lower] + (values[upper] - values[lower]) * fraction)
}

pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    debug_assert!((0.0..=1.0).contains(&q));
    quantile_of_sorted(&sorted(values), q)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Median of the present values; `None` if there are none.
pub fn median_of_present(values: impl IntoIterator<Item = Option<u64>>) -> Option<f64> {
    let present: Vec<f64> = values.into_iter().flatten().map(|value| value as f64).collect();
    median(&present)
}

/// Box-plot statistics of the execution times of one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionTimeSummary {
    pub median: f64,
    pub first_quartile: f64,
    pub third_quartile: f64,
    pub interquartile_range: f64,
    /// Times further than 1.5 interquartile ranges outside the quartiles.
    pub outliers: Vec<f64>,
}

impl ExecutionTimeSummary {
    pub fn from_times(times: &[f64]) -> Option<Self> {
        let sorted_times = sorted(times);
        let median = quantile_of_sorted(&sorted_times, 0.5)?;
        let first_quartile = quantile_of_sorted(&sorted_times, 0.25)?;
        let third_quartile = quantile_of_sorted(&sorted_times, 0.75)?;
        let interquartile_range = third_quartile - first_quartile;
        let lower_fence = first_quartile - 1.5 * interquartile_range;
        let upper_fence = third_quartile + 1.5 * interquartile_range;
        let outliers = times
            .iter()
            .copied()
            .filter(|time| *time < lower_fence || *time > upper_fence)
            .collect();
        Some(Self {
            median,
            first_quartile,
            third_quartile,
            interquartile_range,
            outliers,
        })
    }
}
