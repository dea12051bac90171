// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reshaping of result tables into the inputs of the comparison plots.
//!
//! One table is plotted as is. Several tables (one per variant, e.g. with
//! and without set axioms) are restricted to a common set of quantifiers and
//! melted into one long table with a variant label per row.

use crate::{
    record::QUANTIFIER_PREFIX,
    statistics::median_of_present,
    table::ResultTable,
};
use itertools::Itertools;
use serde::Serialize;
use std::{cmp::Ordering, collections::BTreeSet};

/// Quantifiers Z3 names itself when the program does not.
pub const ANONYMOUS_QUANTIFIER_PREFIXES: [&str; 2] = ["quant-u", "k!"];

pub fn is_anonymous(quantifier: &str) -> bool {
    ANONYMOUS_QUANTIFIER_PREFIXES
        .iter()
        .any(|prefix| quantifier.starts_with(prefix))
}

/// Larger values first, missing values last.
fn descending(left: &Option<f64>, right: &Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.total_cmp(left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The quantifier columns of one result table, without the `qi-` prefix.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantTable {
    pub label: String,
    quantifiers: Vec<String>,
    /// One row per iteration, aligned with `quantifiers`.
    rows: Vec<Vec<Option<u64>>>,
    execution_times: Vec<f64>,
}

impl VariantTable {
    pub fn from_result_table(label: impl Into<String>, table: &ResultTable) -> Self {
        let keys = table.quantifier_keys();
        let rows = table
            .records()
            .iter()
            .map(|record| keys.iter().map(|key| record.count(key)).collect())
            .collect();
        Self {
            label: label.into(),
            quantifiers: keys
                .iter()
                .map(|&key| key.strip_prefix(QUANTIFIER_PREFIX).unwrap_or(key).to_string())
                .collect(),
            rows,
            execution_times: table.records().iter().map(|record| record.execution_time()).collect(),
        }
    }

    pub fn quantifiers(&self) -> &[String] {
        &self.quantifiers
    }

    pub fn rows(&self) -> &[Vec<Option<u64>>] {
        &self.rows
    }

    pub fn execution_times(&self) -> &[f64] {
        &self.execution_times
    }

    fn column(&self, index: usize) -> impl Iterator<Item = Option<u64>> + '_ {
        self.rows.iter().map(move |row| row[index])
    }

    fn column_of(&self, quantifier: &str) -> Option<usize> {
        self.quantifiers.iter().position(|name| name == quantifier)
    }

    /// Median number of instantiations per quantifier, in column order.
    pub fn medians(&self) -> Vec<Option<f64>> {
        (0..self.quantifiers.len())
            .map(|index| median_of_present(self.column(index)))
            .collect()
    }

    /// Keeps the columns at `indices`, in that order.
    fn select_columns(&mut self, indices: &[usize]) {
        self.quantifiers = indices.iter().map(|&index| self.quantifiers[index].clone()).collect();
        for row in &mut self.rows {
            *row = indices.iter().map(|&index| row[index]).collect();
        }
    }

    pub fn retain_quantifiers(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let indices: Vec<usize> = (0..self.quantifiers.len())
            .filter(|&index| keep(&self.quantifiers[index]))
            .collect();
        self.select_columns(&indices);
    }

    pub fn filter_anonymous(&mut self) {
        self.retain_quantifiers(|quantifier| !is_anonymous(quantifier));
    }

    /// The `n` quantifiers with the largest median. Quantifiers that were
    /// never reported are not ranked.
    pub fn top_by_median(&self, n: usize) -> Vec<String> {
        self.medians()
            .into_iter()
            .enumerate()
            .filter(|(_, median)| median.is_some())
            .sorted_by(|(_, left), (_, right)| descending(left, right))
            .take(n)
            .map(|(index, _)| self.quantifiers[index].clone())
            .collect()
    }

    pub fn retain_top(&mut self, n: usize) {
        let top = self.top_by_median(n);
        let indices: Vec<usize> = top.iter().filter_map(|name| self.column_of(name)).collect();
        self.select_columns(&indices);
    }

    /// Orders the columns by the counts of the first iteration, descending.
    pub fn sort_by_first_row(&mut self) {
        let Some(first) = self.rows.first() else {
            return;
        };
        let keys: Vec<Option<f64>> = first.iter().map(|count| count.map(|c| c as f64)).collect();
        let indices: Vec<usize> = (0..self.quantifiers.len())
            .sorted_by(|&left, &right| descending(&keys[left], &keys[right]))
            .collect();
        self.select_columns(&indices);
    }

    /// Orders the columns by their median, descending.
    pub fn sort_by_median(&mut self) {
        let medians = self.medians();
        let indices: Vec<usize> = (0..self.quantifiers.len())
            .sorted_by(|&left, &right| descending(&medians[left], &medians[right]))
            .collect();
        self.select_columns(&indices);
    }
}

/// Restricts every variant to the union of the per-variant top `n`
/// quantifiers.
pub fn retain_common_top(variants: &mut [VariantTable], n: usize) {
    let union: BTreeSet<String> = variants
        .iter()
        .flat_map(|variant| variant.top_by_median(n))
        .collect();
    for variant in variants {
        variant.retain_quantifiers(|quantifier| union.contains(quantifier));
    }
}

/// One cell of the long-format quantifier table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeltedRow {
    #[serde(rename = "Variant")]
    pub variant: String,
    pub quantifier: String,
    pub instantiations: Option<u64>,
}

/// Stacks the variants on top of each other and melts the result: one row
/// per quantifier, variant and iteration. Quantifiers appear in order of
/// their first occurrence; a quantifier that a variant lacks is missing in
/// all of that variant's rows.
pub fn melt(variants: &[VariantTable]) -> Vec<MeltedRow> {
    let quantifiers: Vec<&String> = variants
        .iter()
        .flat_map(|variant| variant.quantifiers.iter())
        .unique()
        .collect();
    let mut melted = Vec::new();
    for quantifier in quantifiers {
        for variant in variants {
            let index = variant.column_of(quantifier);
            for row in &variant.rows {
                melted.push(MeltedRow {
                    variant: variant.label.clone(),
                    quantifier: quantifier.clone(),
                    instantiations: index.and_then(|index| row[index]),
                });
            }
        }
    }
    melted
}

/// Execution times side by side, one column per variant. Shorter variants
/// are padded with missing values.
pub fn execution_time_columns(variants: &[VariantTable]) -> (Vec<&str>, Vec<Vec<Option<f64>>>) {
    let header = variants.iter().map(|variant| variant.label.as_str()).collect();
    let length = variants
        .iter()
        .map(|variant| variant.execution_times.len())
        .max()
        .unwrap_or(0);
    let rows = (0..length)
        .map(|index| {
            variants
                .iter()
                .map(|variant| variant.execution_times.get(index).copied())
                .collect()
        })
        .collect();
    (header, rows)
}

/// Label of a variant whose table is at `file_stem`: the program stem, which
/// precedes the first `-` of the generated name.
pub fn default_variant_label(file_stem: &str) -> String {
    file_stem.split('-').next().unwrap_or(file_stem).to_string()
}
