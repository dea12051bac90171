// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    error::{Error, ErrorKind},
    record::{quantifier_key, QuantifierCounts, RunRecord, EXECUTION_TIME_COLUMN, QUANTIFIER_PREFIX},
};
use itertools::Itertools;
use std::io;

/// The records of all iterations of one run, in iteration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
    records: Vec<RunRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every quantifier key seen in any iteration, sorted.
    pub fn quantifier_keys(&self) -> Vec<&str> {
        self.records
            .iter()
            .flat_map(|record| record.instantiation_counts().keys())
            .map(String::as_str)
            .sorted()
            .dedup()
            .collect()
    }

    /// The header of the persisted table: all quantifier keys followed by
    /// the execution time.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = self.quantifier_keys();
        columns.push(EXECUTION_TIME_COLUMN);
        columns
    }

    /// Writes one row per iteration. A quantifier that was not reported in
    /// an iteration is left empty rather than written as zero.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), Error> {
        let keys = self.quantifier_keys();
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.columns())?;
        for record in &self.records {
            let mut row: Vec<String> = keys
                .iter()
                .map(|key| record.count(key).map(|count| count.to_string()).unwrap_or_default())
                .collect();
            // `Debug` keeps the fractional part of whole seconds, e.g. `2.0`.
            row.push(format!("{:?}", record.execution_time()));
            writer.write_record(&row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Reads a table written by [`ResultTable::write_csv`]. Columns without
    /// the quantifier prefix, other than the execution time, are taken to be
    /// quantifiers as well.
    pub fn read_csv<R: io::Read>(reader: R) -> Result<Self, Error> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        let Some(time_index) = headers.iter().position(|column| column == EXECUTION_TIME_COLUMN) else {
            return Err(Error::new(
                ErrorKind::MissingColumn,
                headers.iter().join(","),
            ));
        };
        let keys: Vec<Option<String>> = headers
            .iter()
            .enumerate()
            .map(|(index, column)| {
                if index == time_index {
                    None
                } else if column.starts_with(QUANTIFIER_PREFIX) {
                    Some(column.to_string())
                } else {
                    Some(quantifier_key(column))
                }
            })
            .collect();

        let mut table = Self::new();
        for (row_index, row) in reader.records().enumerate() {
            let row = row?;
            let line_number = row_index + 2;
            let invalid = || Error::on_line(ErrorKind::ParseNumberFailed, line_number, row.iter().join(","));
            let mut counts = QuantifierCounts::new();
            let mut execution_time = None;
            for (key, value) in keys.iter().zip(row.iter()) {
                let value = value.trim();
                match key {
                    None => execution_time = Some(value.parse::<f64>().map_err(|_| invalid())?),
                    Some(_) if value.is_empty() => {}
                    Some(key) => {
                        counts.insert(key.clone(), value.parse().map_err(|_| invalid())?);
                    }
                }
            }
            let execution_time = execution_time.ok_or_else(invalid)?;
            if !(execution_time >= 0.0) {
                return Err(invalid());
            }
            table.push(RunRecord::from_seconds(counts, execution_time));
        }
        Ok(table)
    }
}
