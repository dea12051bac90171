// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![deny(unused_must_use)]

//! Analysis of Z3's quantifier instantiation profiles as reported through
//! Silicon (`smt.qi.profile=true`).

use std::time::Duration;

mod error;
mod parser;

pub mod banner;
pub mod comparison;
pub mod metadata;
pub mod record;
pub mod statistics;
pub mod table;

pub use error::{Error, ErrorKind};
pub use metadata::{RunMetadata, ToolVersions};
pub use parser::{parse_profile_output, QUANTIFIER_INSTANCES_TAG};
pub use record::{QuantifierCounts, RunRecord};
pub use table::ResultTable;

/// Turns the output of one profiled Silicon run into a record.
pub fn parse_run(output: &str, execution_time: Duration) -> Result<RunRecord, Error> {
    let counts = parse_profile_output(output)?;
    log::debug!("Parsed {} quantifiers", counts.len());
    Ok(RunRecord::new(counts, execution_time))
}
