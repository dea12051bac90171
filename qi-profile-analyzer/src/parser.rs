// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parser for the quantifier instantiation reports that Silicon prints when
//! Z3 runs with `smt.qi.profile=true`. A report line looks like:
//!
//! ```text
//! [quantifier_instances] $Multiset[Int]_prog.card_non_negative :   2500 :  10 : 11
//! ```
//!
//! The second field is the number of instantiations of the quantifier so far.
//! The remaining fields are not needed.

use crate::{
    error::{Error, ErrorKind},
    record::{quantifier_key, QuantifierCounts},
};
use std::str::Split;

pub const QUANTIFIER_INSTANCES_TAG: &str = "[quantifier_instances]";

const FIELD_SEPARATOR: char = ':';

pub(crate) struct Parser<'a> {
    line: &'a str,
    line_number: usize,
    fields: Split<'a, char>,
}

impl<'a> Parser<'a> {
    pub(crate) fn from_line(line: &'a str, line_number: usize) -> Self {
        Self {
            line,
            line_number,
            fields: line.split(FIELD_SEPARATOR),
        }
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::on_line(kind, self.line_number, self.line)
    }

    fn next_field(&mut self) -> Result<&'a str, Error> {
        match self.fields.next() {
            Some(field) => Ok(field.trim()),
            None => Err(self.error(ErrorKind::MissingField)),
        }
    }

    pub(crate) fn parse_name(&mut self) -> Result<&'a str, Error> {
        let field = self.next_field()?;
        let name = field
            .strip_prefix(QUANTIFIER_INSTANCES_TAG)
            .unwrap_or(field);
        Ok(name.trim())
    }

    pub(crate) fn parse_count(&mut self) -> Result<u64, Error> {
        let field = self.next_field()?;
        field
            .parse()
            .map_err(|_| self.error(ErrorKind::ParseNumberFailed))
    }
}

/// Maps every quantifier reported in `output` to its latest instantiation
/// count.
///
/// The first and the last line of the output are Silicon's preamble and
/// epilogue and are always dropped. When a quantifier is reported more than
/// once, the last report wins.
pub fn parse_profile_output(output: &str) -> Result<QuantifierCounts, Error> {
    let lines: Vec<&str> = output.lines().collect();
    if lines.len() < 2 {
        return Err(Error::new(ErrorKind::TruncatedOutput, output));
    }
    let mut counts = QuantifierCounts::new();
    for (index, line) in lines[1..lines.len() - 1].iter().enumerate() {
        // Line numbers count the dropped preamble.
        let mut parser = Parser::from_line(line, index + 2);
        let name = parser.parse_name()?;
        let count = parser.parse_count()?;
        counts.insert(quantifier_key(name), count);
    }
    Ok(counts)
}
