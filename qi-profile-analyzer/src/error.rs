// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// The output has no room for a preamble and an epilogue.
    TruncatedOutput,
    /// A profiling line has fewer than two colon-separated fields.
    MissingField,
    /// A count or a time could not be parsed as a number.
    ParseNumberFailed,
    /// A tool's version banner does not have the expected layout.
    UnexpectedBanner,
    /// A result table lacks a column every table must have.
    MissingColumn,
    /// The underlying CSV reader or writer failed.
    Csv,
}

#[derive(Clone, Debug)]
pub struct Error {
    pub kind: ErrorKind,
    /// One-based number of the offending line, if the error is tied to one.
    pub line_number: Option<usize>,
    pub line: String,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, line: impl Into<String>) -> Self {
        Self {
            kind,
            line_number: None,
            line: line.into(),
        }
    }

    pub(crate) fn on_line(kind: ErrorKind, line_number: usize, line: impl Into<String>) -> Self {
        Self {
            kind,
            line_number: Some(line_number),
            line: line.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line_number {
            Some(line_number) => write!(f, "{:?} on line {} in {:?}", self.kind, line_number, self.line),
            None => write!(f, "{:?} in {:?}", self.kind, self.line),
        }
    }
}

impl std::error::Error for Error {}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        let line_number = error
            .position()
            .and_then(|position| usize::try_from(position.line()).ok());
        Self {
            kind: ErrorKind::Csv,
            line_number,
            line: error.to_string(),
        }
    }
}
