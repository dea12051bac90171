// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The identity of a profiling run. Runs are told apart only by the name of
//! the file their table is written to, so downstream comparison scripts rely
//! on the exact layout produced by [`RunMetadata::file_stem`].

use std::{
    fmt,
    path::{Path, PathBuf},
};

const SEPARATOR: char = '-';

/// Versions of the external tools that took part in a run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolVersions {
    pub silicon: String,
    pub z3: String,
    /// Only known if the program was translated by Gobra.
    pub gobra: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RunMetadata {
    pub program_path: PathBuf,
    pub iterations: u32,
    pub granularity: u32,
    pub versions: ToolVersions,
    pub z3_randomize_seeds: bool,
    pub disable_set_axiomatization: bool,
}

impl RunMetadata {
    /// The program's file stem with dots replaced, so that it cannot be
    /// mistaken for an extension.
    pub fn program_stem(&self) -> String {
        self.program_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().replace('.', "_"))
            .unwrap_or_default()
    }

    /// Encodes every field into a file name. The order of the components is
    /// fixed.
    pub fn file_stem(&self) -> String {
        let mut components = vec![self.program_stem()];
        if self.z3_randomize_seeds {
            components.push("rand".to_string());
        }
        if self.disable_set_axiomatization {
            components.push("no_set_axiom".to_string());
        }
        components.push(format!("iter_{}", self.iterations));
        components.push(format!("gran_{}", self.granularity));
        components.push(format!("sil_ver_{}", self.versions.silicon));
        components.push(format!("z3_ver_{}", self.versions.z3.replace('.', "_")));
        if let Some(gobra) = &self.versions.gobra {
            components.push(format!("gobra_ver_{gobra}"));
        }
        components.join(&SEPARATOR.to_string())
    }

    /// The table is stored next to the profiled program.
    pub fn csv_path(&self) -> PathBuf {
        self.program_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(format!("{}.csv", self.file_stem()))
    }
}

impl fmt::Display for RunMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}
