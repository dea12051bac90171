// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Validation of the paths handed to the command-line tools. The functions
//! return plain messages so that they can be used as `clap` value parsers.

use std::{
    env,
    path::{Path, PathBuf},
};

pub const VIPER_EXTENSION: &str = "vpr";
pub const GOBRA_EXTENSION: &str = "gobra";
pub const CSV_EXTENSION: &str = "csv";

/// Checks that `value` is a path to an existing file.
pub fn file_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("{value} is not a valid path to a file"))
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().map_or(false, |found| found == extension)
}

pub fn is_gobra_program(path: &Path) -> bool {
    has_extension(path, GOBRA_EXTENSION)
}

/// Checks that `value` is an existing Viper or Gobra program and makes it
/// absolute; Gobra resolves relative paths against its own directory.
pub fn program_path(value: &str) -> Result<PathBuf, String> {
    let path = file_path(value)?;
    if !has_extension(&path, VIPER_EXTENSION) && !has_extension(&path, GOBRA_EXTENSION) {
        return Err(format!(
            "Wrong suffix: {} is not a valid path to a program",
            path.display()
        ));
    }
    if path.is_absolute() {
        Ok(path)
    } else {
        path.canonicalize()
            .or_else(|_| env::current_dir().map(|dir| dir.join(&path)))
            .map_err(|error| format!("cannot resolve {}: {error}", path.display()))
    }
}

/// Checks that `value` is an existing CSV file.
pub fn csv_path(value: &str) -> Result<PathBuf, String> {
    let path = file_path(value)?;
    if has_extension(&path, CSV_EXTENSION) {
        Ok(path)
    } else {
        Err(format!(
            "Wrong suffix: {} is not a valid path to a CSV file",
            path.display()
        ))
    }
}

pub fn get_current_executable_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn rejects_missing_files() {
        let error = file_path("/definitely/not/here.vpr").unwrap_err();
        assert_eq!(error, "/definitely/not/here.vpr is not a valid path to a file");
    }

    #[test]
    fn checks_program_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let viper = dir.path().join("prog.vpr");
        let gobra = dir.path().join("prog.gobra");
        let other = dir.path().join("prog.txt");
        for path in [&viper, &gobra, &other] {
            fs::write(path, "").unwrap();
        }
        assert!(program_path(viper.to_str().unwrap()).is_ok());
        assert!(is_gobra_program(&program_path(gobra.to_str().unwrap()).unwrap()));
        assert!(program_path(other.to_str().unwrap())
            .unwrap_err()
            .starts_with("Wrong suffix"));
    }

    #[test]
    fn checks_csv_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("run.csv");
        let other = dir.path().join("run.vpr");
        fs::write(&table, "").unwrap();
        fs::write(&other, "").unwrap();
        assert_eq!(csv_path(table.to_str().unwrap()).unwrap(), table);
        assert!(csv_path(other.to_str().unwrap()).is_err());
    }
}
