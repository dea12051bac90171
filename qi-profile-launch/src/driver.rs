// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Profiling of one program: optional translation by Gobra, repeated
//! profiled runs of Silicon and persistence of the collected counts.

use crate::{
    errors::{ErrorKind, Result},
    paths,
    process::{run_checked, run_timed_checked, ToolCommand, ToolRunner},
};
use log::info;
use qi_profile_analyzer::{
    banner::{GobraBanner, SiliconBanner, VersionBanner, Z3Banner},
    parse_run, ResultTable, RunMetadata, ToolVersions,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable through which Silicon and Gobra find Z3.
pub const Z3_EXE_VAR: &str = "Z3_EXE";

/// Everything a profiling run needs, already validated by the caller
/// except for the requirements that depend on the program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileConfig {
    pub program_path: PathBuf,
    pub silicon_path: PathBuf,
    pub z3_path: PathBuf,
    pub gobra_path: Option<PathBuf>,
    pub java_path: PathBuf,
    pub gobra_jvm_args: Vec<String>,
    pub iterations: u32,
    pub granularity: u32,
    pub z3_randomize_seeds: bool,
    pub disable_set_axiomatization: bool,
    pub set_axiomatization_file: PathBuf,
}

/// The program Silicon verifies.
#[derive(Clone, Debug, PartialEq, Eq)]
enum ViperProgram {
    Given(PathBuf),
    /// Generated from a Gobra program by the jar at `gobra_path`.
    Translated { vpr_path: PathBuf, gobra_path: PathBuf },
}

impl ViperProgram {
    fn path(&self) -> &Path {
        match self {
            ViperProgram::Given(path) => path,
            ViperProgram::Translated { vpr_path, .. } => vpr_path,
        }
    }
}

/// Where Gobra writes the Viper encoding of `program`.
pub fn translated_program_path(program: &Path) -> PathBuf {
    let mut file_name = program.as_os_str().to_owned();
    file_name.push(".vpr");
    PathBuf::from(file_name)
}

pub struct ProfileDriver<'c, R: ToolRunner> {
    config: &'c ProfileConfig,
    runner: R,
}

impl<'c, R: ToolRunner> ProfileDriver<'c, R> {
    pub fn new(config: &'c ProfileConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Profiles the program and writes the table next to it. Returns the
    /// path of the table. Nothing is written if any step fails.
    pub fn run(&mut self) -> Result<PathBuf> {
        let program = self.prepare_program()?;
        let table = self.profile(program.path())?;
        let metadata = self.metadata(&program)?;
        let csv_path = metadata.csv_path();
        info!("Writing {}.", csv_path.display());
        let mut buffer = Vec::new();
        table.write_csv(&mut buffer)?;
        fs::write(&csv_path, buffer)?;
        info!("Data written to {}.", csv_path.display());
        Ok(csv_path)
    }

    /// Checks everything that depends on the kind of program before any
    /// tool is started, then translates Gobra programs.
    fn prepare_program(&mut self) -> Result<ViperProgram> {
        let program_path = &self.config.program_path;
        if self.config.disable_set_axiomatization && !self.config.set_axiomatization_file.is_file() {
            return Err(ErrorKind::Configuration(format!(
                "set axiomatization file {} does not exist",
                self.config.set_axiomatization_file.display()
            ))
            .into());
        }
        if !paths::is_gobra_program(program_path) {
            return Ok(ViperProgram::Given(program_path.clone()));
        }
        let Some(gobra_path) = self.config.gobra_path.clone() else {
            log::error!("Path to Gobra jar is required for Gobra files.");
            return Err(ErrorKind::Configuration(
                "path to Gobra jar is required for Gobra files".to_string(),
            )
            .into());
        };
        info!("Generating Viper file.");
        let command = self
            .java_command(&gobra_path)
            .args(["--printVpr", "--noVerify", "-i"])
            .arg(program_path);
        run_checked(&mut self.runner, &command)?;
        info!("Viper file generated.");
        Ok(ViperProgram::Translated {
            vpr_path: translated_program_path(program_path),
            gobra_path,
        })
    }

    fn java_command(&self, gobra_path: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.java_path)
            .arg("-jar")
            .args(&self.config.gobra_jvm_args)
            .arg(gobra_path)
            .env(Z3_EXE_VAR, &self.config.z3_path)
    }

    pub fn silicon_command(&self, program: &Path) -> ToolCommand {
        // The new axiomatization has anonymous axioms, the old one names them.
        let mut command = ToolCommand::new(&self.config.silicon_path)
            .arg("--useOldAxiomatization")
            .args(["--numberOfParallelVerifiers", "1"])
            .arg("--z3Args")
            .arg(format!(
                "smt.qi.profile=true smt.qi.profile_freq={}",
                self.config.granularity
            ))
            .arg(program)
            .env(Z3_EXE_VAR, &self.config.z3_path);
        if self.config.z3_randomize_seeds {
            command = command.arg("--z3RandomizeSeeds");
        }
        if self.config.disable_set_axiomatization {
            command = command
                .arg("--setAxiomatizationFile")
                .arg(&self.config.set_axiomatization_file);
        }
        command
    }

    fn profile(&mut self, program: &Path) -> Result<ResultTable> {
        let iterations = self.config.iterations;
        let command = self.silicon_command(program);
        let mut table = ResultTable::new();
        for iteration in 1..=iterations {
            info!("Running Silicon with profiling. Iteration: {iteration} of {iterations}.");
            let (output, execution_time) = run_timed_checked(&mut self.runner, &command)?;
            info!("Silicon finished in {} seconds.", execution_time.as_secs_f64());
            info!("Processing Silicon's profiling output");
            table.push(parse_run(&output.stdout, execution_time)?);
        }
        Ok(table)
    }

    fn tool_versions(&mut self, program: &ViperProgram) -> Result<ToolVersions> {
        info!("Getting version of Silicon.");
        // Silicon has no version flag and fails without a program.
        let command = ToolCommand::new(&self.config.silicon_path).env(Z3_EXE_VAR, &self.config.z3_path);
        log::debug!("Running {}", command);
        let output = self.runner.run(&command)?;
        let silicon = SiliconBanner.extract_version(&output.stdout)?;
        info!("Silicon version: {silicon}");

        info!("Getting version of Z3.");
        let output = run_checked(&mut self.runner, &ToolCommand::new(&self.config.z3_path).arg("-version"))?;
        let z3 = Z3Banner.extract_version(&output.stdout)?;
        info!("Z3 version: {z3}");

        let gobra = match program {
            ViperProgram::Translated { gobra_path, .. } => {
                info!("Getting version of Gobra.");
                let command = ToolCommand::new(&self.config.java_path)
                    .arg("-jar")
                    .arg(gobra_path)
                    .arg("--version")
                    .env(Z3_EXE_VAR, &self.config.z3_path);
                let output = run_checked(&mut self.runner, &command)?;
                let gobra = GobraBanner.extract_version(&output.stdout)?;
                info!("Gobra version: {gobra}");
                Some(gobra)
            }
            ViperProgram::Given(_) => {
                info!("Getting Gobra version not required. Continuing.");
                None
            }
        };
        Ok(ToolVersions { silicon, z3, gobra })
    }

    fn metadata(&mut self, program: &ViperProgram) -> Result<RunMetadata> {
        info!("Generating metadata.");
        let metadata = RunMetadata {
            program_path: self.config.program_path.clone(),
            iterations: self.config.iterations,
            granularity: self.config.granularity,
            versions: self.tool_versions(program)?,
            z3_randomize_seeds: self.config.z3_randomize_seeds,
            disable_set_axiomatization: self.config.disable_set_axiomatization,
        };
        info!("Metadata generated: {metadata}");
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProfileConfig {
        ProfileConfig {
            program_path: PathBuf::from("/programs/sets.vpr"),
            silicon_path: PathBuf::from("/tools/silicon.sh"),
            z3_path: PathBuf::from("/tools/z3"),
            gobra_path: None,
            java_path: PathBuf::from("java"),
            gobra_jvm_args: vec!["-Xss128m".to_string()],
            iterations: 1,
            granularity: 5,
            z3_randomize_seeds: false,
            disable_set_axiomatization: false,
            set_axiomatization_file: PathBuf::from("/tools/noaxioms_sets.vpr"),
        }
    }

    #[test]
    fn silicon_arguments() {
        let config = config();
        let driver = ProfileDriver::new(&config, crate::process::SystemRunner);
        let command = driver.silicon_command(Path::new("/programs/sets.vpr"));
        let args: Vec<String> = command
            .get_args()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "--useOldAxiomatization",
                "--numberOfParallelVerifiers",
                "1",
                "--z3Args",
                "smt.qi.profile=true smt.qi.profile_freq=5",
                "/programs/sets.vpr",
            ]
        );
        assert_eq!(command.get_envs().len(), 1);
        assert_eq!(command.get_envs()[0].0, Z3_EXE_VAR);
    }

    #[test]
    fn optional_silicon_flags() {
        let mut config = config();
        config.z3_randomize_seeds = true;
        config.disable_set_axiomatization = true;
        let driver = ProfileDriver::new(&config, crate::process::SystemRunner);
        let command = driver.silicon_command(Path::new("/programs/sets.vpr"));
        let args: Vec<String> = command
            .get_args()
            .iter()
            .skip(6)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "--z3RandomizeSeeds",
                "--setAxiomatizationFile",
                "/tools/noaxioms_sets.vpr",
            ]
        );
    }

    #[test]
    fn gobra_output_path() {
        assert_eq!(
            translated_program_path(Path::new("/programs/list.gobra")),
            PathBuf::from("/programs/list.gobra.vpr")
        );
    }
}
