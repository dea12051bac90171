// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    errors::{ErrorKind, Result},
    paths,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::{env, path::PathBuf};

/// Name of the optional configuration file in the working directory.
pub const CONFIG_FILE: &str = "QiProfile.toml";
/// Environment variable naming an additional configuration file.
pub const CONFIG_FILE_VAR: &str = "QI_PROFILE_CONFIG";
/// Prefix of environment variables overriding single settings, e.g.
/// `QI_PROFILE_Z3_PATH`.
pub const ENV_PREFIX: &str = "QI_PROFILE";
/// Environment variable holding the `env_logger` filter.
pub const LOG_VAR: &str = "QI_PROFILE_LOG";

/// Axiomatization of sets without any axioms, shipped next to the binaries.
pub const NO_SET_AXIOMS_FILE: &str = "noaxioms_sets.vpr";

/// Settings that do not change from run to run, such as tool locations.
/// Command-line arguments take precedence over all of them.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Path to `silicon.sh`.
    #[serde(default)]
    pub silicon_path: Option<PathBuf>,
    /// Path to the Z3 binary used by Silicon and Gobra.
    #[serde(default)]
    pub z3_path: Option<PathBuf>,
    /// Path to the Gobra jar.
    #[serde(default)]
    pub gobra_path: Option<PathBuf>,
    /// The Java launcher used to run Gobra.
    pub java_path: PathBuf,
    /// Extra JVM arguments for Gobra; its parser needs a large stack.
    pub gobra_jvm_args: Vec<String>,
    /// Replacement set axiomatization used with `--disableSetAxiomatization`.
    #[serde(default)]
    pub set_axiomatization_file: Option<PathBuf>,
}

/// External tools whose location is configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Silicon,
    Z3,
    Gobra,
}

impl Tool {
    pub fn name(self) -> &'static str {
        match self {
            Tool::Silicon => "Silicon",
            Tool::Z3 => "Z3",
            Tool::Gobra => "Gobra",
        }
    }
}

impl Settings {
    /// Loads the settings from, in increasing priority: the defaults,
    /// `QiProfile.toml`, the file named by `QI_PROFILE_CONFIG` and
    /// `QI_PROFILE_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(env::var(CONFIG_FILE_VAR).ok(), Self::environment())
    }

    /// Environment overrides. `gobra_jvm_args` is split on spaces, e.g.
    /// `QI_PROFILE_GOBRA_JVM_ARGS="-Xss256m -ea"`.
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .ignore_empty(true)
            .try_parsing(true)
            .list_separator(" ")
            .with_list_parse_key("gobra_jvm_args")
    }

    fn load_from(config_file: Option<String>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("java_path", "java")?
            .set_default("gobra_jvm_args", vec!["-Xss128m".to_string()])?
            .add_source(File::with_name(CONFIG_FILE).required(false));
        if let Some(config_file) = config_file {
            builder = builder.add_source(File::with_name(&config_file).required(true));
        }
        let settings = builder.add_source(environment).build()?;
        Ok(settings.try_deserialize()?)
    }

    fn configured_path(&self, tool: Tool) -> Option<&PathBuf> {
        match tool {
            Tool::Silicon => self.silicon_path.as_ref(),
            Tool::Z3 => self.z3_path.as_ref(),
            Tool::Gobra => self.gobra_path.as_ref(),
        }
    }

    /// Picks the command-line value over the configured one and checks that
    /// the file exists.
    pub fn tool_path(&self, tool: Tool, command_line: Option<PathBuf>) -> Result<Option<PathBuf>> {
        let Some(path) = command_line.or_else(|| self.configured_path(tool).cloned()) else {
            return Ok(None);
        };
        let path = paths::file_path(&path.to_string_lossy())
            .map_err(|message| ErrorKind::Configuration(format!("{}: {message}", tool.name())))?;
        Ok(Some(path))
    }

    pub fn required_tool_path(&self, tool: Tool, command_line: Option<PathBuf>) -> Result<PathBuf> {
        self.tool_path(tool, command_line)?.ok_or_else(|| {
            ErrorKind::Configuration(format!("path to {} is required", tool.name())).into()
        })
    }

    /// The configured set axiomatization, or the one next to the current
    /// executable.
    pub fn set_axiomatization_file(&self) -> PathBuf {
        self.set_axiomatization_file.clone().unwrap_or_else(|| {
            paths::get_current_executable_dir()
                .unwrap_or_default()
                .join(NO_SET_AXIOMS_FILE)
        })
    }
}
