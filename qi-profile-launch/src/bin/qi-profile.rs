// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::Parser;
use qi_profile_launch::{
    config::{Settings, Tool}, errors::Result, paths, report_error, run_timed, ProfileConfig,
    ProfileDriver, SystemRunner,
};
use std::path::PathBuf;

/// Profiles Viper and Gobra programs using Silicon and Z3's quantifier
/// instantiation profiling.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Gobra or Viper program to be profiled
    #[clap(value_parser = paths::program_path)]
    program_path: PathBuf,

    /// Path to silicon.sh [config: silicon_path]
    #[clap(long)]
    silicon_path: Option<PathBuf>,

    /// Path to the Z3 binary [config: z3_path]
    #[clap(long)]
    z3_path: Option<PathBuf>,

    /// Path to the Gobra jar, required for Gobra programs [config: gobra_path]
    #[clap(long)]
    gobra_path: Option<PathBuf>,

    /// Number of times profiling is repeated
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Granularity of quantifier reporting
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    granularity: u32,

    /// Set various Z3 random seeds to random values. Note that profiling may
    /// be non-deterministic even if this setting is not set.
    #[clap(long)]
    z3_randomize_seeds: bool,

    /// Disable the axiomatization of set operations
    #[clap(long)]
    disable_set_axiomatization: bool,
}

fn process(args: Args) -> Result<()> {
    let settings = Settings::load()?;
    let config = ProfileConfig {
        program_path: args.program_path,
        silicon_path: settings.required_tool_path(Tool::Silicon, args.silicon_path)?,
        z3_path: settings.required_tool_path(Tool::Z3, args.z3_path)?,
        gobra_path: settings.tool_path(Tool::Gobra, args.gobra_path)?,
        java_path: settings.java_path.clone(),
        gobra_jvm_args: settings.gobra_jvm_args.clone(),
        iterations: args.iterations,
        granularity: args.granularity,
        z3_randomize_seeds: args.z3_randomize_seeds,
        disable_set_axiomatization: args.disable_set_axiomatization,
        set_axiomatization_file: settings.set_axiomatization_file(),
    };
    log::debug!("Configuration: {:?}", config);

    run_timed!(
        format!("Profiling {}", config.program_path.display()),
        let csv_path = ProfileDriver::new(&config, SystemRunner).run()?;
    );
    println!("{}", csv_path.display());
    Ok(())
}

fn main() {
    qi_profile_launch::init_logging();
    let args = Args::parse();
    if let Err(error) = process(args) {
        report_error(&error);
        std::process::exit(1);
    }
}
