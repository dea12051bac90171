// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::Parser;
use qi_profile_launch::{
    errors::Result,
    paths,
    plot::{self, PlotOptions},
    report_error, run_timed,
};
use std::path::PathBuf;

/// Prepares the plots of the results of qi-profile.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// CSV files to be analyzed
    #[clap(required = true, num_args = 1.., value_parser = paths::csv_path)]
    csv_path: Vec<PathBuf>,

    /// Filter out anonymous quantifier instantiations like quant-u-17 and k!512
    #[clap(long)]
    filter_anonymous: bool,

    /// Prefix for the output files
    #[clap(long)]
    name: Option<PathBuf>,

    /// Plot only the top n quantifiers
    #[clap(long)]
    top: Option<usize>,

    /// Names of the variants in the plot (only works with multiple CSV files)
    #[clap(long, num_args = 1..)]
    variants: Option<Vec<String>>,

    /// Size of the quantifier instantiation plot
    #[clap(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [6, 4])]
    qi_size: Vec<u32>,

    /// Size of the execution time plot
    #[clap(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [6, 4])]
    execution_time_size: Vec<u32>,

    /// Start the axis for the number of quantifier instantiations at zero
    #[clap(long)]
    start_at_zero_qi: bool,

    /// Start the axis for execution time at zero
    #[clap(long)]
    start_at_zero_execution_time: bool,
}

fn size(values: &[u32]) -> [u32; 2] {
    [values[0], values[1]]
}

fn process(args: Args) -> Result<()> {
    let options = PlotOptions {
        csv_paths: args.csv_path,
        filter_anonymous: args.filter_anonymous,
        name: args.name,
        top: args.top,
        variants: args.variants,
        qi_size: size(&args.qi_size),
        execution_time_size: size(&args.execution_time_size),
        start_at_zero_qi: args.start_at_zero_qi,
        start_at_zero_execution_time: args.start_at_zero_execution_time,
    };
    run_timed!(
        "Preparing plot data",
        let outputs = plot::prepare(&options)?;
    );
    println!("{}", outputs.spec.display());
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
