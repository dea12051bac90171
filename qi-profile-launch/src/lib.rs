// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![deny(unused_must_use)]

pub mod config;
pub mod driver;
pub mod errors;
pub mod paths;
pub mod plot;
pub mod process;
mod utils;

pub use driver::{ProfileConfig, ProfileDriver};
pub use process::{SystemRunner, ToolCommand, ToolOutput, ToolRunner};

/// Sets up `env_logger`, filtered by `QI_PROFILE_LOG` (default: `info`).
pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::new().filter_or(config::LOG_VAR, "info"));
}

/// Reports an error and its causes the way the binaries exit with.
pub fn report_error(error: &errors::Error) {
    log::error!("{}", error);
    for cause in error.iter().skip(1) {
        log::error!("caused by: {}", cause);
    }
}
