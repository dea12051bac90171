// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(deprecated)] // `description` is required by error-chain

error_chain::error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Config(::config::ConfigError);
        Toml(::toml::ser::Error);
        Analysis(::qi_profile_analyzer::Error);
    }

    errors {
        Configuration(message: String) {
            description("invalid configuration")
            display("invalid configuration: {}", message)
        }
        ToolFailed(command: String, exit_code: Option<i32>) {
            description("external tool failed")
            display(
                "command {} failed with exit code {}",
                command,
                exit_code.map_or_else(|| "none (terminated by a signal)".to_string(), |code| code.to_string())
            )
        }
    }
}
