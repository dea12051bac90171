// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Extraction of version strings from the banners the external tools print.
//!
//! None of the tools offers a machine-readable version, so each
//! implementation indexes into the banner layout of the pinned tool release.
//! A banner with any other layout is rejected.

use crate::error::{Error, ErrorKind};

pub trait VersionBanner {
    /// Name of the tool, for diagnostics.
    fn tool(&self) -> &'static str;

    fn extract_version(&self, banner: &str) -> Result<String, Error>;
}

fn unexpected(banner: &str) -> Error {
    Error::new(ErrorKind::UnexpectedBanner, banner)
}

/// `Silicon 1.1-SNAPSHOT (7fea2aa7+)` → `7fea2aa7`
///
/// Silicon has no version flag; the banner is the first line it prints when
/// started without arguments.
pub struct SiliconBanner;

impl VersionBanner for SiliconBanner {
    fn tool(&self) -> &'static str {
        "Silicon"
    }

    fn extract_version(&self, banner: &str) -> Result<String, Error> {
        let token = banner
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().last())
            .ok_or_else(|| unexpected(banner))?;
        // Strip the parenthesis in front and the `+)` behind the commit hash.
        let chars: Vec<char> = token.chars().collect();
        if chars.len() < 4 {
            return Err(unexpected(banner));
        }
        Ok(chars[1..chars.len() - 2].iter().collect())
    }
}

/// `Z3 version 4.8.7 - 64 bit` → `4.8.7`
pub struct Z3Banner;

impl VersionBanner for Z3Banner {
    fn tool(&self) -> &'static str {
        "Z3"
    }

    fn extract_version(&self, banner: &str) -> Result<String, Error> {
        banner
            .split_whitespace()
            .nth(2)
            .map(str::to_string)
            .ok_or_else(|| unexpected(banner))
    }
}

/// ```text
///
///  Gobra (c) Copyright ETH Zurich 2012 - 2022
///    version 1.1-SNAPSHOT (529d2a49@(detached))
/// ```
/// → `529d2a49`
pub struct GobraBanner;

impl VersionBanner for GobraBanner {
    fn tool(&self) -> &'static str {
        "Gobra"
    }

    fn extract_version(&self, banner: &str) -> Result<String, Error> {
        let token = banner
            .lines()
            .nth(2)
            .and_then(|line| line.split_whitespace().last())
            .ok_or_else(|| unexpected(banner))?;
        let (commit, _branch) = token.split_once('@').unwrap_or((token, ""));
        let mut chars = commit.chars();
        match chars.next() {
            Some(_) if !chars.as_str().is_empty() => Ok(chars.as_str().to_string()),
            _ => Err(unexpected(banner)),
        }
    }
}
