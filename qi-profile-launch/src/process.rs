// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::errors::{ErrorKind, Result};
use log::{debug, error};
use std::{
    ffi::{OsStr, OsString},
    fmt, io,
    process::Command,
    time::{Duration, Instant},
};

/// An invocation of an external tool. Environment variables are set on the
/// child only; the environment of the current process is never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
}

impl ToolCommand {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: vec![],
            envs: vec![],
        }
    }

    #[must_use]
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    #[must_use]
    pub fn env<K: AsRef<OsStr>, V: AsRef<OsStr>>(mut self, key: K, value: V) -> Self {
        self.envs
            .push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_envs(&self) -> &[(OsString, OsString)] {
        &self.envs
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.envs.iter().map(|(key, value)| (key, value)));
        cmd
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg:?}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` if the tool was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external tools to completion.
pub trait ToolRunner {
    fn run(&mut self, command: &ToolCommand) -> io::Result<ToolOutput>;
}

/// Runs tools as child processes of the current process.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&mut self, command: &ToolCommand) -> io::Result<ToolOutput> {
        let output = command.to_command().output()?;
        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: decode(command, "stdout", output.stdout)?,
            stderr: decode(command, "stderr", output.stderr)?,
        })
    }
}

/// Output that is not valid UTF-8 is an error, never replaced lossily.
fn decode(command: &ToolCommand, stream: &str, bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{stream} of {command} is not valid UTF-8: {error}"),
        )
    })
}

impl<R: ToolRunner + ?Sized> ToolRunner for &mut R {
    fn run(&mut self, command: &ToolCommand) -> io::Result<ToolOutput> {
        (**self).run(command)
    }
}

/// Runs `command` and fails if it does not exit successfully, reporting
/// everything the tool printed.
pub fn run_checked<R: ToolRunner + ?Sized>(runner: &mut R, command: &ToolCommand) -> Result<ToolOutput> {
    run_timed_checked(runner, command).map(|(output, _)| output)
}

/// Like [`run_checked`], also returning the wall-clock time spent in the tool.
pub fn run_timed_checked<R: ToolRunner + ?Sized>(
    runner: &mut R,
    command: &ToolCommand,
) -> Result<(ToolOutput, Duration)> {
    debug!("Running {}", command);
    let start = Instant::now();
    let output = runner.run(command)?;
    let execution_time = start.elapsed();
    if !output.success() {
        error!(
            "Command {} failed with return code {:?}.",
            command, output.exit_code
        );
        error!("stdout: {}", output.stdout);
        error!("stderr: {}", output.stderr);
        return Err(ErrorKind::ToolFailed(command.to_string(), output.exit_code).into());
    }
    debug!(
        "Command finished in {}.{:03} seconds.",
        execution_time.as_secs(),
        execution_time.subsec_millis()
    );
    Ok((output, execution_time))
}
