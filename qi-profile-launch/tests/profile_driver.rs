// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use qi_profile_launch::{
    errors::ErrorKind, ProfileConfig, ProfileDriver, SystemRunner, ToolCommand, ToolOutput,
    ToolRunner,
};
use std::{
    collections::VecDeque,
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

const SILICON_BANNER: &str = "Silicon 1.1-SNAPSHOT (7fea2aa7+)\n  \
    Command-line interface: Required option 'file' not found.\n\
    Run with just --help for usage and options\n";
const Z3_BANNER: &str = "Z3 version 4.8.7 - 64 bit\n";
const GOBRA_BANNER: &str = "\n  Gobra (c) Copyright ETH Zurich 2012 - 2022\n    \
    version 1.1-SNAPSHOT (529d2a49@(detached))\n";

fn success(stdout: &str) -> ToolOutput {
    ToolOutput {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn profile_output(count: u64) -> String {
    format!(
        "Silicon 1.1-SNAPSHOT (7fea2aa7+)\n\
         [quantifier_instances] foo :   {count} :  1 : 2\n\
         Silicon finished verification successfully in 1.2s.\n"
    )
}

/// Answers like the real tools would and remembers every command.
#[derive(Default)]
struct FakeTools {
    silicon_runs: VecDeque<ToolOutput>,
    commands: Vec<ToolCommand>,
}

impl FakeTools {
    fn with_silicon_runs(runs: impl IntoIterator<Item = ToolOutput>) -> Self {
        Self {
            silicon_runs: runs.into_iter().collect(),
            commands: vec![],
        }
    }

    fn args_of(&self, index: usize) -> Vec<String> {
        self.commands[index]
            .get_args()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl ToolRunner for FakeTools {
    fn run(&mut self, command: &ToolCommand) -> io::Result<ToolOutput> {
        self.commands.push(command.clone());
        let program = Path::new(command.program())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let args: Vec<_> = command.get_args().iter().map(|arg| arg.to_string_lossy()).collect();
        let output = match program.as_str() {
            "z3" => success(Z3_BANNER),
            "java" if args.iter().any(|arg| arg == "--version") => success(GOBRA_BANNER),
            "java" => success(""),
            "silicon.sh" if args.is_empty() => ToolOutput {
                exit_code: Some(1),
                stdout: SILICON_BANNER.to_string(),
                stderr: String::new(),
            },
            "silicon.sh" => self
                .silicon_runs
                .pop_front()
                .expect("unexpected Silicon run"),
            other => panic!("unexpected tool {other}"),
        };
        Ok(output)
    }
}

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn config(&self, program: &str) -> ProfileConfig {
        ProfileConfig {
            program_path: self.file(program, "method main() {}"),
            silicon_path: self.file("silicon.sh", ""),
            z3_path: self.file("z3", ""),
            gobra_path: None,
            java_path: PathBuf::from("java"),
            gobra_jvm_args: vec!["-Xss128m".to_string()],
            iterations: 2,
            granularity: 1,
            z3_randomize_seeds: false,
            disable_set_axiomatization: false,
            set_axiomatization_file: self.dir.path().join("noaxioms_sets.vpr"),
        }
    }

    fn csv_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(self.dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "csv"))
            .collect();
        files.sort();
        files
    }
}

#[test]
fn profiles_viper_program() {
    let workspace = Workspace::new();
    let config = workspace.config("sets.vpr");
    let mut tools = FakeTools::with_silicon_runs([success(&profile_output(10)), success(&profile_output(25))]);

    let csv_path = ProfileDriver::new(&config, &mut tools).run().unwrap();

    assert_eq!(
        csv_path,
        workspace
            .dir
            .path()
            .join("sets-iter_2-gran_1-sil_ver_7fea2aa7-z3_ver_4_8_7.csv")
    );
    let content = fs::read_to_string(&csv_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("qi-foo,execution_time"));
    let counts: Vec<&str> = lines.map(|line| line.split(',').next().unwrap()).collect();
    assert_eq!(counts, ["10", "25"]);

    // Two profiled runs, then the version banners.
    assert_eq!(tools.commands.len(), 4);
    assert_eq!(tools.args_of(0), tools.args_of(1));
    assert!(tools.args_of(0).contains(&"smt.qi.profile=true smt.qi.profile_freq=1".to_string()));
    assert!(tools.args_of(2).is_empty());
    assert_eq!(tools.args_of(3), ["-version"]);
    assert_eq!(tools.commands[0].get_envs()[0].1, config.z3_path.as_os_str());
}

#[test]
fn identical_runs_get_identical_names() {
    let workspace = Workspace::new();
    let config = workspace.config("sets.vpr");
    let mut first = FakeTools::with_silicon_runs([success(&profile_output(1)), success(&profile_output(2))]);
    let mut second = FakeTools::with_silicon_runs([success(&profile_output(3)), success(&profile_output(4))]);

    let first_path = ProfileDriver::new(&config, &mut first).run().unwrap();
    let second_path = ProfileDriver::new(&config, &mut second).run().unwrap();

    assert_eq!(first_path, second_path);
    assert_eq!(workspace.csv_files().len(), 1);
}

#[test]
fn gobra_program_without_gobra_path_spawns_nothing() {
    let workspace = Workspace::new();
    let config = workspace.config("list.gobra");
    let mut tools = FakeTools::default();

    let error = ProfileDriver::new(&config, &mut tools).run().unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::Configuration(_)));
    assert!(tools.commands.is_empty());
}

#[test]
fn gobra_program_is_translated_once() {
    let workspace = Workspace::new();
    let mut config = workspace.config("list.gobra");
    config.gobra_path = Some(workspace.file("gobra.jar", ""));
    let mut tools = FakeTools::with_silicon_runs([success(&profile_output(3)), success(&profile_output(4))]);

    let csv_path = ProfileDriver::new(&config, &mut tools).run().unwrap();

    assert_eq!(
        csv_path.file_name().unwrap(),
        "list-iter_2-gran_1-sil_ver_7fea2aa7-z3_ver_4_8_7-gobra_ver_529d2a49.csv"
    );
    let translation = tools.args_of(0);
    assert_eq!(translation[..2], ["-jar", "-Xss128m"]);
    assert_eq!(translation[3..6], ["--printVpr", "--noVerify", "-i"]);
    let vpr_path = format!("{}.vpr", config.program_path.display());
    assert_eq!(tools.args_of(1).last(), Some(&vpr_path));
    assert_eq!(tools.args_of(2).last(), Some(&vpr_path));
    assert_eq!(tools.args_of(5).last().map(String::as_str), Some("--version"));
    assert_eq!(tools.commands.len(), 6);
    for index in [0, 5] {
        assert_eq!(
            tools.commands[index].get_envs(),
            [(OsString::from("Z3_EXE"), config.z3_path.clone().into_os_string())]
        );
    }
}

#[test]
fn viper_program_skips_gobra_even_when_configured() {
    let workspace = Workspace::new();
    let mut config = workspace.config("sets.vpr");
    config.gobra_path = Some(workspace.file("gobra.jar", ""));
    let mut tools = FakeTools::with_silicon_runs([success(&profile_output(3)), success(&profile_output(4))]);

    let csv_path = ProfileDriver::new(&config, &mut tools).run().unwrap();

    assert_eq!(
        csv_path.file_name().unwrap(),
        "sets-iter_2-gran_1-sil_ver_7fea2aa7-z3_ver_4_8_7.csv"
    );
    let java_commands = tools
        .commands
        .iter()
        .filter(|command| command.program() == config.java_path.as_os_str())
        .count();
    assert_eq!(java_commands, 0);
    assert_eq!(tools.commands.len(), 4);
}

#[test]
fn failing_iteration_writes_nothing() {
    let workspace = Workspace::new();
    let config = workspace.config("sets.vpr");
    let failure = ToolOutput {
        exit_code: Some(1),
        stdout: "Silicon found 1 error\n".to_string(),
        stderr: "timeout\n".to_string(),
    };
    let mut tools = FakeTools::with_silicon_runs([success(&profile_output(10)), failure]);

    let error = ProfileDriver::new(&config, &mut tools).run().unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::ToolFailed(_, Some(1))));
    assert!(workspace.csv_files().is_empty());
}

#[test]
fn malformed_profile_aborts_the_run() {
    let workspace = Workspace::new();
    let config = workspace.config("sets.vpr");
    let garbled = success("preamble\n[quantifier_instances] foo : lots\nepilogue\n");
    let mut tools = FakeTools::with_silicon_runs([garbled]);

    let error = ProfileDriver::new(&config, &mut tools).run().unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::Analysis(_)));
    assert!(workspace.csv_files().is_empty());
}

#[test]
fn missing_set_axiomatization_file_is_a_configuration_error() {
    let workspace = Workspace::new();
    let mut config = workspace.config("sets.vpr");
    config.disable_set_axiomatization = true;
    let mut tools = FakeTools::default();

    let error = ProfileDriver::new(&config, &mut tools).run().unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::Configuration(_)));
    assert!(tools.commands.is_empty());
}

#[cfg(unix)]
#[test]
fn profiles_with_real_processes() {
    use std::os::unix::fs::PermissionsExt;

    let workspace = Workspace::new();
    let mut config = workspace.config("sets.vpr");
    config.iterations = 1;
    config.granularity = 3;
    config.z3_randomize_seeds = true;
    let scripts = [
        (
            &config.silicon_path,
            "#!/bin/sh\n\
             if [ $# -eq 0 ]; then echo 'Silicon 1.1-SNAPSHOT (7fea2aa7+)'; exit 1; fi\n\
             echo 'Silicon 1.1-SNAPSHOT (7fea2aa7+)'\n\
             echo \"[quantifier_instances] z3_exe_set :   $( [ -n \"$Z3_EXE\" ] && echo 1 || echo 0 ) :  1 : 2\"\n\
             echo '[quantifier_instances] bar :   7 :  1 : 2'\n\
             echo 'Silicon finished verification successfully.'\n",
        ),
        (&config.z3_path, "#!/bin/sh\necho 'Z3 version 4.12.1 - 64 bit'\n"),
    ];
    for (path, script) in scripts {
        fs::write(path, script).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    let csv_path = ProfileDriver::new(&config, SystemRunner).run().unwrap();

    assert_eq!(
        csv_path.file_name().unwrap(),
        "sets-rand-iter_1-gran_3-sil_ver_7fea2aa7-z3_ver_4_12_1.csv"
    );
    let content = fs::read_to_string(&csv_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("qi-bar,qi-z3_exe_set,execution_time"));
    assert!(lines.next().unwrap().starts_with("7,1,"));
}
