//! Tests for the Dispatcher: alias resolution and child process lifecycle

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;

use tbird::application::services::{Dispatcher, StoreService};
use tbird::application::ApplicationError;
use tbird::domain::{ChildExit, DomainError, StoreDocument};
use tbird::infrastructure::traits::{
    CommandRunner, RealCommandRunner, RealFileSystem, RunningChild,
};
use tbird::util::testing;

/// Records every spawn and ends each child with a fixed exit.
struct RecordingRunner {
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
    exit: ChildExit,
}

impl RecordingRunner {
    fn new(exit: ChildExit) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit,
        }
    }

    fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

struct FinishedChild(ChildExit);

impl RunningChild for FinishedChild {
    fn id(&self) -> u32 {
        4242
    }

    fn wait(&mut self) -> io::Result<ChildExit> {
        Ok(self.0)
    }
}

impl CommandRunner for RecordingRunner {
    fn spawn_interactive(
        &self,
        program: &Path,
        args: &[String],
    ) -> io::Result<Box<dyn RunningChild>> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));
        Ok(Box::new(FinishedChild(self.exit)))
    }
}

struct FailingRunner;

impl CommandRunner for FailingRunner {
    fn spawn_interactive(&self, _: &Path, _: &[String]) -> io::Result<Box<dyn RunningChild>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "not executable"))
    }
}

fn setup(aliases: &[(&str, &str)]) -> (TempDir, Arc<StoreService>) {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let store = Arc::new(StoreService::new(
        Arc::new(RealFileSystem),
        temp.path().join("store.json"),
    ));
    let mut doc = StoreDocument::default();
    for (name, rel) in aliases {
        let target = temp.path().join(rel);
        fs::write(&target, "#!/bin/sh\nexit 0\n").unwrap();
        doc.insert(*name, target.to_string_lossy());
    }
    store.replace_save(&doc).unwrap();
    (temp, store)
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn given_alias_when_run_then_spawns_target_with_args_verbatim() {
    let (temp, store) = setup(&[("build", "build.sh")]);
    let runner = Arc::new(RecordingRunner::new(ChildExit::Code(0)));
    let dispatcher = Dispatcher::new(store, Arc::new(RealFileSystem), runner.clone());

    let exit = dispatcher
        .run("build", &args(&["--fast", "-o", "out dir"]))
        .unwrap();

    assert_eq!(exit, ChildExit::Code(0));
    assert_eq!(
        runner.calls(),
        vec![(temp.path().join("build.sh"), args(&["--fast", "-o", "out dir"]))]
    );
}

#[test]
fn given_child_exits_non_zero_when_run_then_code_is_returned_not_error() {
    let (_temp, store) = setup(&[("build", "build.sh")]);
    let runner = Arc::new(RecordingRunner::new(ChildExit::Code(3)));
    let dispatcher = Dispatcher::new(store, Arc::new(RealFileSystem), runner);

    let exit = dispatcher.run("build", &[]).unwrap();

    assert_eq!(exit.exit_code(), 3);
}

#[test]
fn given_unknown_alias_when_run_then_error_and_nothing_spawned() {
    let (_temp, store) = setup(&[("build", "build.sh")]);
    let runner = Arc::new(RecordingRunner::new(ChildExit::Code(0)));
    let dispatcher = Dispatcher::new(store, Arc::new(RealFileSystem), runner.clone());

    let result = dispatcher.run("ghost", &[]);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UnknownAlias(ref n))) if n == "ghost"
    ));
    assert!(runner.calls().is_empty());
}

#[test]
fn given_missing_target_when_run_then_spawn_error_and_nothing_spawned() {
    let (temp, store) = setup(&[("build", "build.sh")]);
    fs::remove_file(temp.path().join("build.sh")).unwrap();
    let runner = Arc::new(RecordingRunner::new(ChildExit::Code(0)));
    let dispatcher = Dispatcher::new(store, Arc::new(RealFileSystem), runner.clone());

    let result = dispatcher.run("build", &[]);

    assert!(matches!(result, Err(ApplicationError::Spawn { .. })));
    assert!(runner.calls().is_empty());
}

#[test]
fn given_spawn_failure_when_run_then_spawn_error() {
    let (_temp, store) = setup(&[("build", "build.sh")]);
    let dispatcher = Dispatcher::new(store, Arc::new(RealFileSystem), Arc::new(FailingRunner));

    let err = dispatcher.run("build", &[]).unwrap_err();

    match err {
        ApplicationError::Spawn { alias, reason, .. } => {
            assert_eq!(alias, "build");
            assert!(reason.contains("not executable"));
        }
        other => panic!("expected spawn error, got {:?}", other),
    }
}

#[test]
fn given_interpreter_setting_when_planning_then_prefixes_target() {
    let (temp, store) = setup(&[("build", "build.js")]);
    store.set_setting("interpreter", Some(json!("node"))).unwrap();
    let dispatcher = Dispatcher::new(
        store,
        Arc::new(RealFileSystem),
        Arc::new(RecordingRunner::new(ChildExit::Code(0))),
    );

    let plan = dispatcher.plan("build", &args(&["x"])).unwrap();

    let target = temp.path().join("build.js");
    assert_eq!(plan.program, PathBuf::from("node"));
    assert_eq!(plan.args, vec![target.to_string_lossy().into_owned(), "x".into()]);
    assert_eq!(plan.target, target);
}

#[test]
fn given_blank_interpreter_when_planning_then_runs_target_directly() {
    let (temp, store) = setup(&[("build", "build.sh")]);
    let mut doc = store.load().unwrap();
    doc.settings
        .as_mut()
        .unwrap()
        .insert("interpreter".into(), json!("  "));
    store.replace_save(&doc).unwrap();
    let dispatcher = Dispatcher::new(
        store,
        Arc::new(RealFileSystem),
        Arc::new(RecordingRunner::new(ChildExit::Code(0))),
    );

    let plan = dispatcher.plan("build", &[]).unwrap();

    assert_eq!(plan.program, temp.path().join("build.sh"));
    assert!(plan.args.is_empty());
}

#[cfg(unix)]
#[test]
fn given_real_script_when_run_then_propagates_exit_code() {
    use std::os::unix::fs::PermissionsExt;

    let (temp, store) = setup(&[("fail", "fail.sh")]);
    let script = temp.path().join("fail.sh");
    fs::write(&script, "#!/bin/sh\nexit 7\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    let dispatcher = Dispatcher::new(store, Arc::new(RealFileSystem), Arc::new(RealCommandRunner));

    let exit = dispatcher.run("fail", &[]).unwrap();

    assert_eq!(exit, ChildExit::Code(7));
}

#[cfg(unix)]
#[test]
fn given_script_killed_by_signal_when_run_then_maps_to_shell_convention() {
    use std::os::unix::fs::PermissionsExt;

    let (temp, store) = setup(&[("die", "die.sh")]);
    let script = temp.path().join("die.sh");
    fs::write(&script, "#!/bin/sh\nkill -TERM $$\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    let dispatcher = Dispatcher::new(store, Arc::new(RealFileSystem), Arc::new(RealCommandRunner));

    let exit = dispatcher.run("die", &[]).unwrap();

    assert_eq!(exit, ChildExit::Signal(15));
    assert_eq!(exit.exit_code(), 143);
}
