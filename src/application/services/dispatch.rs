//! Command dispatcher
//!
//! Turns `tb <alias> [args...]` into a child process: resolve the alias via
//! the store, start the target with inherited stdio, wait, and hand back how
//! the child ended. No retry, no timeout.
//!
//! Launch policy: the resolved path is executed directly. Only when the store
//! setting `interpreter` is a non-empty string is the child started as
//! `<interpreter> <path> args...`.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::services::store::StoreService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ChildExit, DispatchState};
use crate::infrastructure::traits::{CommandRunner, FileSystem};

/// What is about to be executed for an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub alias: String,
    /// Resolved alias target
    pub target: PathBuf,
    /// Program handed to the OS (target, or the interpreter)
    pub program: PathBuf,
    /// Full argument list for `program`
    pub args: Vec<String>,
}

/// Service launching aliases as child processes.
pub struct Dispatcher {
    store: Arc<StoreService>,
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CommandRunner>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<StoreService>,
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self { store, fs, runner }
    }

    /// Run `alias` with `args` and wait for it.
    ///
    /// A non-zero child exit is a normal outcome and returned as `Ok`.
    /// Errors mean no child was started (unknown alias, missing target,
    /// spawn failure) or waiting on it failed.
    pub fn run(&self, alias: &str, args: &[String]) -> ApplicationResult<ChildExit> {
        let mut state = DispatchState::Idle;
        self.advance(&mut state, DispatchState::Resolving)?;

        let plan = match self.plan(alias, args) {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(&mut state, e)),
        };

        self.advance(&mut state, DispatchState::Spawning)?;
        if !self.fs.exists(&plan.target) {
            let e = ApplicationError::Spawn {
                alias: alias.to_string(),
                path: plan.target.clone(),
                reason: "target does not exist".into(),
            };
            return Err(self.fail(&mut state, e));
        }

        let mut child = match self.runner.spawn_interactive(&plan.program, &plan.args) {
            Ok(child) => child,
            Err(e) => {
                let e = ApplicationError::Spawn {
                    alias: alias.to_string(),
                    path: plan.program.clone(),
                    reason: e.to_string(),
                };
                return Err(self.fail(&mut state, e));
            }
        };

        self.advance(&mut state, DispatchState::Running)?;
        info!("running {} (pid {})", plan.target.display(), child.id());

        let exit = child.wait().map_err(|e| ApplicationError::OperationFailed {
            context: format!("wait for '{}'", alias),
            source: Box::new(e),
        })?;

        self.advance(&mut state, DispatchState::Exited(exit))?;
        Ok(exit)
    }

    /// Resolve `alias` and build the command line, without launching.
    pub fn plan(&self, alias: &str, args: &[String]) -> ApplicationResult<LaunchPlan> {
        let doc = self.store.load()?;
        let target = doc
            .resolve(alias)
            .map(PathBuf::from)
            .ok_or_else(|| ApplicationError::unknown_alias(alias))?;

        let (program, full_args) = match doc.interpreter() {
            Some(interpreter) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(target.to_string_lossy().into_owned());
                full.extend(args.iter().cloned());
                (PathBuf::from(interpreter), full)
            }
            None => (target.clone(), args.to_vec()),
        };

        Ok(LaunchPlan {
            alias: alias.to_string(),
            target,
            program,
            args: full_args,
        })
    }

    fn advance(&self, state: &mut DispatchState, next: DispatchState) -> ApplicationResult<()> {
        debug!("dispatch: {} -> {}", state, next);
        state.advance(next)?;
        Ok(())
    }

    /// Move to `Failed` and hand back the error that caused it.
    fn fail(&self, state: &mut DispatchState, error: ApplicationError) -> ApplicationError {
        match self.advance(state, DispatchState::Failed(error.to_string())) {
            Ok(()) => error,
            Err(transition) => transition,
        }
    }
}
