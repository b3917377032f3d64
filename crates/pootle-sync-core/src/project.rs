//! Per-project pipeline: register once, then fetch, resolve and sync.
//!
//! A stage that fails is logged and the pipeline moves on. Recovery is a later
//! re-run of the batch, which relies on the external tool being idempotent.

use std::path::PathBuf;

use tracing::{debug, instrument, warn};

use crate::command::{Invocation, ProjectId, Stage};
use crate::executor::CommandExecutor;

/// Lines of captured output kept in a failure log entry.
const FAILURE_TAIL_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    Failed { exit_code: Option<i32> },
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
}

/// Registers a project with Pootle FS.
#[derive(Debug, Clone)]
pub struct ProjectInitializer {
    program: String,
    storage_root: PathBuf,
}

impl ProjectInitializer {
    pub fn new(program: impl Into<String>, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            storage_root: storage_root.into(),
        }
    }

    pub fn invocation(&self, id: &ProjectId) -> Invocation {
        Invocation::init(&self.program, &self.storage_root, id)
    }

    #[instrument(skip_all, fields(project = %id))]
    pub fn run(&self, executor: &dyn CommandExecutor, id: &ProjectId) -> StageReport {
        run_stage(executor, &self.invocation(id))
    }
}

/// Pulls upstream changes for a project and writes the merged result back.
#[derive(Debug, Clone)]
pub struct ProjectSynchronizer {
    program: String,
}

impl ProjectSynchronizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn invocations(&self, id: &ProjectId) -> [Invocation; 3] {
        [
            Invocation::fetch(&self.program, id),
            Invocation::resolve(&self.program, id),
            Invocation::sync(&self.program, id),
        ]
    }

    /// Runs every stage in order, whatever the earlier ones reported.
    #[instrument(skip_all, fields(project = %id))]
    pub fn run(&self, executor: &dyn CommandExecutor, id: &ProjectId) -> Vec<StageReport> {
        self.invocations(id)
            .iter()
            .map(|invocation| run_stage(executor, invocation))
            .collect()
    }
}

fn run_stage(executor: &dyn CommandExecutor, invocation: &Invocation) -> StageReport {
    debug!("run {}", invocation);
    let outcome = match executor.execute(invocation) {
        Ok(captured) if captured.succeeded() => StageOutcome::Completed,
        Ok(captured) => {
            warn!(
                stage = %invocation.stage,
                exit_code = ?captured.exit_code,
                "{} failed; continuing:\n{}",
                invocation,
                captured.tail(FAILURE_TAIL_LINES)
            );
            StageOutcome::Failed {
                exit_code: captured.exit_code,
            }
        }
        Err(e) => {
            warn!(stage = %invocation.stage, "{}; continuing", e);
            StageOutcome::NotStarted
        }
    };

    StageReport {
        stage: invocation.stage,
        outcome,
    }
}
