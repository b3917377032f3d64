use std::io::Write;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::command::ProjectId;
use crate::config::SyncConfig;
use crate::discovery::{DiscoveryError, ProjectDiscovery};
use crate::executor::CommandExecutor;
use crate::project::{ProjectInitializer, ProjectSynchronizer};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("failed to write progress: {0}")]
    Output(#[from] std::io::Error),
}

/// Counts from a finished batch. Stage failures are logged, not tallied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Identifiers listed under the root, including ones skipped as unsafe.
    pub projects: usize,
    /// Commands handed to the executor.
    pub invocations: usize,
}

/// Registers and synchronizes every discovered project, one after another.
pub struct BatchDriver<'a> {
    discovery: ProjectDiscovery,
    initializer: ProjectInitializer,
    synchronizer: ProjectSynchronizer,
    executor: &'a dyn CommandExecutor,
}

impl<'a> BatchDriver<'a> {
    pub fn new(
        discovery: ProjectDiscovery,
        initializer: ProjectInitializer,
        synchronizer: ProjectSynchronizer,
        executor: &'a dyn CommandExecutor,
    ) -> Self {
        Self {
            discovery,
            initializer,
            synchronizer,
            executor,
        }
    }

    pub fn from_config(cfg: &SyncConfig, executor: &'a dyn CommandExecutor) -> Self {
        let root = &cfg.projects.root;
        Self::new(
            ProjectDiscovery::new(root),
            ProjectInitializer::new(&cfg.tool.program, root),
            ProjectSynchronizer::new(&cfg.tool.program),
            executor,
        )
    }

    /// Runs the whole batch, writing `processing: <id>` per project and `DONE` at the end.
    ///
    /// # Errors
    /// Only an unreadable projects root or a failed write to `out` stop the batch.
    /// Failing commands are logged and never surface here.
    #[instrument(skip_all, fields(root = %self.discovery.root().display()))]
    pub fn run(&self, out: &mut dyn Write) -> Result<BatchSummary, BatchError> {
        let mut summary = BatchSummary::default();

        for name in self.discovery.projects()? {
            writeln!(out, "processing: {name}")?;
            summary.projects += 1;

            let id = match ProjectId::new(name) {
                Ok(id) => id,
                Err(e) => {
                    warn!("skipping project: {}", e);
                    continue;
                }
            };

            self.initializer.run(self.executor, &id);
            summary.invocations += 1;
            summary.invocations += self.synchronizer.run(self.executor, &id).len();
        }

        writeln!(out, "DONE")?;
        info!(
            "batch finished: {} projects, {} commands",
            summary.projects, summary.invocations
        );
        Ok(summary)
    }
}
