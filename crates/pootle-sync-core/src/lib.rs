//! Core logic for keeping Pootle FS projects in sync.
//!
//! This crate discovers project directories, builds the `pootle` commands that
//! register and synchronize each one, and drives them in sequence across a batch.

pub mod batch;
pub mod command;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod executor;
pub mod project;

pub use batch::{BatchDriver, BatchError, BatchSummary};
pub use command::{Invocation, ProjectId, ProjectIdError, Stage};
pub use config::SyncConfig;
pub use discovery::{DiscoveryError, ProjectDiscovery, Projects};
pub use executor::{CapturedOutput, CommandExecutor, ExecError, ProcessExecutor};
pub use project::{ProjectInitializer, ProjectSynchronizer, StageOutcome, StageReport};
