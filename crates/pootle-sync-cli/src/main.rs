use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

use pootle_sync_core::{BatchDriver, CommandExecutor, ProcessExecutor, SyncConfig};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod styles;

use styles as s;

/// The command-line interface for pootle-sync.
#[derive(Debug, Parser)]
#[command(name = "pootle-sync")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(about = "Register and synchronize every Pootle FS project under the projects root")]
#[command(
    long_about = "Lists the project directories under the projects root and, for each one,
registers it with Pootle FS and runs fetch, resolve --overwrite and sync.

A failing pootle command is logged to stderr and the batch moves on to the
next project. Re-running is the recovery path."
)]
pub(crate) struct Cli {
    /// Path to a pootle-sync TOML config file. Built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    let cfg = load_config(&cli)?;
    let stdout = std::io::stdout();
    execute(&cfg, &ProcessExecutor::new(), &mut stdout.lock())
}

fn load_config(cli: &Cli) -> Result<SyncConfig> {
    match &cli.config {
        Some(path) => SyncConfig::load_from_file(path)
            .with_context(|| format!("unable to load config '{}'", path)),
        None => Ok(SyncConfig::default()),
    }
}

/// Runs one full batch against the configured projects root.
fn execute(cfg: &SyncConfig, executor: &dyn CommandExecutor, out: &mut dyn Write) -> Result<()> {
    BatchDriver::from_config(cfg, executor)
        .run(out)
        .with_context(|| {
            format!(
                "batch aborted for projects root '{}'",
                cfg.projects.root.display()
            )
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pootle_sync_core::{CapturedOutput, ExecError, Invocation};
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, Default)]
    struct FailingExecutor {
        calls: RefCell<Vec<String>>,
    }

    impl CommandExecutor for FailingExecutor {
        fn execute(&self, invocation: &Invocation) -> Result<CapturedOutput, ExecError> {
            self.calls.borrow_mut().push(invocation.to_string());
            Ok(CapturedOutput {
                output: b"error\n".to_vec(),
                exit_code: Some(2),
            })
        }
    }

    fn cfg_for(root: &std::path::Path) -> SyncConfig {
        let mut cfg = SyncConfig::default();
        cfg.projects.root = root.to_path_buf();
        cfg
    }

    #[test]
    fn default_config_targets_pootle_root() {
        let cli = Cli::parse_from(["pootle-sync"]);
        let cfg = load_config(&cli).expect("defaults should load");
        assert_eq!(cfg.projects.root.to_str(), Some("/srv/pootle/po"));
        assert_eq!(cfg.tool.program, "pootle");
    }

    #[test]
    fn config_flag_loads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pootle-sync.toml");
        fs::write(&path, "[tool]\nprogram = \"/usr/local/bin/pootle\"\n").unwrap();

        let cli = Cli::parse_from(["pootle-sync", "--config", path.to_str().unwrap()]);
        let cfg = load_config(&cli).expect("config should load");
        assert_eq!(cfg.tool.program, "/usr/local/bin/pootle");
    }

    #[test]
    fn rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["pootle-sync", "alpha"]).is_err());
    }

    #[test]
    fn failing_commands_still_succeed_overall() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        let executor = FailingExecutor::default();
        let mut out = Vec::new();

        execute(&cfg_for(dir.path()), &executor, &mut out).expect("batch should not fail");

        assert_eq!(String::from_utf8(out).unwrap(), "processing: alpha\nDONE\n");
        assert_eq!(executor.calls.borrow().len(), 4);
        assert!(executor.calls.borrow()[0].starts_with("pootle init_fs_project alpha localfs+"));
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let executor = FailingExecutor::default();
        let mut out = Vec::new();

        let err = execute(&cfg_for(&dir.path().join("absent")), &executor, &mut out)
            .expect_err("must fail");
        assert!(err.to_string().contains("batch aborted"));
        assert!(out.is_empty());
    }
}
