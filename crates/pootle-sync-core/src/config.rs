use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants::{DEFAULT_PROJECTS_ROOT, DEFAULT_TOOL_PROGRAM};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub projects: ProjectsConfig,
    #[serde(default)]
    pub tool: ToolConfig,
}

impl SyncConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {path}"))?;
        let cfg = toml::from_str::<Self>(&text)
            .with_context(|| format!("failed to parse TOML config: {path}"))?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsConfig {
    /// Directory listed for projects; also the parent of each project's FS storage.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROJECTS_ROOT)
}

fn default_program() -> String {
    DEFAULT_TOOL_PROGRAM.to_string()
}
