use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{FILENAME_PATTERN, LOCALFS_SCHEME, VERBOSITY};

/// A position in the per-project pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Init,
    Fetch,
    Resolve,
    Sync,
}

impl Stage {
    /// The stages run by the synchronizer, in order.
    pub const SYNC_SEQUENCE: [Stage; 3] = [Stage::Fetch, Stage::Resolve, Stage::Sync];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Fetch => "fetch",
            Self::Resolve => "resolve",
            Self::Sync => "sync",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project name that is safe to hand to the external tool as a single argument.
///
/// Only ASCII alphanumerics, `-` and `_` are accepted. The text is kept exactly as
/// given; nothing is trimmed or case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectIdError {
    #[error("project identifier is empty")]
    Empty,
    #[error("project identifier '{id}' contains unsupported character {ch:?}")]
    InvalidChar { id: String, ch: char },
}

impl ProjectId {
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ProjectIdError::Empty);
        }
        if let Some(ch) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ProjectIdError::InvalidChar { id: value, ch });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectId {
    type Err = ProjectIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One fully-formed call to the external tool, as a discrete argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub stage: Stage,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// `init_fs_project <id> localfs+<root>/<id> <language_code>.<ext>`
    pub fn init(program: &str, storage_root: &Path, id: &ProjectId) -> Self {
        let location = format!(
            "{}{}",
            LOCALFS_SCHEME,
            storage_root.join(id.as_str()).display()
        );
        Self {
            stage: Stage::Init,
            program: program.to_string(),
            args: vec![
                "init_fs_project".to_string(),
                id.as_str().to_string(),
                location,
                FILENAME_PATTERN.to_string(),
            ],
        }
    }

    /// `fs fetch <id> --verbosity 3`
    pub fn fetch(program: &str, id: &ProjectId) -> Self {
        Self::fs(program, Stage::Fetch, &["fetch", id.as_str()])
    }

    /// `fs resolve --overwrite <id> --verbosity 3`
    pub fn resolve(program: &str, id: &ProjectId) -> Self {
        Self::fs(program, Stage::Resolve, &["resolve", "--overwrite", id.as_str()])
    }

    /// `fs sync <id> --verbosity 3`
    pub fn sync(program: &str, id: &ProjectId) -> Self {
        Self::fs(program, Stage::Sync, &["sync", id.as_str()])
    }

    fn fs(program: &str, stage: Stage, middle: &[&str]) -> Self {
        let mut args = Vec::with_capacity(middle.len() + 3);
        args.push("fs".to_string());
        args.extend(middle.iter().map(|s| (*s).to_string()));
        args.push("--verbosity".to_string());
        args.push(VERBOSITY.to_string());
        Self {
            stage,
            program: program.to_string(),
            args,
        }
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn id(value: &str) -> ProjectId {
        ProjectId::new(value).expect("valid id")
    }

    #[test]
    fn accepts_safe_identifiers_verbatim() {
        for value in ["en", "sutta-central", "Site_UI", "a1"] {
            assert_eq!(id(value).as_str(), value);
        }
    }

    #[test]
    fn rejects_empty_identifier() {
        assert_eq!(ProjectId::new(""), Err(ProjectIdError::Empty));
    }

    #[test]
    fn rejects_shell_metacharacters() {
        for value in ["a;rm -rf /", "a b", "$(id)", "../etc", "name.po", " en"] {
            let err = ProjectId::from_str(value).expect_err("must fail");
            assert!(matches!(err, ProjectIdError::InvalidChar { .. }), "{value}");
        }
    }

    #[test]
    fn init_matches_external_contract() {
        let inv = Invocation::init("pootle", &PathBuf::from("/srv/pootle/po"), &id("alpha"));
        assert_eq!(inv.stage, Stage::Init);
        assert_eq!(inv.program, "pootle");
        assert_eq!(
            inv.args,
            vec![
                "init_fs_project",
                "alpha",
                "localfs+/srv/pootle/po/alpha",
                "<language_code>.<ext>",
            ]
        );
    }

    #[test]
    fn fs_stages_match_external_contract() {
        let project = id("alpha");
        assert_eq!(
            Invocation::fetch("pootle", &project).to_string(),
            "pootle fs fetch alpha --verbosity 3"
        );
        assert_eq!(
            Invocation::resolve("pootle", &project).to_string(),
            "pootle fs resolve --overwrite alpha --verbosity 3"
        );
        assert_eq!(
            Invocation::sync("pootle", &project).to_string(),
            "pootle fs sync alpha --verbosity 3"
        );
    }

    #[test]
    fn sync_sequence_is_ordered() {
        assert!(Stage::SYNC_SEQUENCE.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Stage::Resolve.to_string(), "resolve");
    }
}
