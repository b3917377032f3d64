//! Constants used across the pootle-sync workspace.

/// Directory whose immediate subdirectories are the Pootle projects.
pub const DEFAULT_PROJECTS_ROOT: &str = "/srv/pootle/po";

/// The Pootle management executable.
pub const DEFAULT_TOOL_PROGRAM: &str = "pootle";

/// Scratch directory under the projects root; never treated as a project.
pub const RESERVED_TMP_DIR: &str = ".tmp";

/// Diagnostic level passed to every `fs` subcommand.
pub const VERBOSITY: &str = "3";

/// How language variants map to files inside a project directory.
pub const FILENAME_PATTERN: &str = "<language_code>.<ext>";

/// Scheme prefix for filesystem-backed Pootle FS storage.
pub const LOCALFS_SCHEME: &str = "localfs+";
