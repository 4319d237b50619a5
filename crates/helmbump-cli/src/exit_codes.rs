//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - updated, nothing to update, or writing suppressed
pub const SUCCESS: i32 = 0;

/// Configuration error - GitHub token, repository or actor missing
pub const CONFIG_ERROR: i32 = 1;

/// Version error - a chart version is not a semantic version
pub const VERSION_ERROR: i32 = 2;

/// Command error - helm, git or gh failed or could not be launched
pub const COMMAND_ERROR: i32 = 3;

/// Manifest error - charts.yaml does not match the expected schema
pub const MANIFEST_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// No versions - a repository returned no versions for a chart
pub const NO_VERSIONS: i32 = 6;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
