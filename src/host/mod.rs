//! Services the resolver borrows from its host: filesystem access,
//! the workspace location, and user notifications.

use std::path::PathBuf;

pub mod probe;

pub use probe::{FileProbe, LocalFileProbe};

/// Supplies the absolute workspace folder that include targets are built on.
pub trait WorkspaceFolder: Send + Sync {
    fn workspace_folder(&self) -> String;
}

/// A workspace folder fixed at startup.
#[derive(Debug, Clone)]
pub struct WorkspaceRoot(PathBuf);

impl WorkspaceRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        WorkspaceRoot(path.into())
    }
}

impl WorkspaceFolder for WorkspaceRoot {
    fn workspace_folder(&self) -> String {
        self.0.to_string_lossy().trim_end_matches(['/', '\\']).to_string()
    }
}

/// Fire-and-forget notifications shown to the user.
pub trait WarningSink: Send + Sync {
    fn show_warning(&self, message: &str);
}

/// Prints warnings to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWarnings;

impl WarningSink for ConsoleWarnings {
    fn show_warning(&self, message: &str) {
        eprintln!("warning: {}", message);
    }
}

/// Emits warnings as `tracing` events, for hosts that collect logs instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn show_warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_drops_trailing_separator() {
        assert_eq!(WorkspaceRoot::new("/work/game/").workspace_folder(), "/work/game");
        assert_eq!(WorkspaceRoot::new("/work/game").workspace_folder(), "/work/game");
    }
}
