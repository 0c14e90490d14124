//! In-memory collaborators for resolver tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::{ConfigSource, StaticConfig};
use crate::host::{FileProbe, WarningSink, WorkspaceFolder};
use crate::model::{GameEntry, IncludeFolderTable, ShaderConfigEntry};

pub fn config(name: &str, folders: &[&str]) -> ShaderConfigEntry {
    ShaderConfigEntry {
        name: name.to_string(),
        include_folders: folders.iter().map(|f| f.to_string()).collect(),
    }
}

pub fn game(name: &str, configs: Vec<ShaderConfigEntry>) -> GameEntry {
    GameEntry {
        name: name.to_string(),
        shader_configs: configs,
    }
}

pub fn table(games: Vec<GameEntry>) -> IncludeFolderTable {
    IncludeFolderTable::new(games).unwrap()
}

/// Records every key read from the wrapped config.
pub struct CountingConfig {
    inner: StaticConfig,
    reads: Mutex<Vec<String>>,
}

impl CountingConfig {
    pub fn new(inner: StaticConfig) -> Self {
        CountingConfig {
            inner,
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigSource for CountingConfig {
    async fn get(&self, key: &str) -> Option<String> {
        self.reads.lock().unwrap().push(key.to_string());
        self.inner.get(key).await
    }
}

/// Reports a fixed set of paths as existing and records every probe.
#[derive(Default)]
pub struct RecordingProbe {
    existing: HashSet<PathBuf>,
    probed: Mutex<Vec<PathBuf>>,
}

impl RecordingProbe {
    pub fn with_files(files: &[&str]) -> Self {
        RecordingProbe {
            existing: files.iter().map(PathBuf::from).collect(),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileProbe for RecordingProbe {
    async fn exists(&self, path: &Path) -> bool {
        self.probed.lock().unwrap().push(path.to_path_buf());
        self.existing.contains(path)
    }
}

/// A probe that never completes.
pub struct PendingProbe;

#[async_trait]
impl FileProbe for PendingProbe {
    async fn exists(&self, _path: &Path) -> bool {
        std::future::pending().await
    }
}

#[derive(Default)]
pub struct RecordingWarnings {
    messages: Mutex<Vec<String>>,
}

impl RecordingWarnings {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl WarningSink for RecordingWarnings {
    fn show_warning(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub struct FixedWorkspace(pub &'static str);

impl WorkspaceFolder for FixedWorkspace {
    fn workspace_folder(&self) -> String {
        self.0.to_string()
    }
}
