//! Configuration values consulted during include resolution.
//!
//! Values are read through [`ConfigSource`] on every access; nothing is cached
//! between resolutions, so edits to the settings file apply to the next lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

/// Game to resolve includes for.
pub const GAME_KEY: &str = "launchOption.currentConfig.Game";
/// Target platform, matched against shader config names.
pub const PLATFORM_KEY: &str = "launchOption.currentConfig.Platform";
/// Shader build command, e.g. `./compile_shaders_NVIDIA.bat`.
pub const BUILD_COMMAND_KEY: &str = "launchOption.currentConfig.Driver.BuildCommand";

/// Read-only key-value lookup for dotted configuration keys.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Look up a raw value. `None` means the key is not set.
    async fn get(&self, key: &str) -> Option<String>;
}

/// Normalize a raw configuration value: an empty string counts as unset.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Settings stored in a TOML file, re-read on every lookup.
///
/// A dotted key matches either a literal top-level key
/// (`"launchOption.currentConfig.Game" = "..."`) or the nested tables it names
/// (`[launchOption.currentConfig]` with `Game = "..."`).
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigSource for SettingsFile {
    async fn get(&self, key: &str) -> Option<String> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read settings");
                return None;
            }
        };

        let table: toml::Table = match toml::from_str(&content) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot parse settings");
                return None;
            }
        };

        lookup_dotted(&table, key)
    }
}

fn lookup_dotted(table: &toml::Table, key: &str) -> Option<String> {
    if let Some(value) = table.get(key) {
        return scalar_to_string(value);
    }

    let mut segments = key.split('.');
    let mut current = table.get(segments.next()?)?;
    for segment in segments {
        current = current.as_table()?.get(segment)?;
    }
    scalar_to_string(current)
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Fixed in-memory values.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    values: HashMap<String, String>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Parse `KEY=VALUE` assignments as given on the command line.
    pub fn from_assignments(assignments: &[String]) -> anyhow::Result<Self> {
        let mut config = Self::new();
        for assignment in assignments {
            let (key, value) = assignment
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected KEY=VALUE, got `{}`", assignment))?;
            config.set(key.trim(), value);
        }
        Ok(config)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl ConfigSource for StaticConfig {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Consults each layer in order and returns the first value found.
#[derive(Clone, Default)]
pub struct LayeredConfig {
    layers: Vec<Arc<dyn ConfigSource>>,
}

impl LayeredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.layers.push(source);
        self
    }
}

#[async_trait]
impl ConfigSource for LayeredConfig {
    async fn get(&self, key: &str) -> Option<String> {
        for layer in &self.layers {
            if let Some(value) = layer.get(key).await {
                return Some(value);
            }
        }
        None
    }
}

/// Behaviour switches for the link resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Log the game and shader config chosen for each resolution.
    pub log_selection: bool,
}

/// Default include folder table locations, searched in order.
const TABLE_FILENAMES: &[&str] = &[".shaderlink/include_folders.toml", "shaderlink.toml"];

/// Default settings file location.
pub const SETTINGS_FILENAME: &str = ".shaderlink/settings.toml";

/// Find the include folder table for a workspace.
///
/// If `table_override` is provided, use that path directly.
/// Otherwise, search the default locations under the workspace root.
pub fn find_table_path(workspace_root: &Path, table_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(override_path) = table_override {
        if override_path.exists() {
            return Some(override_path.to_path_buf());
        }
        return None;
    }

    TABLE_FILENAMES
        .iter()
        .map(|filename| workspace_root.join(filename))
        .find(|path| path.exists())
}

/// The settings file for a workspace; it does not have to exist.
pub fn settings_path(workspace_root: &Path, settings_override: Option<&Path>) -> PathBuf {
    match settings_override {
        Some(path) => path.to_path_buf(),
        None => workspace_root.join(SETTINGS_FILENAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_present_treats_empty_as_unset() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(Some("Win64".to_string())), Some("Win64".to_string()));
    }

    #[tokio::test]
    async fn test_settings_file_nested_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            r#"
[launchOption.currentConfig]
Game = "GameA"
Platform = "win64"

[launchOption.currentConfig.Driver]
BuildCommand = "./compile_shaders_NVIDIA.bat"
"#,
        )
        .unwrap();

        let settings = SettingsFile::new(&path);
        assert_eq!(settings.get(GAME_KEY).await.as_deref(), Some("GameA"));
        assert_eq!(settings.get(PLATFORM_KEY).await.as_deref(), Some("win64"));
        assert_eq!(
            settings.get(BUILD_COMMAND_KEY).await.as_deref(),
            Some("./compile_shaders_NVIDIA.bat")
        );
        assert_eq!(settings.get("launchOption.currentConfig").await, None);
        assert_eq!(settings.get("launchOption.other").await, None);
    }

    #[tokio::test]
    async fn test_settings_file_literal_dotted_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "\"launchOption.currentConfig.Game\" = \"GameB\"\n").unwrap();

        let settings = SettingsFile::new(&path);
        assert_eq!(settings.get(GAME_KEY).await.as_deref(), Some("GameB"));
    }

    #[tokio::test]
    async fn test_settings_file_is_reread_on_every_lookup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = SettingsFile::new(&path);

        assert_eq!(settings.get(GAME_KEY).await, None);

        fs::write(&path, "\"launchOption.currentConfig.Game\" = \"GameA\"\n").unwrap();
        assert_eq!(settings.get(GAME_KEY).await.as_deref(), Some("GameA"));

        fs::write(&path, "\"launchOption.currentConfig.Game\" = \"GameB\"\n").unwrap();
        assert_eq!(settings.get(GAME_KEY).await.as_deref(), Some("GameB"));
    }

    #[tokio::test]
    async fn test_settings_file_invalid_toml_reads_as_unset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "this is [not toml").unwrap();

        assert_eq!(SettingsFile::new(&path).get(GAME_KEY).await, None);
    }

    #[tokio::test]
    async fn test_layered_config_first_layer_wins() {
        let overrides = StaticConfig::new().with(PLATFORM_KEY, "ps5");
        let base = StaticConfig::new()
            .with(PLATFORM_KEY, "win64")
            .with(GAME_KEY, "GameA");

        let config = LayeredConfig::new()
            .layer(Arc::new(overrides))
            .layer(Arc::new(base));

        assert_eq!(config.get(PLATFORM_KEY).await.as_deref(), Some("ps5"));
        assert_eq!(config.get(GAME_KEY).await.as_deref(), Some("GameA"));
        assert_eq!(config.get(BUILD_COMMAND_KEY).await, None);
    }

    #[test]
    fn test_static_config_from_assignments() {
        let config = StaticConfig::from_assignments(&[
            "launchOption.currentConfig.Game=GameA".to_string(),
            "launchOption.currentConfig.Driver.BuildCommand=./compile_shaders_a=b.bat".to_string(),
        ])
        .unwrap();
        assert_eq!(config.values.get(GAME_KEY).map(String::as_str), Some("GameA"));
        assert_eq!(
            config.values.get(BUILD_COMMAND_KEY).map(String::as_str),
            Some("./compile_shaders_a=b.bat")
        );

        assert!(StaticConfig::from_assignments(&["no-equals-sign".to_string()]).is_err());
    }

    #[test]
    fn test_find_table_path_search_order() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_table_path(dir.path(), None), None);

        fs::write(dir.path().join("shaderlink.toml"), "").unwrap();
        assert_eq!(
            find_table_path(dir.path(), None),
            Some(dir.path().join("shaderlink.toml"))
        );

        fs::create_dir_all(dir.path().join(".shaderlink")).unwrap();
        fs::write(dir.path().join(".shaderlink/include_folders.toml"), "").unwrap();
        assert_eq!(
            find_table_path(dir.path(), None),
            Some(dir.path().join(".shaderlink/include_folders.toml"))
        );
    }

    #[test]
    fn test_find_table_path_override_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("custom.toml");
        assert_eq!(find_table_path(dir.path(), Some(&missing)), None);

        fs::write(&missing, "").unwrap();
        assert_eq!(find_table_path(dir.path(), Some(&missing)), Some(missing));
    }
}
