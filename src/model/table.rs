use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when the include folder table is malformed or a lookup misses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("include folder table defines no games")]
    Empty,
    #[error("game `{0}` defines no shader configs")]
    EmptyGame(String),
    #[error("shader config `{config}` of game `{game}` has no include folders")]
    EmptyShaderConfig { game: String, config: String },
    #[error("game `{0}` is defined more than once")]
    DuplicateGame(String),
    #[error("shader config `{config}` is defined more than once for game `{game}`")]
    DuplicateShaderConfig { game: String, config: String },
    #[error("game `{0}` is not in the include folder table")]
    UnknownGame(String),
    #[error("shader config `{config}` is not defined for game `{game}`")]
    UnknownShaderConfig { game: String, config: String },
}

/// One named shader configuration and its include search folders, in search order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderConfigEntry {
    pub name: String,
    pub include_folders: Vec<String>,
}

/// A game and its shader configurations, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    pub name: String,
    #[serde(rename = "shader_config")]
    pub shader_configs: Vec<ShaderConfigEntry>,
}

/// game -> shader config -> include folders.
///
/// Both levels keep their declaration order: the first game and the first
/// shader config of a game are the defaults used when no heuristic applies.
/// The table is validated on construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeFolderTable {
    #[serde(rename = "game")]
    games: Vec<GameEntry>,
}

#[derive(Deserialize)]
struct TableFile {
    #[serde(default, rename = "game")]
    games: Vec<GameEntry>,
}

impl IncludeFolderTable {
    /// Build a table, checking that no level is empty and names are unique.
    pub fn new(games: Vec<GameEntry>) -> Result<Self, TableError> {
        if games.is_empty() {
            return Err(TableError::Empty);
        }

        let mut seen_games = HashSet::new();
        for game in &games {
            if !seen_games.insert(game.name.as_str()) {
                return Err(TableError::DuplicateGame(game.name.clone()));
            }
            if game.shader_configs.is_empty() {
                return Err(TableError::EmptyGame(game.name.clone()));
            }

            let mut seen_configs = HashSet::new();
            for config in &game.shader_configs {
                if !seen_configs.insert(config.name.as_str()) {
                    return Err(TableError::DuplicateShaderConfig {
                        game: game.name.clone(),
                        config: config.name.clone(),
                    });
                }
                if config.include_folders.is_empty() {
                    return Err(TableError::EmptyShaderConfig {
                        game: game.name.clone(),
                        config: config.name.clone(),
                    });
                }
            }
        }

        Ok(IncludeFolderTable { games })
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse a table from TOML.
    ///
    /// ```toml
    /// [[game]]
    /// name = "GameA"
    ///
    /// [[game.shader_config]]
    /// name = "Windows-NVIDIA"
    /// include_folders = ["Shaders/Common", "Shaders/DX12"]
    /// ```
    pub fn parse(toml_str: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(toml_str)?;
        Ok(Self::new(file.games)?)
    }

    pub fn games(&self) -> &[GameEntry] {
        &self.games
    }

    /// The default game: the first one declared.
    pub fn first_game(&self) -> &GameEntry {
        // new() rejects empty tables
        &self.games[0]
    }

    pub fn game(&self, name: &str) -> Result<&GameEntry, TableError> {
        self.games
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| TableError::UnknownGame(name.to_string()))
    }

    /// The ordered include search folders for a (game, shader config) pair.
    pub fn include_folders(&self, game: &str, shader_config: &str) -> Result<&[String], TableError> {
        let entry = self.game(game)?;
        entry
            .shader_configs
            .iter()
            .find(|c| c.name == shader_config)
            .map(|c| c.include_folders.as_slice())
            .ok_or_else(|| TableError::UnknownShaderConfig {
                game: game.to_string(),
                config: shader_config.to_string(),
            })
    }
}

impl GameEntry {
    /// Shader config names in declaration order.
    pub fn shader_config_names(&self) -> Vec<&str> {
        self.shader_configs.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn first_shader_config(&self) -> &ShaderConfigEntry {
        // new() rejects games without shader configs
        &self.shader_configs[0]
    }
}
