use tokio_util::sync::CancellationToken;

use super::heuristics::{default_heuristics, Heuristic};
use super::until_cancelled;
use crate::config::{present, ConfigSource, GAME_KEY};
use crate::model::{IncludeFolderTable, Selection, TableError};

/// Chooses the (game, shader config) pair whose include folders are searched.
///
/// The game comes from configuration, or is the table's first game. The shader
/// config is picked by the first heuristic that matches, or is the game's first
/// shader config. A heuristic's configuration key is only read once every
/// earlier heuristic has failed.
#[derive(Debug, Clone)]
pub struct ShaderConfigSelector {
    heuristics: Vec<Heuristic>,
}

impl Default for ShaderConfigSelector {
    fn default() -> Self {
        ShaderConfigSelector {
            heuristics: default_heuristics(),
        }
    }
}

impl ShaderConfigSelector {
    pub fn new(heuristics: Vec<Heuristic>) -> Self {
        ShaderConfigSelector { heuristics }
    }

    /// Append a heuristic, tried after the existing ones.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristics.push(heuristic);
        self
    }

    pub fn heuristics(&self) -> &[Heuristic] {
        &self.heuristics
    }

    /// Select the pair for one resolution.
    ///
    /// Returns `Ok(None)` if `cancel` fires while configuration is being read.
    /// A configured game missing from the table is an error.
    pub async fn select(
        &self,
        table: &IncludeFolderTable,
        config: &dyn ConfigSource,
        cancel: &CancellationToken,
    ) -> Result<Option<Selection>, TableError> {
        let Some(configured_game) = until_cancelled(cancel, config.get(GAME_KEY)).await else {
            return Ok(None);
        };
        let game = match present(configured_game) {
            Some(name) => table.game(&name)?,
            None => table.first_game(),
        };
        let names = game.shader_config_names();

        for heuristic in &self.heuristics {
            let Some(value) = until_cancelled(cancel, config.get(heuristic.key)).await else {
                return Ok(None);
            };
            let Some(value) = present(value) else {
                continue;
            };
            if let Some(index) = (heuristic.pick)(&value, &names) {
                return Ok(Some(Selection {
                    game: game.name.clone(),
                    shader_config: names[index].to_string(),
                    matched_by: Some(heuristic.name),
                }));
            }
        }

        Ok(Some(Selection {
            game: game.name.clone(),
            shader_config: game.first_shader_config().name.clone(),
            matched_by: None,
        }))
    }
}
