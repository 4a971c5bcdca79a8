//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/animal-game/animal-game.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `ANIMAL_GAME_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, GameSettings};
use crate::domain::SeedTree;

/// Raw game settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGameSettings {
    pub item_label: Option<String>,
}

/// Raw seed for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSeedTree {
    pub question: Option<String>,
    pub yes_item: Option<String>,
    pub no_item: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub game: RawGameSettings,
    pub seed: RawSeedTree,
}

/// Unified configuration for animal-game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Prompt wording
    pub game: GameSettings,
    /// Tree the game starts from and resets to
    pub seed: SeedTree,
}

/// Get the XDG config directory for animal-game.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "animal-game").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("animal-game.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path; unexpandable input is kept as-is.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value, otherwise keep self.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            game: GameSettings {
                item_label: overlay
                    .game
                    .item_label
                    .clone()
                    .unwrap_or_else(|| self.game.item_label.clone()),
            },
            seed: SeedTree {
                question: overlay
                    .seed
                    .question
                    .clone()
                    .unwrap_or_else(|| self.seed.question.clone()),
                yes_item: overlay
                    .seed
                    .yes_item
                    .clone()
                    .unwrap_or_else(|| self.seed.yes_item.clone()),
                no_item: overlay
                    .seed
                    .no_item
                    .clone()
                    .unwrap_or_else(|| self.seed.no_item.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file (must exist if given)
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/animal-game/animal-game.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `ANIMAL_GAME_*` prefix
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            let path = expand_path(path);
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("loading config file: {}", path.display());
            current = current.merge_with(&load_raw_settings(&path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply ANIMAL_GAME_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `ANIMAL_GAME_SEED__QUESTION`.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ANIMAL_GAME")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let overlay = RawSettings {
            game: RawGameSettings {
                item_label: config.get_string("game.item_label").ok(),
            },
            seed: RawSeedTree {
                question: config.get_string("seed.question").ok(),
                yes_item: config.get_string("seed.yes_item").ok(),
                no_item: config.get_string("seed.no_item").ok(),
            },
        };
        Ok(settings.merge_with(&overlay))
    }

    /// Reject settings the game cannot start from.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.game.item_label.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "game.item_label must not be empty".into(),
            });
        }
        self.seed.validate().map_err(|e| ApplicationError::Config {
            message: format!("invalid seed: {e}"),
        })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# animal-game configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/animal-game/animal-game.toml
#   Explicit: animal-game --config <FILE>
#   Env:      ANIMAL_GAME_* environment variables, e.g. ANIMAL_GAME_SEED__QUESTION

[game]
# What the guessed things are called in prompts
# item_label = "animal"

[seed]
# Tree the game starts from and "reset memory" restores
# question = "Is your animal warm or cold blooded?"
# yes_item = "Dog"
# no_item = "Snake"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
