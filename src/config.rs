//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treestore/treestore.toml`
//! 3. Local config: `<dir>/.treestore.toml` (usually the working directory)
//! 4. Environment variables: `TREESTORE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Rendering options for tree and table output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Append `[id]` to labels in tree output
    pub show_ids: bool,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub history_limit: Option<usize>,
    pub seed_file: Option<PathBuf>,
    pub render: RawRenderConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub show_ids: Option<bool>,
}

/// Unified configuration for treestore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Maximum undo snapshots kept per session, 0 for unbounded
    pub history_limit: usize,
    /// Seed file used when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_limit: 100,
            seed_file: None,
            render: RenderConfig::default(),
        }
    }
}

/// Get the XDG config directory for treestore.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treestore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treestore.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treestore.toml")
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

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input as is when expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(seed) = &self.seed_file {
            let expanded = expand_env_vars(seed.to_string_lossy().as_ref());
            self.seed_file = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            history_limit: overlay.history_limit.unwrap_or(self.history_limit),
            seed_file: overlay
                .seed_file
                .clone()
                .or_else(|| self.seed_file.clone()),
            render: RenderConfig {
                show_ids: overlay.render.show_ids.unwrap_or(self.render.show_ids),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treestore.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treestore/treestore.toml`
    /// 3. Local config: `<local_dir>/.treestore.toml`
    /// 4. Environment variables: `TREESTORE_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        let env = Config::builder()
            .add_source(
                Environment::with_prefix("TREESTORE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;
        current = Self::apply_overrides(current, &env);

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Apply explicit overrides (environment variables) on top of loaded settings.
    fn apply_overrides(mut settings: Self, config: &Config) -> Self {
        if let Ok(val) = config.get::<usize>("history_limit") {
            settings.history_limit = val;
        }
        if let Ok(val) = config.get_string("seed_file") {
            settings.seed_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("render.show_ids") {
            settings.render.show_ids = val;
        }
        settings
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treestore configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treestore/treestore.toml
#   Local:  ./.treestore.toml
#   Env:    TREESTORE_* environment variables (TREESTORE_RENDER__SHOW_IDS=true)

# Maximum undo snapshots kept per editing session (0 = unbounded)
# history_limit = 100

# Seed file loaded when --seed is not given (JSON or TOML)
# seed_file = "~/trees/seed.json"

[render]
# Append [id] to labels in tree output
# show_ids = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_history_limit_is_100() {
        let settings = Settings::default();
        assert_eq!(settings.history_limit, 100);
        assert!(settings.seed_file.is_none());
        assert!(!settings.render.show_ids);
    }

    #[test]
    fn given_tilde_in_seed_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            seed_file: Some(PathBuf::from("~/seed.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let seed = settings.seed_file.unwrap();
        assert!(
            seed.to_string_lossy().starts_with(&home),
            "seed_file should start with home dir: {}",
            seed.display()
        );
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let base = Settings {
            history_limit: 5,
            seed_file: Some(PathBuf::from("base.json")),
            render: RenderConfig { show_ids: true },
        };
        let overlay: RawSettings = toml::from_str("history_limit = 7").unwrap();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.history_limit, 7);
        assert_eq!(merged.seed_file, Some(PathBuf::from("base.json")));
        assert!(merged.render.show_ids);
    }

    #[test]
    fn given_overrides_when_applying_then_replace_values() {
        let config = Config::builder()
            .set_override("history_limit", 3)
            .unwrap()
            .set_override("render.show_ids", true)
            .unwrap()
            .build()
            .unwrap();

        let settings = Settings::apply_overrides(Settings::default(), &config);

        assert_eq!(settings.history_limit, 3);
        assert!(settings.render.show_ids);
        assert!(settings.seed_file.is_none());
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.history_limit.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
