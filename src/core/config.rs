//! User configuration
//!
//! Settings are read from `<config_dir>/tcf/config.yaml` and may be
//! overridden by `TCF_*` environment variables. Every field is optional.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the persisted case collection
pub const STORE_FILE: &str = "cases.yaml";

/// Default external diagram renderer (mermaid-cli)
pub const DEFAULT_RENDERER: &str = "mmdc";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path of the persistence slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,

    /// Directory exports are written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Command used to rasterize flow diagrams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
}

impl Config {
    /// Load the user config file, then apply environment overrides
    ///
    /// A missing or unreadable config file yields defaults.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .filter(|p| p.exists())
            .and_then(|p| match crate::yaml::parse_yaml_file::<Config>(&p) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!("ignoring config {}: {}", p.display(), e);
                    None
                }
            })
            .unwrap_or_default();

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("TCF_STORE").filter(|v| !v.is_empty()) {
            self.store = Some(PathBuf::from(v));
        }
        if let Some(v) = var("TCF_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.output_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = var("TCF_RENDERER").filter(|v| !v.is_empty()) {
            self.renderer = Some(v);
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "tcf")
    }

    /// Location of the user config file
    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.config_dir().join("config.yaml"))
    }

    /// Effective store path: configured, else the platform data dir
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|d| d.data_dir().join(STORE_FILE))
                .unwrap_or_else(|| PathBuf::from(STORE_FILE))
        })
    }

    /// Effective export directory: configured, else the working directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Effective renderer command
    pub fn renderer(&self) -> String {
        self.renderer
            .clone()
            .unwrap_or_else(|| DEFAULT_RENDERER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.renderer(), "mmdc");
        assert_eq!(config.output_dir(), PathBuf::from("."));
        assert!(config.store_path().ends_with(STORE_FILE));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: Config =
            serde_yml::from_str("store: /from/file.yaml\nrenderer: other\n").unwrap();
        let env: HashMap<&str, &str> = [
            ("TCF_STORE", "/from/env.yaml"),
            ("TCF_OUTPUT_DIR", "out"),
            ("TCF_RENDERER", ""),
        ]
        .into_iter()
        .collect();

        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.store_path(), PathBuf::from("/from/env.yaml"));
        assert_eq!(config.output_dir(), PathBuf::from("out"));
        assert_eq!(config.renderer(), "other");
    }
}
