//! Optional `jtree.toml` configuration, grounded on `core-config`'s
//! shape: a local file is preferred, falling back to the platform
//! config directory; a missing or malformed file is never fatal, it
//! just yields the built-in defaults.
//!
//! Three sections, matching the tunables spec.md calls out as
//! reasonable constants rather than hard limits: `[view]` (flat-view
//! packing), `[search]` (default search scope), and `[editor]`
//! (command/search line history depth).

use std::{fs, path::PathBuf};

use serde::Deserialize;
use tracing::warn;

/// Matches `jtree_nav::FLAT_THRESHOLD`.
const DEFAULT_FLAT_THRESHOLD: usize = 20;
/// Matches `jtree_nav::FLAT_WIDTH`.
const DEFAULT_FLAT_WIDTH: usize = 10;
/// Matches `jtree_edit::History`'s built-in default capacity.
const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    #[serde(default = "ViewConfig::default_flat_width")]
    pub flat_width: usize,
    #[serde(default = "ViewConfig::default_flat_threshold")]
    pub flat_threshold: usize,
}

impl ViewConfig {
    const fn default_flat_width() -> usize {
        DEFAULT_FLAT_WIDTH
    }
    const fn default_flat_threshold() -> usize {
        DEFAULT_FLAT_THRESHOLD
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            flat_width: Self::default_flat_width(),
            flat_threshold: Self::default_flat_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    #[serde(default = "SearchConfig::default_mode")]
    pub default_mode: String,
}

impl SearchConfig {
    fn default_mode() -> String {
        "recursive".to_string()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_mode: Self::default_mode() }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_history_limit")]
    pub history_limit: usize,
}

impl EditorConfig {
    const fn default_history_limit() -> usize {
        DEFAULT_HISTORY_LIMIT
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { history_limit: Self::default_history_limit() }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Local `jtree.toml` if present, else the platform config dir's copy.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("jtree.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("jtree").join("jtree.toml");
    }
    PathBuf::from("jtree.toml")
}

/// Load `path` (or the discovered default location). A missing file or
/// one that fails to parse yields [`Config::default`] rather than an
/// error — configuration is always advisory, never load-bearing.
pub fn load_from(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "jtree_toml_parse_failed");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_from(Some(PathBuf::from("/nonexistent/path/jtree.toml")));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jtree.toml");
        fs::write(&path, "this is not valid toml {{{").unwrap();
        let cfg = load_from(Some(path));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jtree.toml");
        fs::write(&path, "[view]\nflat_width = 16\n").unwrap();
        let cfg = load_from(Some(path));
        assert_eq!(cfg.view.flat_width, 16);
        assert_eq!(cfg.view.flat_threshold, DEFAULT_FLAT_THRESHOLD);
        assert_eq!(cfg.search.default_mode, "recursive");
    }

    #[test]
    fn full_file_parses_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jtree.toml");
        fs::write(
            &path,
            "[view]\nflat_width = 8\nflat_threshold = 12\n\
             [search]\ndefault_mode = \"query\"\n\
             [editor]\nhistory_limit = 50\n",
        )
        .unwrap();
        let cfg = load_from(Some(path));
        assert_eq!(cfg.view.flat_width, 8);
        assert_eq!(cfg.view.flat_threshold, 12);
        assert_eq!(cfg.search.default_mode, "query");
        assert_eq!(cfg.editor.history_limit, 50);
    }
}
