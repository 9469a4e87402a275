//! Configuration: TOML file loading and defaults.
//!
//! Sources, lowest priority first (later values override earlier ones):
//! 1. Global `~/.config/dirt/config.toml`
//! 2. `.dirtconfig.toml` next to the executable
//! 3. The file named by `$DIRT_CONFIG`
//! 4. Built-in defaults fill whatever is still unset

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::fs::search::DEFAULT_MAX_FILE_BYTES;

// ── Section configs ──────────────────────────────────────────────────────────

/// Which editor opens which file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Command used for any extension without its own entry.
    pub generic: Option<String>,
    /// Extension (without the dot, case-insensitive) → editor command.
    pub extensions: HashMap<String, String>,
}

impl EditorConfig {
    /// Configured command for `extension`, falling back to `generic`.
    ///
    /// `extension` may be given with or without a leading dot.
    pub fn command_for(&self, extension: &str) -> Option<&str> {
        let wanted = normalize_extension(extension);
        let specific = if wanted.is_empty() {
            None
        } else {
            self.extensions
                .iter()
                .find(|(ext, _)| normalize_extension(ext) == wanted)
                .map(|(_, cmd)| cmd.as_str())
        };
        specific
            .or(self.generic.as_deref())
            .filter(|cmd| !cmd.trim().is_empty())
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Content search settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    /// Files larger than this many bytes are never searched.
    pub max_file_bytes: Option<u64>,
    /// Preview characters shown per match.
    pub preview_width: Option<usize>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub editor: EditorConfig,
    pub search: SearchConfig,
}

/// Default preview width in the match picker.
pub const DEFAULT_PREVIEW_WIDTH: usize = 120;

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config files, lowest priority first.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("dirt").join("config.toml"));
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join(".dirtconfig.toml"));
    }

    if let Some(env_path) = std::env::var_os("DIRT_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    paths
}

/// Read and parse a TOML config file. Missing files are silently skipped;
/// unparsable ones are logged and skipped.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win and its
    /// extension entries replace same-named ones.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        let mut extensions = self.editor.extensions;
        extensions.extend(
            other
                .editor
                .extensions
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        AppConfig {
            editor: EditorConfig {
                generic: other.editor.generic.clone().or(self.editor.generic),
                extensions,
            },
            search: SearchConfig {
                max_file_bytes: other.search.max_file_bytes.or(self.search.max_file_bytes),
                preview_width: other.search.preview_width.or(self.search.preview_width),
            },
        }
    }

    /// Load and merge every config file that exists.
    pub fn load() -> AppConfig {
        Self::load_from(&candidate_paths())
    }

    fn load_from(paths: &[PathBuf]) -> AppConfig {
        paths
            .iter()
            .filter_map(|path| load_file(path))
            .fold(AppConfig::default(), |acc, cfg| acc.merge(&cfg))
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn max_file_bytes(&self) -> u64 {
        self.search.max_file_bytes.unwrap_or(DEFAULT_MAX_FILE_BYTES)
    }

    pub fn preview_width(&self) -> usize {
        self.search.preview_width.unwrap_or(DEFAULT_PREVIEW_WIDTH)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.max_file_bytes(), 2 * 1024 * 1024);
        assert_eq!(cfg.preview_width(), 120);
        assert!(cfg.editor.command_for("rs").is_none());
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[editor]
generic = "vim"

[editor.extensions]
md = "code --wait"
".RS" = "nvim"

[search]
max_file_bytes = 4096
preview_width = 60
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.max_file_bytes(), 4096);
        assert_eq!(cfg.preview_width(), 60);
        assert_eq!(cfg.editor.command_for("md"), Some("code --wait"));
        assert_eq!(cfg.editor.command_for(".rs"), Some("nvim"));
        assert_eq!(cfg.editor.command_for("RS"), Some("nvim"));
        assert_eq!(cfg.editor.command_for("txt"), Some("vim"));
        assert_eq!(cfg.editor.command_for(""), Some("vim"));
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert_eq!(cfg.max_file_bytes(), DEFAULT_MAX_FILE_BYTES);
        assert!(cfg.editor.generic.is_none());
    }

    #[test]
    fn test_blank_command_is_ignored() {
        let cfg: AppConfig = toml::from_str("[editor]\ngeneric = \"  \"\n").expect("parse");
        assert!(cfg.editor.command_for("txt").is_none());
    }

    #[test]
    fn test_merge_overrides() {
        let base: AppConfig = toml::from_str(
            r#"
[editor]
generic = "vi"
[editor.extensions]
md = "glow"
py = "idle"
[search]
preview_width = 80
"#,
        )
        .expect("parse");
        let over: AppConfig = toml::from_str(
            r#"
[editor.extensions]
md = "nvim"
[search]
max_file_bytes = 10
"#,
        )
        .expect("parse");

        let merged = base.merge(&over);
        assert_eq!(merged.editor.command_for("md"), Some("nvim")); // overridden
        assert_eq!(merged.editor.command_for("py"), Some("idle")); // from base
        assert_eq!(merged.editor.generic.as_deref(), Some("vi")); // from base
        assert_eq!(merged.max_file_bytes(), 10); // overridden
        assert_eq!(merged.preview_width(), 80); // from base
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_from_later_file_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");
        std::fs::write(&global, "[editor]\ngeneric = \"vim\"\n[search]\npreview_width = 40\n")
            .expect("write");
        std::fs::write(&local, "[editor]\ngeneric = \"nano\"\n").expect("write");

        let cfg = AppConfig::load_from(&[global, dir.path().join("missing.toml"), local]);
        assert_eq!(cfg.editor.generic.as_deref(), Some("nano"));
        assert_eq!(cfg.preview_width(), 40);
    }
}
