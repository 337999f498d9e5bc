use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result, eyre};
use serde::Deserialize;
use url::Url;

use crate::extensions::ExtensionTable;
use crate::utils::{DEFAULT_SOURCE_URL_BASE, TimeZoneChoice, UnknownSenderPolicy};

/// Preferences read from `config.toml`. Every field is optional; the CLI wins
/// over the file and the file wins over built-in defaults.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
    pub source_url_base: Option<String>,
    pub time_zone: Option<TimeZoneChoice>,
    pub unknown_senders: Option<UnknownSenderPolicy>,
    #[serde(default)]
    pub language_extensions: HashMap<String, String>,
    #[serde(default)]
    pub mime_extensions: HashMap<String, String>,
}

impl FileConfig {
    /// Base URL for the `source` front matter field. Must end with `/` to be joinable.
    pub fn source_url_base(&self) -> Result<Url> {
        let raw = self
            .source_url_base
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_URL_BASE);
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalized).wrap_err_with(|| format!("Invalid source_url_base: {raw}"))
    }

    pub fn extension_table(&self) -> ExtensionTable {
        ExtensionTable::default().with_overrides(
            self.language_extensions.clone(),
            self.mime_extensions.clone(),
        )
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("claude-chat-export/config.toml"))
}

pub fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        default_config_path().filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            tracing::debug!("loading config from {}", p.display());
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Artifact;
    use tempfile::TempDir;

    #[test]
    fn explicit_missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_file_config(Some(&tmp.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn reads_all_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
output_dir = "/tmp/chats"
tags = ["ai", "archive"]
author = "Anthropic Claude"
source_url_base = "https://example.com/c"
time_zone = "utc"
unknown_senders = "generic"

[language_extensions]
elixir = "ex"

[mime_extensions]
"text/csv" = ".csv"
"#,
        )
        .unwrap();

        let cfg = load_file_config(Some(&path)).unwrap();
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/chats")));
        assert_eq!(cfg.tags, Some(vec!["ai".to_string(), "archive".to_string()]));
        assert_eq!(cfg.author.as_deref(), Some("Anthropic Claude"));
        assert_eq!(cfg.time_zone, Some(TimeZoneChoice::Utc));
        assert_eq!(cfg.unknown_senders, Some(UnknownSenderPolicy::Generic));
        assert_eq!(cfg.source_url_base().unwrap().as_str(), "https://example.com/c/");

        let table = cfg.extension_table();
        let elixir = Artifact {
            language: "elixir".into(),
            ..Artifact::default()
        };
        assert_eq!(table.extension_for(&elixir), ".ex");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = FileConfig::default();
        assert_eq!(cfg.source_url_base().unwrap().as_str(), DEFAULT_SOURCE_URL_BASE);
        assert_eq!(cfg.extension_table(), ExtensionTable::default());
    }

    #[test]
    fn bad_toml_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "tags = [unterminated").unwrap();
        let err = load_file_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
