use std::collections::HashMap;

use crate::model::Artifact;

pub const DEFAULT_EXTENSION: &str = ".txt";

/// Artifact `language` → file extension. Keys are lowercase.
pub const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("javascript", ".js"),
    ("typescript", ".ts"),
    ("jsx", ".jsx"),
    ("tsx", ".tsx"),
    ("python", ".py"),
    ("java", ".java"),
    ("c", ".c"),
    ("cpp", ".cpp"),
    ("c++", ".cpp"),
    ("csharp", ".cs"),
    ("go", ".go"),
    ("rust", ".rs"),
    ("ruby", ".rb"),
    ("php", ".php"),
    ("swift", ".swift"),
    ("kotlin", ".kt"),
    ("html", ".html"),
    ("css", ".css"),
    ("json", ".json"),
    ("yaml", ".yaml"),
    ("xml", ".xml"),
    ("sql", ".sql"),
    ("bash", ".sh"),
    ("shell", ".sh"),
    ("sh", ".sh"),
    ("powershell", ".ps1"),
    ("markdown", ".md"),
    ("r", ".r"),
];

/// Artifact MIME `type` → file extension, used when the language gives no answer.
pub const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("text/html", ".html"),
    ("text/markdown", ".md"),
    ("application/json", ".json"),
    ("image/svg+xml", ".svg"),
    ("application/vnd.ant.react", ".jsx"),
    ("application/vnd.ant.mermaid", ".mmd"),
];

/// Lookup tables used to pick an extension for an extracted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    by_language: HashMap<String, String>,
    by_mime: HashMap<String, String>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self {
            by_language: to_map(LANGUAGE_EXTENSIONS),
            by_mime: to_map(MIME_EXTENSIONS),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

impl ExtensionTable {
    /// Add or replace entries. Language keys are matched case-insensitively;
    /// extensions are stored with a leading dot whether or not one was given.
    pub fn with_overrides(
        mut self,
        languages: impl IntoIterator<Item = (String, String)>,
        mimes: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        for (lang, ext) in languages {
            self.by_language
                .insert(lang.to_lowercase(), normalize_extension(&ext));
        }
        for (mime, ext) in mimes {
            self.by_mime.insert(mime, normalize_extension(&ext));
        }
        self
    }

    /// Language first, then MIME type, then [`DEFAULT_EXTENSION`].
    pub fn extension_for(&self, artifact: &Artifact) -> &str {
        let by_language = (!artifact.language.is_empty())
            .then(|| self.by_language.get(&artifact.language.to_lowercase()))
            .flatten();

        by_language
            .or_else(|| self.by_mime.get(&artifact.mime_type))
            .map(String::as_str)
            .unwrap_or(DEFAULT_EXTENSION)
    }
}
