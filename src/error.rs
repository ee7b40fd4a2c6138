use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuterError {
    /// The configuration file exists but could not be read or decoded.
    #[error("invalid configuration at {path}: {reason}")]
    Configuration { path: Utf8PathBuf, reason: String },

    #[error("no valid configuration found. Run `muter init` to create muter.conf.json")]
    ConfigurationMissing,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    /// The parser produced no tree, or a tree with syntax errors.
    #[error("failed to parse {path}")]
    Parse { path: Utf8PathBuf },

    #[error("unsupported file type: {path}")]
    UnsupportedLanguage { path: Utf8PathBuf },

    #[error("failed to prepare working copy of {path}: {reason}")]
    WorkingCopy { path: Utf8PathBuf, reason: String },

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),
}

pub type Result<T> = std::result::Result<T, MuterError>;
