use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the edges of the engine (parsing host input, loading
/// the achievement catalog). The feedback path itself never fails.
#[derive(Error, Debug)]
pub enum KudosError {
    #[error("unknown {kind} value: {value:?}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("malformed state assignment: {0:?} (expected key=value)")]
    MalformedAssignment(String),

    #[error("achievement entry is missing an id")]
    MissingAchievementId,

    #[error("duplicate achievement id: {0}")]
    DuplicateAchievement(String),

    #[error("failed to read achievement catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse achievement catalog: {0}")]
    CatalogParse(#[from] toml::de::Error),
}

impl KudosError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        KudosError::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KudosError>;
