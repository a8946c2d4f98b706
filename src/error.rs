use std::path::PathBuf;

/// Failures surfaced by the content store.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Operator-submitted content could not be coerced into the canonical shape.
    #[error("{0}")]
    Validation(String),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize content: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ContentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when the caller sent bad input, false when the server failed.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Failures talking to the translation service. Never leaves the translate module.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("translation service answered {0}")]
    Status(u16),

    #[error("malformed translation response: {0}")]
    Decode(String),
}
