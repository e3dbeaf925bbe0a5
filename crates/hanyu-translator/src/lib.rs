use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hanyu_types::{ErrorKind, TranslationResult};

/// Structured translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate a selection into aligned units plus a full translation
    async fn translate(&self, text: &str) -> Result<TranslationResult, TranslateError>;
}

/// Speech synthesis provider interface
#[async_trait::async_trait]
pub trait Pronouncer: Send + Sync {
    async fn pronounce(&self, text: &str, mode: PronounceMode) -> Result<AudioClip, TranslateError>;
}

/// Whole selection or one translation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PronounceMode {
    Full,
    Partial,
}

/// Base64-encoded WAV as returned by the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub base64: String,
}

impl AudioClip {
    pub fn new(base64: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, TranslateError> {
        STANDARD
            .decode(self.base64.trim())
            .map_err(|e| TranslateError::Schema(format!("Invalid audio payload: {e}")))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API Key not set")]
    MissingApiKey,

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// Error text reported by the API itself
    #[error("{0}")]
    Api(String),

    /// Successful response without a usable payload
    #[error("{0}")]
    EmptyResponse(String),

    #[error("{0}")]
    Schema(String),

    /// Error received through the message protocol
    #[error("{message}")]
    Relayed { kind: ErrorKind, message: String },
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::MissingApiKey => ErrorKind::Configuration,
            TranslateError::Network(_) => ErrorKind::Transport,
            TranslateError::Api(_) | TranslateError::EmptyResponse(_) => ErrorKind::Protocol,
            TranslateError::Schema(_) => ErrorKind::Schema,
            TranslateError::Relayed { kind, .. } => *kind,
        }
    }
}
