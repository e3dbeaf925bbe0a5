use hanyu_translator::{
    AudioClip, PronounceMode, Pronouncer, TranslateError, Translator,
};
use hanyu_types::{ErrorKind, Request, Response, TranslationResult};
use kanal::AsyncSender;
use serde_json::Value;

use crate::background::Envelope;

/// Overlay-side handle: every call becomes one request to the background
/// service and waits for its one response
#[derive(Clone)]
pub struct BackgroundBridge {
    requests: AsyncSender<Envelope>,
}

impl BackgroundBridge {
    pub fn new(requests: AsyncSender<Envelope>) -> Self {
        Self { requests }
    }

    pub async fn send(&self, request: Request) -> Result<Response, TranslateError> {
        let (envelope, reply) = Envelope::new(request);

        self.requests
            .send(envelope)
            .await
            .map_err(|_| unavailable())?;
        reply.await.map_err(|_| unavailable())
    }

    /// Current enabled flag; `true` when the service cannot be reached
    pub async fn plugin_state(&self) -> bool {
        match self.send(Request::GetPluginState).await {
            Ok(response) => response.enabled.unwrap_or(true),
            Err(e) => {
                tracing::warn!("Could not read plugin state: {}", e);
                true
            }
        }
    }

    async fn data(&self, request: Request) -> Result<Value, TranslateError> {
        let response = self.send(request).await?;
        into_data(response)
    }
}

#[async_trait::async_trait]
impl Translator for BackgroundBridge {
    async fn translate(&self, text: &str) -> Result<TranslationResult, TranslateError> {
        let data = self
            .data(Request::Translate {
                text: text.to_string(),
            })
            .await?;

        serde_json::from_value(data)
            .map_err(|e| TranslateError::Schema(format!("Malformed translation: {e}")))
    }
}

#[async_trait::async_trait]
impl Pronouncer for BackgroundBridge {
    async fn pronounce(&self, text: &str, mode: PronounceMode) -> Result<AudioClip, TranslateError> {
        let text = text.to_string();
        let request = match mode {
            PronounceMode::Full => Request::Pronounce { text },
            PronounceMode::Partial => Request::PronouncePartial { text },
        };

        match self.data(request).await? {
            Value::String(base64) => Ok(AudioClip::new(base64)),
            _ => Err(TranslateError::Schema("Malformed audio payload".to_string())),
        }
    }
}

/// Unwrap `{success, data}`; a failure keeps its error text and class
fn into_data(response: Response) -> Result<Value, TranslateError> {
    if response.is_success() {
        return response
            .data
            .ok_or_else(|| TranslateError::EmptyResponse("Empty response".to_string()));
    }

    Err(TranslateError::Relayed {
        kind: response.kind.unwrap_or(ErrorKind::Protocol),
        message: response
            .error
            .unwrap_or_else(|| "Unknown error".to_string()),
    })
}

fn unavailable() -> TranslateError {
    TranslateError::Relayed {
        kind: ErrorKind::Transport,
        message: "Background service unavailable".to_string(),
    }
}
