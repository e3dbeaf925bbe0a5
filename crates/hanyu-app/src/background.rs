use std::sync::Arc;

use hanyu_core::state::AppState;
use hanyu_lang_chinese::OpenAiTranslator;
use hanyu_translator::{PronounceMode, Pronouncer, TranslateError, Translator};
use hanyu_types::{AppEvent, Request, Response};
use kanal::{AsyncReceiver, AsyncSender};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// A request together with the slot its single response goes into
pub struct Envelope {
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

impl Envelope {
    pub fn new(request: Request) -> (Self, oneshot::Receiver<Response>) {
        let (reply, rx) = oneshot::channel();
        (Self { request, reply }, rx)
    }
}

/// Holds the API key and talks to the remote service on behalf of the overlay
pub struct BackgroundService {
    state: Arc<AppState>,
    client: reqwest::Client,
    events: AsyncSender<AppEvent>,
}

impl BackgroundService {
    pub fn new(state: Arc<AppState>, events: AsyncSender<AppEvent>) -> Self {
        Self {
            state,
            client: reqwest::Client::new(),
            events,
        }
    }

    /// Answer requests until cancelled; each one is handled on its own task
    pub async fn run(
        self,
        requests: AsyncReceiver<Envelope>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let service = Arc::new(self);
        tracing::info!("Background service started");

        loop {
            let envelope = tokio::select! {
                _ = cancel.cancelled() => break,
                envelope = requests.recv() => match envelope {
                    Ok(envelope) => envelope,
                    Err(_) => break,
                },
            };

            let service = service.clone();
            tokio::spawn(async move {
                let action = envelope.request.action();
                let response = service.handle(envelope.request).await;
                if envelope.reply.send(response).is_err() {
                    tracing::debug!("Requester for {} went away", action);
                }
            });
        }

        tracing::info!("Background service stopping");
        Ok(())
    }

    /// Handle a raw JSON message; unparseable requests get a failure response
    pub async fn handle_raw(&self, raw: &str) -> Response {
        match Request::from_json(raw) {
            Ok(request) => self.handle(request).await,
            Err(response) => {
                tracing::warn!(
                    "Rejected request {}: {}",
                    raw,
                    response.error.as_deref().unwrap_or_default()
                );
                response
            }
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        tracing::debug!("Background request: {}", request.action());

        match request {
            Request::Translate { text } => match self.translator().await.translate(&text).await {
                Ok(result) => match serde_json::to_value(result) {
                    Ok(data) => Response::ok(data),
                    Err(e) => Response::failure(e.to_string(), None),
                },
                Err(e) => failure(e),
            },
            Request::Pronounce { text } => self.pronounce(&text, PronounceMode::Full).await,
            Request::PronouncePartial { text } => {
                self.pronounce(&text, PronounceMode::Partial).await
            }
            Request::GetPluginState => {
                let mut settings = self.state.settings.write().await;
                if let Err(e) = settings.reload() {
                    tracing::warn!("Failed to reload settings: {}", e);
                }
                Response::plugin_state(settings.enabled())
            }
            Request::UpdatePluginState { enabled } => {
                if let Err(e) = self.state.settings.write().await.set_enabled(enabled) {
                    return Response::failure(e.to_string(), None);
                }
                tracing::info!("Plugin {}", if enabled { "enabled" } else { "disabled" });

                if let Err(e) = self
                    .events
                    .send(AppEvent::PluginStateChanged { enabled })
                    .await
                {
                    tracing::warn!("Failed to broadcast plugin state: {}", e);
                }
                Response::plugin_state(enabled)
            }
        }
    }

    async fn pronounce(&self, text: &str, mode: PronounceMode) -> Response {
        match self.translator().await.pronounce(text, mode).await {
            Ok(clip) => Response::ok(Value::String(clip.base64)),
            Err(e) => failure(e),
        }
    }

    /// Client carrying the key currently on disk
    async fn translator(&self) -> OpenAiTranslator {
        let api_key = {
            let mut settings = self.state.settings.write().await;
            if let Err(e) = settings.reload() {
                tracing::warn!("Failed to reload settings: {}", e);
            }
            settings.api_key().map(str::to_string)
        };
        let config = self.state.config.read().await.translator.clone();

        OpenAiTranslator::with_client(self.client.clone(), config, api_key)
    }
}

fn failure(error: TranslateError) -> Response {
    tracing::warn!("Request failed: {}", error);
    Response::failure(error.to_string(), Some(error.kind()))
}
