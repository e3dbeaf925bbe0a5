//! Message bus between the stroke-order popup and the widget that draws
//! the animation.
//!
//! The widget library loads once per process and flips the shared `loaded`
//! signal. Each popup then creates its own writer, identified by a uuid, and
//! waits for the renderer to acknowledge it.

use hanyu_types::WriterCommand;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Writer appearance, sent with `Init`
#[derive(Debug, Clone, PartialEq)]
pub struct WriterOptions {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub show_outline: bool,
    pub stroke_animation_speed: f32,
    pub delay_between_strokes_ms: u64,
    pub show_hint_after_misses: u32,
}

impl WriterOptions {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            padding: 5,
            show_outline: true,
            stroke_animation_speed: 1.0,
            delay_between_strokes_ms: 1000,
            show_hint_after_misses: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriterMessage {
    Init {
        writer_id: Uuid,
        character: char,
        options: WriterOptions,
    },
    Ready {
        writer_id: Uuid,
    },
    Failed {
        writer_id: Uuid,
        error: String,
    },
    Command {
        writer_id: Uuid,
        command: WriterCommand,
    },
    Cleanup {
        writer_id: Uuid,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("{0}")]
    Failed(String),

    #[error("Stroke-order widget bus closed")]
    Closed,
}

#[derive(Clone)]
pub struct WriterBus {
    tx: broadcast::Sender<WriterMessage>,
    loaded: watch::Sender<bool>,
}

impl WriterBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        let (loaded, _) = watch::channel(false);
        Self { tx, loaded }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WriterMessage> {
        self.tx.subscribe()
    }

    pub fn send(&self, message: WriterMessage) {
        if self.tx.send(message).is_err() {
            tracing::debug!("No stroke-order renderer listening");
        }
    }

    /// Signal that the widget library finished loading. Idempotent.
    pub fn mark_loaded(&self) {
        self.loaded.send_replace(true);
    }

    /// Wait for the library, create a writer and wait for its acknowledgement
    pub async fn create_writer(
        &self,
        writer_id: Uuid,
        character: char,
        options: WriterOptions,
    ) -> Result<(), WriterError> {
        let mut loaded = self.loaded.subscribe();
        loaded
            .wait_for(|ready| *ready)
            .await
            .map_err(|_| WriterError::Closed)?;

        // Subscribe before sending so the acknowledgement cannot be missed
        let mut rx = self.subscribe();
        self.send(WriterMessage::Init {
            writer_id,
            character,
            options,
        });

        loop {
            match rx.recv().await {
                Ok(WriterMessage::Ready { writer_id: id }) if id == writer_id => return Ok(()),
                Ok(WriterMessage::Failed { writer_id: id, error }) if id == writer_id => {
                    return Err(WriterError::Failed(error));
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Stroke-order bus lagged, {} messages skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return Err(WriterError::Closed),
            }
        }
    }
}

impl Default for WriterBus {
    fn default() -> Self {
        Self::new(32)
    }
}

/// Draws writers on behalf of the bus
pub trait WriterRenderer: Send {
    fn create(&mut self, writer_id: Uuid, character: char, options: &WriterOptions) -> Result<(), String>;

    fn command(&mut self, writer_id: Uuid, command: WriterCommand);

    fn cleanup(&mut self, writer_id: Uuid);
}

/// Serve the bus with `renderer` until cancelled
pub async fn run_host<R: WriterRenderer>(
    bus: WriterBus,
    mut renderer: R,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut rx = bus.subscribe();
    bus.mark_loaded();
    tracing::info!("Stroke-order renderer ready");

    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => break,
            message = rx.recv() => message,
        };

        match message {
            Ok(WriterMessage::Init {
                writer_id,
                character,
                options,
            }) => match renderer.create(writer_id, character, &options) {
                Ok(()) => bus.send(WriterMessage::Ready { writer_id }),
                Err(error) => {
                    tracing::warn!("Could not create writer for {}: {}", character, error);
                    bus.send(WriterMessage::Failed { writer_id, error });
                }
            },
            Ok(WriterMessage::Command { writer_id, command }) => {
                renderer.command(writer_id, command);
            }
            Ok(WriterMessage::Cleanup { writer_id }) => renderer.cleanup(writer_id),
            Ok(WriterMessage::Ready { .. } | WriterMessage::Failed { .. }) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Stroke-order renderer lagged, {} messages skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    tracing::info!("Stroke-order renderer stopping");
    Ok(())
}
