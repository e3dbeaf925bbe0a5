use std::path::PathBuf;
use std::sync::Arc;

use hanyu_core::language::LanguageProcessor;
use hanyu_core::state::AppState;
use hanyu_types::AppEvent;
use hanyu_ui::{OverlayController, Services, TerminalView, TerminalWriterHost, WriterBus};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::background::{BackgroundService, Envelope};
use crate::bridge::BackgroundBridge;
use crate::io::watcher_io;

/// Centralized channel management
pub struct ChannelSet {
    pub page_to_overlay: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub overlay_to_background: (AsyncSender<Envelope>, AsyncReceiver<Envelope>),
}

impl ChannelSet {
    pub fn new(request_queue: usize) -> Self {
        Self {
            page_to_overlay: kanal::bounded_async(256), // pointer-move bursts
            overlay_to_background: kanal::bounded_async(request_queue),
        }
    }
}

/// Terminal the overlay draws into
pub struct TerminalOptions {
    pub columns: u16,
    pub rows: u16,
    pub audio_dir: Option<PathBuf>,
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, request_queue: usize) -> Self {
        Self {
            channels: ChannelSet::new(request_queue),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Handle the CLI uses to reach the background service
    pub fn bridge(&self) -> BackgroundBridge {
        BackgroundBridge::new(self.channels.overlay_to_background.0.clone())
    }

    /// Background service only, for one-shot commands
    pub fn spawn_background(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();
        self.spawn_background_into(&mut tasks);
        tasks
    }

    pub fn spawn_tasks(
        &self,
        processor: Arc<dyn LanguageProcessor>,
        terminal: TerminalOptions,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        self.spawn_background_into(&mut tasks);

        // Stroke-order renderer
        let bus = WriterBus::default();
        tasks.spawn(hanyu_ui::stroke::run_host(
            bus.clone(),
            TerminalWriterHost::default(),
            self.cancel_token.child_token(),
        ));

        // Overlay loop
        tasks.spawn(overlay_loop(
            self.state.clone(),
            processor,
            self.bridge(),
            bus,
            terminal,
            self.channels.page_to_overlay.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Watcher IO
        tasks.spawn(watcher_io(
            self.state.clone(),
            self.cancel_token.child_token(),
            self.channels.page_to_overlay.0.clone(),
        ));

        tasks
    }

    fn spawn_background_into(&self, tasks: &mut JoinSet<anyhow::Result<()>>) {
        let service = BackgroundService::new(
            self.state.clone(),
            self.channels.page_to_overlay.0.clone(),
        );
        tasks.spawn(service.run(
            self.channels.overlay_to_background.1.clone(),
            self.cancel_token.child_token(),
        ));
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

async fn overlay_loop(
    state: Arc<AppState>,
    processor: Arc<dyn LanguageProcessor>,
    bridge: BackgroundBridge,
    bus: WriterBus,
    terminal: TerminalOptions,
    events: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let popup = state.config.read().await.popup.clone();

    let mut view = TerminalView::new(std::io::stdout(), terminal.columns);
    if let Some(dir) = terminal.audio_dir {
        std::fs::create_dir_all(&dir)?;
        view = view.with_audio_dir(dir);
    }
    let viewport = TerminalView::<std::io::Stdout>::viewport(terminal.columns, terminal.rows);

    let bridge = Arc::new(bridge);
    let services = Services {
        language: processor,
        translator: bridge.clone(),
        pronouncer: bridge.clone(),
    };

    let mut controller = OverlayController::new(view, services, popup, bus, viewport, cancel);
    controller.set_enabled(bridge.plugin_state().await);
    tracing::info!(
        "Overlay ready ({})",
        if controller.enabled() { "enabled" } else { "disabled" }
    );

    controller.run(events).await
}
