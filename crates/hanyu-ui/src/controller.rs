use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hanyu_config::popup::PopupConfig;
use hanyu_core::drag::DragSession;
use hanyu_core::geometry::{self, Placement, PositionMode};
use hanyu_core::language::LanguageProcessor;
use hanyu_core::pagination::{self, LayoutParams};
use hanyu_core::selection::{SelectionCheck, check_selection};
use hanyu_translator::{AudioClip, PronounceMode, Pronouncer, TranslateError, Translator};
use hanyu_types::{
    AppEvent, AudioTarget, CharacterSelection, OverlayKind, Point, Rect, TranslationResult,
    TranslationUnit, UiEvent, Viewport, WriterCommand,
};
use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::render::{self, SpeakerState};
use crate::state::{
    AudioState, Placed, Region, StrokeSession, StrokeState, ToastState, Translated,
    TranslationSession,
};
use crate::stroke::{WriterBus, WriterMessage, WriterOptions};
use crate::view::{OverlayView, Playback};

/// Collaborators the controller calls out to
#[derive(Clone)]
pub struct Services {
    pub language: Arc<dyn LanguageProcessor>,
    pub translator: Arc<dyn Translator>,
    pub pronouncer: Arc<dyn Pronouncer>,
}

/// Results of background work, fed back into the controller
#[derive(Debug)]
pub enum Completion {
    Translated {
        session: u64,
        result: Result<TranslationResult, TranslateError>,
    },
    Pronounced {
        session: u64,
        result: Result<AudioClip, TranslateError>,
    },
    ItemPronounced {
        session: u64,
        item: usize,
        result: Result<AudioClip, TranslateError>,
    },
    SpeakerRevert {
        session: u64,
        item: usize,
    },
    StrokeReady {
        writer_id: Uuid,
    },
    StrokeFailed {
        writer_id: Uuid,
        error: String,
    },
    ToastExpired {
        toast: u64,
    },
    Reposition,
}

struct ActiveDrag {
    overlay: OverlayKind,
    session: DragSession,
}

/// Owns every overlay on the page and the sessions behind them
pub struct OverlayController<V: OverlayView> {
    view: V,
    services: Services,
    config: PopupConfig,
    params: LayoutParams,
    writer_bus: WriterBus,
    cancel: CancellationToken,
    completion_tx: AsyncSender<Completion>,
    completion_rx: AsyncReceiver<Completion>,

    enabled: bool,
    viewport: Viewport,
    translation: Option<TranslationSession>,
    stroke: Option<StrokeSession>,
    toast: Option<ToastState>,
    drag: Option<ActiveDrag>,
    next_session: u64,
    next_toast: u64,
    reposition_pending: bool,
}

impl<V: OverlayView> OverlayController<V> {
    pub fn new(
        view: V,
        services: Services,
        config: PopupConfig,
        writer_bus: WriterBus,
        viewport: Viewport,
        cancel: CancellationToken,
    ) -> Self {
        let (completion_tx, completion_rx) = kanal::bounded_async(64);
        let params = LayoutParams::from_config(&config);

        Self {
            view,
            services,
            config,
            params,
            writer_bus,
            cancel,
            completion_tx,
            completion_rx,
            enabled: true,
            viewport,
            translation: None,
            stroke: None,
            toast: None,
            drag: None,
            next_session: 0,
            next_toast: 0,
            reposition_pending: false,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn translation(&self) -> Option<&TranslationSession> {
        self.translation.as_ref()
    }

    pub fn stroke(&self) -> Option<&StrokeSession> {
        self.stroke.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Consume page events and completions until cancelled or the event
    /// channel closes
    pub async fn run(mut self, events: AsyncReceiver<AppEvent>) -> anyhow::Result<()> {
        tracing::info!("[OVERLAY] Controller started");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = events.recv() => match event {
                    Ok(event) => self.handle_app_event(event),
                    Err(_) => {
                        tracing::info!("[OVERLAY] Event channel closed");
                        break;
                    }
                },
                completion = self.completion_rx.recv() => {
                    // The controller holds a sender, so this never closes
                    if let Ok(completion) = completion {
                        self.handle_completion(completion);
                    }
                }
            }
        }

        self.teardown();
        self.dismiss_toast();
        tracing::info!("[OVERLAY] Controller stopped");
        Ok(())
    }

    /// Wait for the next piece of finished background work
    pub async fn next_completion(&self) -> Option<Completion> {
        self.completion_rx.recv().await.ok()
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Selection(selection) => self.on_selection(selection),
            AppEvent::PointerDown(pointer) => self.on_pointer_down(pointer),
            AppEvent::PointerMove(pointer) => self.on_pointer_move(pointer),
            AppEvent::PointerUp(_) => self.end_drag(),
            AppEvent::Viewport(viewport) => {
                let resized = viewport.width != self.viewport.width;
                self.viewport = viewport;
                if resized {
                    self.relayout();
                }
                self.schedule_reposition();
            }
            AppEvent::Mutated { overlay } => {
                tracing::trace!("[OVERLAY] {:?} mutated", overlay);
                self.schedule_reposition();
            }
            AppEvent::Ui { event } => self.on_ui_event(event),
            AppEvent::PluginStateChanged { enabled } => {
                tracing::info!("[OVERLAY] Plugin {}", if enabled { "enabled" } else { "disabled" });
                self.enabled = enabled;
                if !enabled {
                    self.teardown();
                }
            }
        }
    }

    pub fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Translated { session, result } => self.on_translated(session, result),
            Completion::Pronounced { session, result } => self.on_pronounced(session, result),
            Completion::ItemPronounced {
                session,
                item,
                result,
            } => self.on_item_pronounced(session, item, result),
            Completion::SpeakerRevert { session, item } => {
                let Some(translated) = self.translated_mut(session) else {
                    return;
                };
                let Some(speaker) = translated.speakers.get_mut(item) else {
                    return;
                };
                if *speaker == SpeakerState::Error {
                    *speaker = SpeakerState::Idle;
                    self.render_translation();
                }
            }
            Completion::StrokeReady { writer_id } => self.on_stroke_ready(writer_id),
            Completion::StrokeFailed { writer_id, error } => {
                let Some(stroke) = self.stroke.as_mut().filter(|s| s.writer_id == writer_id) else {
                    tracing::debug!("[OVERLAY] Dropping stale stroke-order failure");
                    return;
                };
                tracing::warn!("[OVERLAY] Stroke order unavailable: {}", error);
                stroke.state = StrokeState::Failed(error);
                self.render_stroke();
            }
            Completion::ToastExpired { toast } => {
                if self.toast.as_ref().is_some_and(|t| t.id == toast) {
                    self.dismiss_toast();
                }
            }
            Completion::Reposition => {
                self.reposition_pending = false;
                self.reposition_all();
            }
        }
    }

    fn on_selection(&mut self, selection: CharacterSelection) {
        if !self.enabled {
            tracing::debug!("[OVERLAY] Plugin disabled, ignoring selection");
            return;
        }

        // Selecting text inside an open popup must not replace it
        if let Some(pointer) = selection.pointer
            && self.inside_popups(pointer)
        {
            return;
        }

        let language = Arc::clone(&self.services.language);
        let text = language.normalize(&selection.text);
        let anchor = selection.rect.unwrap_or_else(|| self.default_anchor());

        let check = check_selection(&text, self.config.max_chars, |c| language.is_script_char(c));
        match check {
            SelectionCheck::Accepted(text) => self.open_translation(text, anchor),
            SelectionCheck::Ignored => {}
            rejected => {
                if let Some(message) = rejected.toast_message() {
                    tracing::debug!("[OVERLAY] Selection rejected: {:?}", rejected);
                    self.show_toast(&message, anchor);
                }
            }
        }
    }

    fn default_anchor(&self) -> Rect {
        Rect::new(self.viewport.width / 2.0, 0.0, 0.0, 0.0)
    }

    fn open_translation(&mut self, text: String, anchor: Rect) {
        self.teardown();

        self.next_session += 1;
        let id = self.next_session;
        let cancel = self.cancel.child_token();
        tracing::info!(
            "[OVERLAY] Opening translation session {} for {} characters",
            id,
            text.chars().count()
        );

        self.translation = Some(TranslationSession::new(id, cancel.clone(), text.clone(), anchor));
        self.render_translation();
        self.place(OverlayKind::Translation);

        let translator = Arc::clone(&self.services.translator);
        let source = text.clone();
        self.spawn_completion(cancel.clone(), async move {
            let result = translator.translate(&source).await;
            Completion::Translated {
                session: id,
                result,
            }
        });

        let pronouncer = Arc::clone(&self.services.pronouncer);
        self.spawn_completion(cancel, async move {
            let result = pronouncer.pronounce(&text, PronounceMode::Full).await;
            Completion::Pronounced {
                session: id,
                result,
            }
        });
    }

    /// Close the stroke-order child, then the translation popup
    pub fn teardown(&mut self) {
        self.close_stroke();

        if let Some(session) = self.translation.take() {
            tracing::debug!("[OVERLAY] Closing translation session {}", session.id);
            session.cancel.cancel();
            self.view.remove(OverlayKind::Translation);
        }

        self.end_drag();
    }

    fn close_stroke(&mut self) {
        let Some(stroke) = self.stroke.take() else {
            return;
        };

        stroke.cancel.cancel();
        self.writer_bus.send(WriterMessage::Cleanup {
            writer_id: stroke.writer_id,
        });
        self.view.remove(OverlayKind::StrokeOrder);

        if self
            .drag
            .as_ref()
            .is_some_and(|d| d.overlay == OverlayKind::StrokeOrder)
        {
            self.end_drag();
        }
    }

    fn current_session(&self, session: u64) -> Option<&TranslationSession> {
        self.translation.as_ref().filter(|s| s.id == session)
    }

    fn current_session_mut(&mut self, session: u64) -> Option<&mut TranslationSession> {
        self.translation.as_mut().filter(|s| s.id == session)
    }

    fn translated_mut(&mut self, session: u64) -> Option<&mut Translated> {
        self.current_session_mut(session)
            .and_then(|s| s.translation.ready_mut())
    }

    fn on_translated(&mut self, session: u64, result: Result<TranslationResult, TranslateError>) {
        if self.current_session(session).is_none() {
            tracing::debug!("[OVERLAY] Dropping stale translation for session {}", session);
            return;
        }

        let region = match result {
            Ok(result) => {
                tracing::info!("[OVERLAY] Translation arrived with {} items", result.tuples.len());
                let items_per_page =
                    self.measure_items_per_page(result.tuples.first(), result.tuples.len());
                Region::Ready(Translated::new(result, items_per_page))
            }
            Err(e) => {
                tracing::warn!("[OVERLAY] Translation failed: {}", e);
                Region::Failed(format!("Error: {e}"))
            }
        };

        if let Some(current) = self.current_session_mut(session) {
            current.translation = region;
        }
        self.render_translation();
        self.place(OverlayKind::Translation);
    }

    /// Render one representative item and fit as many as the container holds
    fn measure_items_per_page(&mut self, sample: Option<&TranslationUnit>, count: usize) -> usize {
        let item_width = sample.and_then(|unit| {
            let sample = render::item_view(
                0,
                unit,
                false,
                SpeakerState::Idle,
                self.services.language.as_ref(),
            );
            self.view.measure_item(&sample)
        });
        let container_width = self.view.container_width();

        pagination::layout(count, container_width, item_width, &self.params)
    }

    /// Fit the open translation to a container whose width changed
    fn relayout(&mut self) {
        let Some((sample, count)) = self
            .translation
            .as_ref()
            .and_then(|s| s.translation.ready())
            .map(|t| (t.pages.items().first().cloned(), t.pages.items().len()))
        else {
            return;
        };

        let items_per_page = self.measure_items_per_page(sample.as_ref(), count);
        let Some(translated) = self.translation.as_mut().and_then(|s| s.translation.ready_mut()) else {
            return;
        };
        if translated.pages.items_per_page() == items_per_page {
            return;
        }

        tracing::debug!(
            "[OVERLAY] Relayout: {} -> {} items per page",
            translated.pages.items_per_page(),
            items_per_page
        );
        translated.pages.set_items_per_page(items_per_page);
        self.render_translation();
    }

    fn on_pronounced(&mut self, session: u64, result: Result<AudioClip, TranslateError>) {
        let Some(current) = self.current_session_mut(session) else {
            tracing::debug!("[OVERLAY] Dropping stale pronunciation for session {}", session);
            return;
        };

        current.audio = match result {
            Ok(clip) => AudioState::Ready(clip),
            Err(e) => {
                tracing::warn!("[OVERLAY] Pronunciation failed: {}", e);
                AudioState::Failed(e.to_string())
            }
        };
        self.render_translation();
    }

    fn on_item_pronounced(&mut self, session: u64, item: usize, result: Result<AudioClip, TranslateError>) {
        if self.translated_mut(session).is_none() {
            tracing::debug!("[OVERLAY] Dropping stale item pronunciation");
            return;
        }

        let next = match result.and_then(|clip| clip.decode()) {
            Ok(wav) => match self.view.play_audio(AudioTarget::Item { session, item }, &wav) {
                Playback::Started => SpeakerState::Playing,
                Playback::Finished => SpeakerState::Idle,
                Playback::Failed(error) => {
                    tracing::warn!("[OVERLAY] Audio playback error: {}", error);
                    SpeakerState::Error
                }
            },
            Err(e) => {
                tracing::warn!("[OVERLAY] Error getting audio: {}", e);
                SpeakerState::Error
            }
        };

        self.set_speaker(session, item, next);
    }

    fn set_speaker(&mut self, session: u64, item: usize, state: SpeakerState) {
        let Some(translated) = self.translated_mut(session) else {
            return;
        };
        let Some(speaker) = translated.speakers.get_mut(item) else {
            return;
        };
        *speaker = state;
        self.render_translation();

        if state == SpeakerState::Error {
            let delay = Duration::from_millis(self.config.error_revert_ms);
            if let Some(cancel) = self.current_session(session).map(|s| s.cancel.clone()) {
                self.schedule(cancel, delay, Completion::SpeakerRevert { session, item });
            }
        }
    }

    fn on_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::NextPage => self.turn_page(true),
            UiEvent::PrevPage => self.turn_page(false),
            UiEvent::ToggleEnglish { item } => {
                let Some(translated) = self.translation.as_mut().and_then(|s| s.translation.ready_mut())
                else {
                    return;
                };
                if let Some(revealed) = translated.revealed.get_mut(item) {
                    *revealed = !*revealed;
                    self.render_translation();
                    self.schedule_reposition();
                }
            }
            UiEvent::ToggleFullTranslation => {
                let Some(translated) = self.translation.as_mut().and_then(|s| s.translation.ready_mut())
                else {
                    return;
                };
                translated.full_translation_visible = !translated.full_translation_visible;
                self.render_translation();
                self.schedule_reposition();
            }
            UiEvent::PlayPronunciation => self.play_full(),
            UiEvent::PlayItem { item } => self.play_item(item),
            UiEvent::ShowStrokeOrder {
                item,
                char_index,
                rect,
            } => {
                let character = self
                    .translation
                    .as_ref()
                    .and_then(|s| s.translation.ready())
                    .and_then(|t| t.unit(item))
                    .and_then(|unit| unit.chinese.chars().nth(char_index));
                match character {
                    Some(character) => self.open_stroke(character, rect),
                    None => tracing::debug!("[OVERLAY] No glyph at {}:{}", item, char_index),
                }
            }
            UiEvent::StrokeCommand { command } => self.send_stroke_command(command),
            UiEvent::CloseStrokeOrder => self.close_stroke(),
            UiEvent::DragStart { overlay, pointer } => self.begin_drag(overlay, pointer),
            UiEvent::AudioFinished { target } => match target {
                AudioTarget::Full { .. } => tracing::debug!("[OVERLAY] Full pronunciation finished"),
                AudioTarget::Item { session, item } => {
                    self.end_item_playback(session, item, SpeakerState::Idle)
                }
            },
            UiEvent::AudioFailed { target, error } => {
                tracing::warn!("[OVERLAY] Audio playback error: {}", error);
                match target {
                    AudioTarget::Full { session } => {
                        if self.current_session(session).is_some() {
                            self.show_playback_error(&error);
                        } else {
                            tracing::debug!("[OVERLAY] Dropping playback error of closed popup");
                        }
                    }
                    AudioTarget::Item { session, item } => {
                        self.end_item_playback(session, item, SpeakerState::Error)
                    }
                }
            }
        }
    }

    /// Only a speaker that is still playing in the open session reacts to
    /// the end of its clip
    fn end_item_playback(&mut self, session: u64, item: usize, next: SpeakerState) {
        let playing = self
            .translated_mut(session)
            .and_then(|t| t.speakers.get(item))
            .is_some_and(|state| *state == SpeakerState::Playing);
        if !playing {
            tracing::debug!("[OVERLAY] Ignoring playback end of item {} in session {}", item, session);
            return;
        }
        self.set_speaker(session, item, next);
    }

    fn turn_page(&mut self, forward: bool) {
        let Some(translated) = self.translation.as_mut().and_then(|s| s.translation.ready_mut()) else {
            return;
        };
        let moved = if forward {
            translated.pages.next()
        } else {
            translated.pages.prev()
        };
        if moved {
            self.render_translation();
            self.schedule_reposition();
        }
    }

    fn play_full(&mut self) {
        let Some((session, AudioState::Ready(clip))) = self.translation.as_ref().map(|s| (s.id, &s.audio))
        else {
            return;
        };

        let outcome = match clip.decode() {
            Ok(wav) => self.view.play_audio(AudioTarget::Full { session }, &wav),
            Err(e) => Playback::Failed(e.to_string()),
        };
        if let Playback::Failed(error) = outcome {
            tracing::warn!("[OVERLAY] Audio playback error: {}", error);
            self.show_playback_error(&error);
        }
    }

    fn show_playback_error(&mut self, error: &str) {
        let anchor = self
            .translation
            .as_ref()
            .map(|s| s.anchor)
            .unwrap_or_else(|| self.default_anchor());
        self.show_toast(&format!("Error playing audio: {error}"), anchor);
    }

    fn play_item(&mut self, item: usize) {
        let Some(session) = self.translation.as_mut() else {
            return;
        };
        let id = session.id;
        let cancel = session.cancel.clone();
        let Some(translated) = session.translation.ready_mut() else {
            return;
        };
        let Some(text) = translated.unit(item).map(|unit| unit.chinese.clone()) else {
            return;
        };
        let Some(speaker) = translated.speakers.get_mut(item) else {
            return;
        };
        if !speaker.enabled() {
            return;
        }
        *speaker = SpeakerState::Loading;
        self.render_translation();

        let pronouncer = Arc::clone(&self.services.pronouncer);
        self.spawn_completion(cancel, async move {
            let result = pronouncer.pronounce(&text, PronounceMode::Partial).await;
            Completion::ItemPronounced {
                session: id,
                item,
                result,
            }
        });
    }

    fn open_stroke(&mut self, character: char, rect: Rect) {
        let Some(parent) = self.translation.as_ref().map(|s| s.cancel.clone()) else {
            return;
        };
        self.close_stroke();

        let analysis = self
            .services
            .language
            .lookup_character(character)
            .map(|info| render::analysis_view(&info, self.services.language.as_ref()));
        // Stored in document coordinates so scrolling carries it along
        let origin = geometry::to_mode(
            Point::new(rect.left, rect.top),
            PositionMode::Absolute,
            self.viewport,
        );
        let anchor = Rect::new(origin.x, origin.y, rect.width, rect.height);

        let session = StrokeSession::new(parent.child_token(), character, anchor, analysis);
        let writer_id = session.writer_id;
        let cancel = session.cancel.clone();
        tracing::info!("[OVERLAY] Stroke order for {} (writer {})", character, writer_id);

        self.stroke = Some(session);
        self.render_stroke();
        self.place(OverlayKind::StrokeOrder);

        let bus = self.writer_bus.clone();
        let options = WriterOptions::square(self.config.writer_size);
        self.spawn_completion(cancel, async move {
            match bus.create_writer(writer_id, character, options).await {
                Ok(()) => Completion::StrokeReady { writer_id },
                Err(e) => Completion::StrokeFailed {
                    writer_id,
                    error: e.to_string(),
                },
            }
        });
    }

    fn on_stroke_ready(&mut self, writer_id: Uuid) {
        let Some(stroke) = self.stroke.as_mut().filter(|s| s.writer_id == writer_id) else {
            tracing::debug!("[OVERLAY] Dropping stale stroke-order writer {}", writer_id);
            return;
        };

        stroke.state = StrokeState::Ready;
        self.writer_bus.send(WriterMessage::Command {
            writer_id,
            command: WriterCommand::Animate,
        });
        self.render_stroke();
    }

    fn send_stroke_command(&mut self, command: WriterCommand) {
        let Some(stroke) = self.stroke.as_ref().filter(|s| s.state == StrokeState::Ready) else {
            return;
        };
        self.writer_bus.send(WriterMessage::Command {
            writer_id: stroke.writer_id,
            command,
        });
    }

    fn render_translation(&mut self) {
        if let Some(session) = self.translation.as_ref() {
            let view = render::translation_view(session, self.services.language.as_ref());
            self.view.render_translation(&view);
        }
    }

    fn render_stroke(&mut self) {
        if let Some(stroke) = self.stroke.as_ref() {
            let view = render::stroke_view(stroke, self.config.writer_size);
            self.view.render_stroke(&view);
        }
    }

    fn show_toast(&mut self, message: &str, anchor: Rect) {
        self.next_toast += 1;
        let id = self.next_toast;

        self.view.show_toast(message);
        self.toast = Some(ToastState {
            id,
            anchor,
            placed: Placed::default(),
        });
        self.place(OverlayKind::Toast);

        let delay = Duration::from_millis(self.config.toast_ms);
        self.schedule(self.cancel.clone(), delay, Completion::ToastExpired { toast: id });
    }

    fn dismiss_toast(&mut self) {
        if self.toast.take().is_some() {
            self.view.hide_toast();
        }
    }

    fn placement(&self, kind: OverlayKind) -> Placement {
        let margin = self.config.edge_margin;
        match kind {
            OverlayKind::Translation => Placement::fixed(margin, self.config.anchor_offset)
                .with_max_width(self.config.max_popup_width)
                .with_min_width(self.config.min_popup_width),
            OverlayKind::Toast => {
                Placement::fixed(margin, self.config.anchor_offset)
                    .with_max_width(self.config.max_popup_width)
            }
            OverlayKind::StrokeOrder => Placement::absolute(margin, self.config.stroke_anchor_offset),
        }
    }

    /// Anchor of an overlay, viewport-relative
    fn anchor(&self, kind: OverlayKind) -> Option<Rect> {
        match kind {
            OverlayKind::Translation => self.translation.as_ref().map(|s| s.anchor),
            OverlayKind::StrokeOrder => self.stroke.as_ref().map(|s| {
                Rect::new(
                    s.anchor.left - self.viewport.scroll_x,
                    s.anchor.top - self.viewport.scroll_y,
                    s.anchor.width,
                    s.anchor.height,
                )
            }),
            OverlayKind::Toast => self.toast.as_ref().map(|t| t.anchor),
        }
    }

    fn placed_mut(&mut self, kind: OverlayKind) -> Option<&mut Placed> {
        match kind {
            OverlayKind::Translation => self.translation.as_mut().map(|s| &mut s.placed),
            OverlayKind::StrokeOrder => self.stroke.as_mut().map(|s| &mut s.placed),
            OverlayKind::Toast => self.toast.as_mut().map(|t| &mut t.placed),
        }
    }

    fn placed(&self, kind: OverlayKind) -> Option<Placed> {
        match kind {
            OverlayKind::Translation => self.translation.as_ref().map(|s| s.placed),
            OverlayKind::StrokeOrder => self.stroke.as_ref().map(|s| s.placed),
            OverlayKind::Toast => self.toast.as_ref().map(|t| t.placed),
        }
    }

    /// Position an overlay under its anchor unless the user moved it
    fn place(&mut self, kind: OverlayKind) {
        let Some(anchor) = self.anchor(kind) else {
            return;
        };
        if self.placed(kind).is_some_and(|p| p.pinned) {
            return;
        }
        let Some(size) = self.view.element_size(kind) else {
            return;
        };

        let at = geometry::position(size, anchor, self.viewport, &self.placement(kind));
        self.view.place(kind, at);
        if let Some(placed) = self.placed_mut(kind) {
            placed.position = Some(at);
        }
    }

    fn reposition_all(&mut self) {
        for kind in [OverlayKind::Translation, OverlayKind::StrokeOrder, OverlayKind::Toast] {
            self.place(kind);
        }
    }

    /// Coalesce bursts of layout changes into one recompute
    fn schedule_reposition(&mut self) {
        if self.reposition_pending {
            return;
        }
        if self.translation.is_none() && self.stroke.is_none() && self.toast.is_none() {
            return;
        }
        self.reposition_pending = true;
        let delay = Duration::from_millis(self.config.reposition_debounce_ms);
        self.schedule(self.cancel.clone(), delay, Completion::Reposition);
    }

    /// Rectangle an overlay covers, in its own coordinate space
    fn overlay_rect(&mut self, kind: OverlayKind) -> Option<Rect> {
        let position = self.placed(kind)?.position?;
        let mut size = self.view.element_size(kind)?;
        size.width = self.placement(kind).effective_width(size.width);
        Some(Rect::from_origin(position, size))
    }

    fn inside_popups(&mut self, pointer: Point) -> bool {
        [OverlayKind::Translation, OverlayKind::StrokeOrder]
            .into_iter()
            .any(|kind| {
                let mode = self.placement(kind).mode;
                let local = geometry::to_mode(pointer, mode, self.viewport);
                self.overlay_rect(kind).is_some_and(|rect| rect.contains(local))
            })
    }

    fn on_pointer_down(&mut self, pointer: Point) {
        if self.drag.is_some() {
            return;
        }
        if self.translation.is_none() && self.stroke.is_none() {
            return;
        }
        if self.inside_popups(pointer) {
            return;
        }

        tracing::debug!("[OVERLAY] Pointer down outside popups, closing");
        self.teardown();
    }

    fn begin_drag(&mut self, overlay: OverlayKind, pointer: Point) {
        let Some(origin) = self.placed(overlay).and_then(|p| p.position) else {
            return;
        };

        self.drag = Some(ActiveDrag {
            overlay,
            session: DragSession::begin(pointer, origin),
        });
        self.view.set_pointer_capture(true);
    }

    fn on_pointer_move(&mut self, pointer: Point) {
        let Some((overlay, session)) = self.drag.as_ref().map(|d| (d.overlay, d.session)) else {
            return;
        };
        let Some(size) = self.view.element_size(overlay) else {
            return;
        };

        let bounds = geometry::bounds(self.placement(overlay).mode, self.viewport);
        let at = session.update(pointer, size, bounds);
        self.view.place(overlay, at);
        if let Some(placed) = self.placed_mut(overlay) {
            placed.position = Some(at);
            placed.pinned = true;
        }
    }

    fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            self.view.set_pointer_capture(false);
        }
    }

    fn spawn_completion<F>(&self, cancel: CancellationToken, work: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let completion = tokio::select! {
                _ = cancel.cancelled() => return,
                completion = work => completion,
            };
            if let Err(e) = tx.send(completion).await {
                tracing::debug!("[OVERLAY] Completion dropped: {}", e);
            }
        });
    }

    fn schedule(&self, cancel: CancellationToken, delay: Duration, completion: Completion) {
        self.spawn_completion(cancel, async move {
            tokio::time::sleep(delay).await;
            completion
        });
    }
}
