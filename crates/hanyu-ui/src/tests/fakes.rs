use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hanyu_config::popup::PopupConfig;
use hanyu_core::dictionary::CharacterInfo;
use hanyu_core::language::LanguageProcessor;
use hanyu_core::selection::is_cjk_unified;
use hanyu_translator::{
    AudioClip, PronounceMode, Pronouncer, TranslateError, Translator,
};
use hanyu_types::{
    AppEvent, AudioTarget, CharacterSelection, OverlayKind, Point, Rect, Size, TranslationResult,
    TranslationUnit, UiEvent, Viewport,
};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::controller::{OverlayController, Services};
use crate::render::{ItemView, StrokeView, TranslationBody, TranslationView};
use crate::stroke::WriterBus;
use crate::view::{OverlayView, Playback};

pub const POPUP: Size = Size {
    width: 300.0,
    height: 150.0,
};

/// Records every call; every open overlay measures as `popup_size`
pub struct FakeView {
    pub translations: Vec<TranslationView>,
    pub strokes: Vec<StrokeView>,
    pub toasts: Vec<String>,
    pub removed: Vec<OverlayKind>,
    pub placed: Vec<(OverlayKind, Point)>,
    pub played: Vec<AudioTarget>,
    pub captured: bool,
    pub open: HashSet<OverlayKind>,
    pub item_width: Option<f64>,
    pub container_width: Option<f64>,
    pub playback: Playback,
    pub popup_size: Size,
}

impl Default for FakeView {
    fn default() -> Self {
        Self {
            translations: Vec::new(),
            strokes: Vec::new(),
            toasts: Vec::new(),
            removed: Vec::new(),
            placed: Vec::new(),
            played: Vec::new(),
            captured: false,
            open: HashSet::new(),
            item_width: None,
            container_width: None,
            playback: Playback::Finished,
            popup_size: POPUP,
        }
    }
}

impl FakeView {
    pub fn last_translation(&self) -> &TranslationView {
        self.translations.last().expect("nothing rendered")
    }

    pub fn last_placed(&self, kind: OverlayKind) -> Option<Point> {
        self.placed
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, at)| *at)
    }

    pub fn page_items(&self) -> Vec<ItemView> {
        match &self.last_translation().body {
            TranslationBody::Ready { page, .. } => page.items.clone(),
            other => panic!("translation not ready: {other:?}"),
        }
    }
}

impl OverlayView for FakeView {
    fn render_translation(&mut self, view: &TranslationView) {
        self.open.insert(OverlayKind::Translation);
        self.translations.push(view.clone());
    }

    fn render_stroke(&mut self, view: &StrokeView) {
        self.open.insert(OverlayKind::StrokeOrder);
        self.strokes.push(view.clone());
    }

    fn show_toast(&mut self, message: &str) {
        self.open.insert(OverlayKind::Toast);
        self.toasts.push(message.to_string());
    }

    fn hide_toast(&mut self) {
        self.open.remove(&OverlayKind::Toast);
    }

    fn remove(&mut self, kind: OverlayKind) {
        self.open.remove(&kind);
        self.removed.push(kind);
    }

    fn place(&mut self, kind: OverlayKind, at: Point) {
        self.placed.push((kind, at));
    }

    fn measure_item(&mut self, _item: &ItemView) -> Option<f64> {
        self.item_width
    }

    fn container_width(&mut self) -> Option<f64> {
        self.container_width
    }

    fn element_size(&mut self, kind: OverlayKind) -> Option<Size> {
        self.open.contains(&kind).then_some(self.popup_size)
    }

    fn play_audio(&mut self, target: AudioTarget, _wav: &[u8]) -> Playback {
        self.played.push(target);
        self.playback.clone()
    }

    fn set_pointer_capture(&mut self, captured: bool) {
        self.captured = captured;
    }
}

pub struct FakeLanguage;

impl LanguageProcessor for FakeLanguage {
    fn normalize(&self, text: &str) -> String {
        text.trim().replace('\n', "")
    }

    fn is_script_char(&self, c: char) -> bool {
        is_cjk_unified(c)
    }

    fn display_reading(&self, raw: &str) -> String {
        raw.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
    }

    fn lookup_character(&self, c: char) -> Option<CharacterInfo> {
        (c == '好').then(|| CharacterInfo {
            character: '好',
            radical: "女".to_string(),
            decomposition: "⿰女子".to_string(),
            etymology: None,
            definition: Some("good, excellent".to_string()),
            readings: vec!["hao3".to_string()],
        })
    }
}

#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail(String),
}

pub struct FakeTranslator {
    pub reply: Reply<TranslationResult>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str) -> Result<TranslationResult, TranslateError> {
        self.calls.lock().unwrap().push(text.to_string());
        match &self.reply {
            Reply::Ok(result) => Ok(result.clone()),
            Reply::Fail(message) => Err(TranslateError::Api(message.clone())),
        }
    }
}

pub struct FakePronouncer {
    pub reply: Reply<String>,
    pub calls: Mutex<Vec<(String, PronounceMode)>>,
}

#[async_trait::async_trait]
impl Pronouncer for FakePronouncer {
    async fn pronounce(&self, text: &str, mode: PronounceMode) -> Result<AudioClip, TranslateError> {
        self.calls.lock().unwrap().push((text.to_string(), mode));
        match &self.reply {
            Reply::Ok(base64) => Ok(AudioClip::new(base64.clone())),
            Reply::Fail(message) => Err(TranslateError::EmptyResponse(message.clone())),
        }
    }
}

pub struct Harness {
    pub controller: OverlayController<FakeView>,
    pub translator: Arc<FakeTranslator>,
    pub pronouncer: Arc<FakePronouncer>,
    pub bus: WriterBus,
    pub cancel: CancellationToken,
}

impl Harness {
    pub fn new(translation: Reply<TranslationResult>, audio: Reply<String>) -> Self {
        Self::with_view(translation, audio, FakeView::default())
    }

    pub fn with_view(translation: Reply<TranslationResult>, audio: Reply<String>, view: FakeView) -> Self {
        let config = PopupConfig {
            error_revert_ms: 10,
            ..PopupConfig::default()
        };
        Self::with_config(translation, audio, view, config)
    }

    pub fn with_config(
        translation: Reply<TranslationResult>,
        audio: Reply<String>,
        view: FakeView,
        config: PopupConfig,
    ) -> Self {
        let translator = Arc::new(FakeTranslator {
            reply: translation,
            calls: Mutex::new(Vec::new()),
        });
        let pronouncer = Arc::new(FakePronouncer {
            reply: audio,
            calls: Mutex::new(Vec::new()),
        });
        let services = Services {
            language: Arc::new(FakeLanguage),
            translator: translator.clone(),
            pronouncer: pronouncer.clone(),
        };
        let bus = WriterBus::default();
        let cancel = CancellationToken::new();

        let controller = OverlayController::new(
            view,
            services,
            config,
            bus.clone(),
            Viewport::new(1200.0, 800.0),
            cancel.clone(),
        );

        Self {
            controller,
            translator,
            pronouncer,
            bus,
            cancel,
        }
    }

    pub fn select(&mut self, text: &str) {
        self.controller.handle_app_event(AppEvent::Selection(CharacterSelection {
            text: text.to_string(),
            rect: Some(Rect::new(500.0, 100.0, 200.0, 20.0)),
            pointer: None,
        }));
    }

    pub fn ui(&mut self, event: UiEvent) {
        self.controller.handle_app_event(AppEvent::Ui { event });
    }

    /// Feed `count` finished background tasks back into the controller
    pub async fn settle(&mut self, count: usize) {
        for _ in 0..count {
            let completion = timeout(Duration::from_secs(2), self.controller.next_completion())
                .await
                .expect("timed out waiting for completion")
                .expect("completion channel closed");
            self.controller.handle_completion(completion);
        }
    }

    pub fn view(&self) -> &FakeView {
        self.controller.view()
    }

    pub fn translate_calls(&self) -> usize {
        self.translator.calls.lock().unwrap().len()
    }

    pub fn pronounce_calls(&self) -> Vec<(String, PronounceMode)> {
        self.pronouncer.calls.lock().unwrap().clone()
    }
}

pub fn unit(chinese: &str, pinyin: &[&str], english: &str) -> TranslationUnit {
    TranslationUnit {
        chinese: chinese.to_string(),
        pinyin: pinyin.iter().map(|s| s.to_string()).collect(),
        english: english.to_string(),
    }
}

pub fn greeting() -> TranslationResult {
    TranslationResult {
        full_translation: "Hello".to_string(),
        tuples: vec![unit("你好", &["ni3", "hao3"], "hello")],
    }
}

/// Ten single-character units
pub fn long_text() -> TranslationResult {
    let chars = ["我", "爱", "猫", "他", "是", "人", "中", "国", "大", "山"];
    TranslationResult {
        full_translation: "A long sentence".to_string(),
        tuples: chars
            .iter()
            .map(|c| unit(c, &["x1"], "word"))
            .collect(),
    }
}

pub const WAV_BASE64: &str = "UklGRg==";
