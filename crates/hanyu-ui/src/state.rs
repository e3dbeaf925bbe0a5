use hanyu_core::pagination::Paginator;
use hanyu_translator::AudioClip;
use hanyu_types::{Point, Rect, TranslationResult, TranslationUnit};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::render::{AnalysisView, SpeakerState};

/// Part of a popup filled in by one request
#[derive(Debug, Clone)]
pub enum Region<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Region<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Region::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Region::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Translation data once it arrived, with the per-item control state
#[derive(Debug, Clone)]
pub struct Translated {
    pub full_translation: String,
    pub full_translation_visible: bool,
    pub pages: Paginator<TranslationUnit>,
    pub revealed: Vec<bool>,
    pub speakers: Vec<SpeakerState>,
}

impl Translated {
    pub fn new(result: TranslationResult, items_per_page: usize) -> Self {
        let count = result.tuples.len();
        Self {
            full_translation: result.full_translation,
            full_translation_visible: false,
            pages: Paginator::new(result.tuples, items_per_page),
            revealed: vec![false; count],
            speakers: vec![SpeakerState::Idle; count],
        }
    }

    pub fn unit(&self, index: usize) -> Option<&TranslationUnit> {
        self.pages.items().get(index)
    }
}

#[derive(Debug, Clone)]
pub enum AudioState {
    Loading,
    Ready(AudioClip),
    Failed(String),
}

/// Where an overlay currently sits and whether it may still be moved for it
#[derive(Debug, Clone, Copy, Default)]
pub struct Placed {
    pub position: Option<Point>,
    /// Set once the user dragged it
    pub pinned: bool,
}

/// One open translation popup. Dropped when the popup closes.
pub struct TranslationSession {
    pub id: u64,
    pub cancel: CancellationToken,
    pub text: String,
    /// Selection rectangle, viewport-relative
    pub anchor: Rect,
    pub translation: Region<Translated>,
    pub audio: AudioState,
    pub placed: Placed,
}

impl TranslationSession {
    pub fn new(id: u64, cancel: CancellationToken, text: String, anchor: Rect) -> Self {
        Self {
            id,
            cancel,
            text,
            anchor,
            translation: Region::Loading,
            audio: AudioState::Loading,
            placed: Placed::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrokeState {
    Loading,
    Ready,
    Failed(String),
}

/// One open stroke-order popup, child of the translation popup
pub struct StrokeSession {
    pub writer_id: Uuid,
    pub cancel: CancellationToken,
    pub character: char,
    /// Clicked glyph in document coordinates
    pub anchor: Rect,
    pub state: StrokeState,
    pub analysis: Option<AnalysisView>,
    pub placed: Placed,
}

impl StrokeSession {
    pub fn new(
        cancel: CancellationToken,
        character: char,
        anchor: Rect,
        analysis: Option<AnalysisView>,
    ) -> Self {
        Self {
            writer_id: Uuid::new_v4(),
            cancel,
            character,
            anchor,
            state: StrokeState::Loading,
            analysis,
            placed: Placed::default(),
        }
    }
}

/// Transient message box
#[derive(Debug, Clone)]
pub struct ToastState {
    pub id: u64,
    pub anchor: Rect,
    pub placed: Placed,
}
