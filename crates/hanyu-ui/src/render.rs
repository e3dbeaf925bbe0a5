//! Plain data handed to an [`OverlayView`](crate::view::OverlayView).
//!
//! Everything here is derived from session state on every render, so a view
//! never has to remember anything between calls.

use hanyu_core::dictionary::CharacterInfo;
use hanyu_core::language::LanguageProcessor;
use hanyu_core::pagination::PageControls;
use hanyu_types::TranslationUnit;
use uuid::Uuid;

use crate::state::{AudioState, Region, StrokeSession, StrokeState, TranslationSession, Translated};

/// Per-item pronunciation button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeakerState {
    #[default]
    Idle,
    Loading,
    Playing,
    /// Shown briefly after a failed request or playback
    Error,
}

impl SpeakerState {
    pub fn glyph(&self) -> &'static str {
        match self {
            SpeakerState::Idle | SpeakerState::Playing => "🔊",
            SpeakerState::Loading => "⌛",
            SpeakerState::Error => "❌",
        }
    }

    pub fn enabled(&self) -> bool {
        matches!(self, SpeakerState::Idle | SpeakerState::Error)
    }
}

/// Popup-level pronunciation button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioButton {
    Loading,
    Ready,
    Failed,
}

impl AudioButton {
    pub fn label(&self) -> &'static str {
        match self {
            AudioButton::Loading => "Loading pronunciation...",
            AudioButton::Ready => "Play Pronunciation",
            AudioButton::Failed => "Error loading audio",
        }
    }

    pub fn enabled(&self) -> bool {
        matches!(self, AudioButton::Ready)
    }
}

/// One character with the reading shown above it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphView {
    pub character: char,
    /// Empty when the reading was missing
    pub pinyin: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    /// Index into the full item list, used by item-level UI events
    pub index: usize,
    pub glyphs: Vec<GlyphView>,
    pub english: String,
    pub english_visible: bool,
    pub speaker: SpeakerState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub items: Vec<ItemView>,
    pub controls: PageControls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationBody {
    Loading,
    Ready {
        page: PageView,
        full_translation: String,
        full_translation_visible: bool,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationView {
    pub session: u64,
    pub text: String,
    pub body: TranslationBody,
    pub audio: AudioButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisView {
    pub radical: String,
    pub decomposition: String,
    pub hint: Option<String>,
    pub definition: Option<String>,
    pub readings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrokeStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeView {
    pub writer_id: Uuid,
    pub character: char,
    pub status: StrokeStatus,
    pub analysis: Option<AnalysisView>,
    /// Canvas edge in pixels
    pub size: u32,
}

pub fn item_view(
    index: usize,
    unit: &TranslationUnit,
    english_visible: bool,
    speaker: SpeakerState,
    language: &dyn LanguageProcessor,
) -> ItemView {
    let glyphs = unit
        .chinese
        .chars()
        .enumerate()
        .map(|(i, character)| GlyphView {
            character,
            pinyin: unit
                .pinyin
                .get(i)
                .map(|raw| language.display_reading(raw))
                .unwrap_or_default(),
        })
        .collect();

    ItemView {
        index,
        glyphs,
        english: unit.english.clone(),
        english_visible,
        speaker,
    }
}

fn page_view(translated: &Translated, language: &dyn LanguageProcessor) -> PageView {
    let offset = translated.pages.page_offset();
    let items = translated
        .pages
        .page_items()
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            let index = offset + i;
            item_view(
                index,
                unit,
                translated.revealed.get(index).copied().unwrap_or(false),
                translated.speakers.get(index).copied().unwrap_or_default(),
                language,
            )
        })
        .collect();

    PageView {
        items,
        controls: translated.pages.controls(),
    }
}

pub fn translation_view(session: &TranslationSession, language: &dyn LanguageProcessor) -> TranslationView {
    let body = match &session.translation {
        Region::Loading => TranslationBody::Loading,
        Region::Ready(translated) => TranslationBody::Ready {
            page: page_view(translated, language),
            full_translation: translated.full_translation.clone(),
            full_translation_visible: translated.full_translation_visible,
        },
        Region::Failed(error) => TranslationBody::Failed(error.clone()),
    };

    let audio = match &session.audio {
        AudioState::Loading => AudioButton::Loading,
        AudioState::Ready(_) => AudioButton::Ready,
        AudioState::Failed(_) => AudioButton::Failed,
    };

    TranslationView {
        session: session.id,
        text: session.text.clone(),
        body,
        audio,
    }
}

pub fn analysis_view(info: &CharacterInfo, language: &dyn LanguageProcessor) -> AnalysisView {
    AnalysisView {
        radical: info.radical.clone(),
        decomposition: info.decomposition.clone(),
        hint: info.etymology.as_ref().and_then(|e| e.hint.clone()),
        definition: info.definition.clone(),
        readings: info
            .readings
            .iter()
            .map(|raw| language.display_reading(raw))
            .collect(),
    }
}

pub fn stroke_view(session: &StrokeSession, size: u32) -> StrokeView {
    let status = match &session.state {
        StrokeState::Loading => StrokeStatus::Loading,
        StrokeState::Ready => StrokeStatus::Ready,
        StrokeState::Failed(error) => StrokeStatus::Failed(error.clone()),
    };

    StrokeView {
        writer_id: session.writer_id,
        character: session.character,
        status,
        analysis: session.analysis.clone(),
        size,
    }
}
