use serde::{Deserialize, Serialize};

/// Events flowing from a text source or the page into the overlay controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AppEvent {
    Selection(CharacterSelection),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    /// Scroll or resize of the page
    Viewport(Viewport),
    /// An overlay's subtree changed and its size may differ
    Mutated {
        overlay: OverlayKind,
    },
    Ui {
        event: UiEvent,
    },
    PluginStateChanged {
        enabled: bool,
    },
}

/// Clicks and playback notifications coming from rendered overlay controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UiEvent {
    NextPage,
    PrevPage,
    ToggleEnglish {
        item: usize,
    },
    ToggleFullTranslation,
    PlayPronunciation,
    PlayItem {
        item: usize,
    },
    ShowStrokeOrder {
        item: usize,
        char_index: usize,
        rect: Rect,
    },
    StrokeCommand {
        command: WriterCommand,
    },
    CloseStrokeOrder,
    DragStart {
        overlay: OverlayKind,
        pointer: Point,
    },
    AudioFinished {
        target: AudioTarget,
    },
    AudioFailed {
        target: AudioTarget,
        error: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayKind {
    Translation,
    StrokeOrder,
    Toast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "target")]
pub enum AudioTarget {
    /// Whole selection of a popup session
    Full { session: u64 },
    /// One translation unit, by index into the full item list
    Item { session: u64, item: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriterCommand {
    Animate,
    Quiz,
}

/// One aligned chunk of the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationUnit {
    pub chinese: String,
    pub pinyin: Vec<String>,
    pub english: String,
}

impl TranslationUnit {
    pub fn char_count(&self) -> usize {
        self.chinese.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationResult {
    pub full_translation: String,
    pub tuples: Vec<TranslationUnit>,
}

/// Text selected on the page at mouse-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSelection {
    pub text: String,
    #[serde(default)]
    pub rect: Option<Rect>,
    /// Where the mouse-up happened, when the source knows it
    #[serde(default)]
    pub pointer: Option<Point>,
}

impl CharacterSelection {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rect: None,
            pointer: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Viewport-relative rectangle, like a DOM bounding client rect
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub scroll_x: f64,
    #[serde(default)]
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn scrolled(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }
}
