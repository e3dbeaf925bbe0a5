use hanyu_types::{AudioTarget, OverlayKind, Point, Size};

use crate::render::{ItemView, StrokeView, TranslationView};

/// What happened when the view was asked to play audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playback {
    /// Playing; the view reports the end with a `UiEvent::AudioFinished`
    /// or `UiEvent::AudioFailed`
    Started,
    /// Played to completion synchronously
    Finished,
    Failed(String),
}

/// The page the overlays live on.
///
/// The controller owns all state; a view only draws what it is given and
/// answers measurement questions about what it drew last.
pub trait OverlayView: Send {
    /// Create or replace the translation popup content
    fn render_translation(&mut self, view: &TranslationView);

    /// Create or replace the stroke-order popup content
    fn render_stroke(&mut self, view: &StrokeView);

    fn show_toast(&mut self, message: &str);

    fn hide_toast(&mut self);

    /// Tear an overlay down
    fn remove(&mut self, kind: OverlayKind);

    /// Move an overlay's top-left corner, in its own coordinate space
    fn place(&mut self, kind: OverlayKind, at: Point);

    /// Rendered width of one translation item, if it can be measured
    fn measure_item(&mut self, item: &ItemView) -> Option<f64>;

    /// Inner width of the translation item container
    fn container_width(&mut self) -> Option<f64>;

    fn element_size(&mut self, kind: OverlayKind) -> Option<Size>;

    fn play_audio(&mut self, target: AudioTarget, wav: &[u8]) -> Playback;

    /// Route all pointer events to the controller while a drag is active
    fn set_pointer_capture(&mut self, captured: bool);
}
