use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use hanyu_types::{AudioTarget, OverlayKind, Point, Size, Viewport, WriterCommand};
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

use crate::render::{ItemView, StrokeStatus, StrokeView, TranslationBody, TranslationView};
use crate::stroke::{WriterOptions, WriterRenderer};
use crate::view::{OverlayView, Playback};

/// Pixel size of one terminal cell, used to answer layout questions in the
/// same units a page would
const CELL: Size = Size {
    width: 8.0,
    height: 16.0,
};

/// Draws overlays as text blocks on a terminal
pub struct TerminalView<W: Write + Send> {
    out: W,
    columns: u16,
    audio_dir: Option<PathBuf>,
    sizes: HashMap<OverlayKind, Size>,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, columns: u16) -> Self {
        Self {
            out,
            columns,
            audio_dir: None,
            sizes: HashMap::new(),
        }
    }

    /// Write pronunciations as WAV files into `dir`
    pub fn with_audio_dir(mut self, dir: PathBuf) -> Self {
        self.audio_dir = Some(dir);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Viewport of a `columns` x `rows` terminal in layout units
    pub fn viewport(columns: u16, rows: u16) -> Viewport {
        Viewport::new(columns as f64 * CELL.width, rows as f64 * CELL.height)
    }

    fn draw(&mut self, kind: OverlayKind, lines: &[String]) {
        let width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        self.sizes.insert(
            kind,
            Size::new(
                (width + 4) as f64 * CELL.width,
                (lines.len() + 2) as f64 * CELL.height,
            ),
        );

        let border = "─".repeat(width + 2);
        let mut block = format!("┌{border}┐\n");
        for line in lines {
            let pad = " ".repeat(width - line.width());
            block.push_str(&format!("│ {line}{pad} │\n"));
        }
        block.push_str(&format!("└{border}┘\n"));

        if let Err(e) = self.out.write_all(block.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to draw {:?}: {}", kind, e);
        }
    }
}

/// `1. 你 nǐ  好 hǎo  🔊  hello`
fn item_line(item: &ItemView) -> String {
    let glyphs = item
        .glyphs
        .iter()
        .map(|g| {
            if g.pinyin.is_empty() {
                g.character.to_string()
            } else {
                format!("{} {}", g.character, g.pinyin)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    let english = if item.english_visible {
        item.english.as_str()
    } else {
        "…"
    };

    format!("{}. {}  {}  {}", item.index + 1, glyphs, item.speaker.glyph(), english)
}

fn translation_lines(view: &TranslationView) -> Vec<String> {
    let mut lines = vec![view.text.clone(), String::new()];

    match &view.body {
        TranslationBody::Loading => lines.push("Translating...".to_string()),
        TranslationBody::Failed(error) => lines.push(error.clone()),
        TranslationBody::Ready {
            page,
            full_translation,
            full_translation_visible,
        } => {
            lines.extend(page.items.iter().map(item_line));
            if page.controls.visible {
                let prev = if page.controls.prev_enabled { "←" } else { " " };
                let next = if page.controls.next_enabled { "→" } else { " " };
                lines.push(format!("{prev} {} {next}", page.controls.label));
            }
            lines.push(String::new());
            if *full_translation_visible {
                lines.push(format!("\"{full_translation}\""));
            } else {
                lines.push("[Show full translation]".to_string());
            }
        }
    }

    let button = if view.audio.enabled() {
        format!("[{}]", view.audio.label())
    } else {
        view.audio.label().to_string()
    };
    lines.push(button);
    lines
}

fn stroke_lines(view: &StrokeView) -> Vec<String> {
    let mut lines = vec![format!("{}  ×", view.character)];

    match &view.status {
        StrokeStatus::Loading => lines.push("Loading strokes...".to_string()),
        StrokeStatus::Ready => lines.push("[Animate Strokes] [Practice Writing]".to_string()),
        StrokeStatus::Failed(error) => {
            lines.push("Unable to load stroke order animation".to_string());
            lines.push(error.clone());
        }
    }

    if let Some(analysis) = &view.analysis {
        lines.push(String::new());
        if !analysis.readings.is_empty() {
            lines.push(format!("Pinyin: {}", analysis.readings.join(", ")));
        }
        lines.push(format!("Radical: {}", analysis.radical));
        lines.push(format!("Components: {}", analysis.decomposition));
        if let Some(hint) = &analysis.hint {
            lines.push(format!("Hint: {hint}"));
        }
        if let Some(definition) = &analysis.definition {
            lines.push(format!("Meaning: {definition}"));
        }
    }

    lines
}

impl<W: Write + Send> OverlayView for TerminalView<W> {
    fn render_translation(&mut self, view: &TranslationView) {
        let lines = translation_lines(view);
        self.draw(OverlayKind::Translation, &lines);
    }

    fn render_stroke(&mut self, view: &StrokeView) {
        let lines = stroke_lines(view);
        self.draw(OverlayKind::StrokeOrder, &lines);
    }

    fn show_toast(&mut self, message: &str) {
        let lines: Vec<String> = message.lines().map(str::to_string).collect();
        self.draw(OverlayKind::Toast, &lines);
    }

    fn hide_toast(&mut self) {
        self.sizes.remove(&OverlayKind::Toast);
    }

    fn remove(&mut self, kind: OverlayKind) {
        self.sizes.remove(&kind);
        tracing::debug!("{:?} closed", kind);
    }

    fn place(&mut self, kind: OverlayKind, at: Point) {
        tracing::trace!("{:?} placed at ({}, {})", kind, at.x, at.y);
    }

    fn measure_item(&mut self, item: &ItemView) -> Option<f64> {
        Some(item_line(item).width() as f64 * CELL.width)
    }

    fn container_width(&mut self) -> Option<f64> {
        Some(self.columns as f64 * CELL.width)
    }

    fn element_size(&mut self, kind: OverlayKind) -> Option<Size> {
        self.sizes.get(&kind).copied()
    }

    fn play_audio(&mut self, target: AudioTarget, wav: &[u8]) -> Playback {
        let Some(dir) = &self.audio_dir else {
            return Playback::Failed("No audio output configured".to_string());
        };

        let name = match target {
            AudioTarget::Full { .. } => "pronunciation.wav".to_string(),
            AudioTarget::Item { item, .. } => format!("pronunciation-{}.wav", item + 1),
        };
        let path = dir.join(name);

        match std::fs::write(&path, wav) {
            Ok(()) => {
                tracing::info!("Pronunciation written to {}", path.display());
                Playback::Finished
            }
            Err(e) => Playback::Failed(e.to_string()),
        }
    }

    fn set_pointer_capture(&mut self, captured: bool) {
        tracing::trace!("Pointer capture: {}", captured);
    }
}

/// Stroke-order renderer for terminals: logs what a canvas would animate
#[derive(Default)]
pub struct TerminalWriterHost {
    writers: HashMap<Uuid, char>,
}

impl WriterRenderer for TerminalWriterHost {
    fn create(&mut self, writer_id: Uuid, character: char, options: &WriterOptions) -> Result<(), String> {
        tracing::debug!("Writer {} for {} ({}x{})", writer_id, character, options.width, options.height);
        self.writers.insert(writer_id, character);
        Ok(())
    }

    fn command(&mut self, writer_id: Uuid, command: WriterCommand) {
        match self.writers.get(&writer_id) {
            Some(character) => tracing::info!("Stroke order {:?} for {}", command, character),
            None => tracing::debug!("Command for unknown writer {}", writer_id),
        }
    }

    fn cleanup(&mut self, writer_id: Uuid) {
        self.writers.remove(&writer_id);
    }
}
