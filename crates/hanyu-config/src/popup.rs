use serde::{Deserialize, Serialize};

fn default_max_chars() -> usize {
    150
}

fn default_min_items_per_page() -> usize {
    3
}

fn default_rows_per_page() -> usize {
    2
}

fn default_item_gap() -> f64 {
    15.0
}

fn default_container_padding() -> f64 {
    40.0
}

fn default_edge_margin() -> f64 {
    10.0
}

fn default_anchor_offset() -> f64 {
    5.0
}

fn default_stroke_anchor_offset() -> f64 {
    10.0
}

fn default_max_popup_width() -> f64 {
    1000.0
}

fn default_min_popup_width() -> f64 {
    300.0
}

fn default_toast_ms() -> u64 {
    1500
}

fn default_error_revert_ms() -> u64 {
    1000
}

fn default_reposition_debounce_ms() -> u64 {
    16
}

fn default_writer_size() -> u32 {
    200
}

/// Layout and timing of the in-page overlays
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PopupConfig {
    /// Longest selection that is sent for translation
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_min_items_per_page")]
    pub min_items_per_page: usize,
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    /// Gap between translation items, added to each measured item width
    #[serde(default = "default_item_gap")]
    pub item_gap: f64,
    #[serde(default = "default_container_padding")]
    pub container_padding: f64,
    /// Minimum distance kept from the viewport edges
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f64,
    /// Gap between the selection and the translation popup
    #[serde(default = "default_anchor_offset")]
    pub anchor_offset: f64,
    /// Gap between a clicked glyph and the stroke-order popup
    #[serde(default = "default_stroke_anchor_offset")]
    pub stroke_anchor_offset: f64,
    #[serde(default = "default_max_popup_width")]
    pub max_popup_width: f64,
    #[serde(default = "default_min_popup_width")]
    pub min_popup_width: f64,
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
    /// How long a failed speaker button shows its error glyph
    #[serde(default = "default_error_revert_ms")]
    pub error_revert_ms: u64,
    #[serde(default = "default_reposition_debounce_ms")]
    pub reposition_debounce_ms: u64,
    /// Stroke-order canvas edge in pixels
    #[serde(default = "default_writer_size")]
    pub writer_size: u32,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            min_items_per_page: default_min_items_per_page(),
            rows_per_page: default_rows_per_page(),
            item_gap: default_item_gap(),
            container_padding: default_container_padding(),
            edge_margin: default_edge_margin(),
            anchor_offset: default_anchor_offset(),
            stroke_anchor_offset: default_stroke_anchor_offset(),
            max_popup_width: default_max_popup_width(),
            min_popup_width: default_min_popup_width(),
            toast_ms: default_toast_ms(),
            error_revert_ms: default_error_revert_ms(),
            reposition_debounce_ms: default_reposition_debounce_ms(),
            writer_size: default_writer_size(),
        }
    }
}
