pub mod controller;
pub mod render;
pub mod state;
pub mod stroke;
pub mod terminal;
pub mod view;

pub use controller::{Completion, OverlayController, Services};
pub use stroke::{WriterBus, WriterRenderer};
pub use terminal::{TerminalView, TerminalWriterHost};
pub use view::{OverlayView, Playback};

#[cfg(test)]
mod tests;
