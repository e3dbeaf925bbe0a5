pub mod dictionary;
pub mod drag;
pub mod geometry;
pub mod language;
pub mod pagination;
pub mod preprocess;
pub mod selection;
pub mod state;
