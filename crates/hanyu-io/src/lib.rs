pub mod clipboard;
pub mod ws;
