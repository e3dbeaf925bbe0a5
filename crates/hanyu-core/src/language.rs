use crate::dictionary::CharacterInfo;

/// Text processing and lookup interface for language implementations
pub trait LanguageProcessor: Send + Sync {
    /// Normalize selected text before it is checked and sent
    fn normalize(&self, text: &str) -> String;

    /// Whether a selection may start with this character
    fn is_script_char(&self, c: char) -> bool;

    /// Render a raw reading (e.g. `hao3`) for display (e.g. `hǎo`)
    fn display_reading(&self, raw: &str) -> String;

    /// Structural information about one character
    fn lookup_character(&self, c: char) -> Option<CharacterInfo>;
}
