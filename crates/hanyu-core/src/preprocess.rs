use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default selection preprocessor
    fn process(&self, text: &str) -> String {
        let mut text = text.trim().to_string();

        if text.is_empty() {
            return text;
        }

        // Canonical composition only; NFKC would fold full-width punctuation
        text = text.nfc().collect();

        // Selections spanning block elements carry line breaks
        text = text.replace(['\n', '\r'], "").trim().to_string();

        text
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
