use hanyu_core::dictionary::{CharacterInfo, Dictionary, DictionaryMetadata};
use hanyu_core::language::LanguageProcessor;
use hanyu_core::preprocess::{DefaultPreprocessor, Preprocessor};
use hanyu_core::selection::is_cjk_unified;

use crate::dictionary::HanziDictionary;
use crate::loader::HanziLoader;
use crate::tone;

/// Chinese language processor
pub struct ChineseProcessor {
    dictionary: HanziDictionary,
}

impl ChineseProcessor {
    /// Create a processor backed by the embedded dictionary
    pub fn new() -> Self {
        Self::with_additional_dicts(&[])
    }

    /// Create a processor with additional dictionary paths
    pub fn with_additional_dicts(additional_paths: &[String]) -> Self {
        Self {
            dictionary: HanziLoader::load_with_additional(additional_paths),
        }
    }

    /// Processor without dictionary data
    pub fn without_dictionary() -> Self {
        Self {
            dictionary: HanziDictionary::new(),
        }
    }

    pub fn dictionary_metadata(&self) -> DictionaryMetadata {
        self.dictionary.metadata()
    }
}

impl Default for ChineseProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageProcessor for ChineseProcessor {
    fn normalize(&self, text: &str) -> String {
        DefaultPreprocessor.process(text)
    }

    fn is_script_char(&self, c: char) -> bool {
        is_cjk_unified(c)
    }

    fn display_reading(&self, raw: &str) -> String {
        tone::convert(raw)
    }

    fn lookup_character(&self, c: char) -> Option<CharacterInfo> {
        self.dictionary.lookup(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processor_wires_tone_marks_and_dictionary() {
        let processor = ChineseProcessor::new();
        assert_eq!(processor.display_reading("xie4"), "xiè");
        assert!(processor.is_script_char('谢'));
        assert!(!processor.is_script_char('h'));
        assert_eq!(processor.lookup_character('谢').unwrap().radical, "讠");
        assert!(processor.dictionary_metadata().entry_count > 0);
    }

    #[test]
    fn empty_processor_finds_nothing() {
        let processor = ChineseProcessor::without_dictionary();
        assert!(processor.lookup_character('你').is_none());
    }
}
