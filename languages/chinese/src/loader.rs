use std::path::Path;

use hanyu_core::dictionary::LoadError;

use crate::dictionary::HanziDictionary;

pub struct HanziLoader;

impl HanziLoader {
    /// Load the character data bundled with the binary.
    ///
    /// The bundled file is a small sample of common characters. Full data is
    /// a `dictionary.txt` in the same record format, listed in
    /// `dictionary.additional_paths` and merged over the sample.
    pub fn load_embedded() -> HanziDictionary {
        let data = include_str!("../data/dictionary.txt");
        tracing::info!("Loading embedded character dictionary...");
        let dict = HanziDictionary::from_ndjson(data);
        tracing::info!("Loaded {} character entries", dict.entry_count());
        dict
    }

    /// Load a line-delimited JSON file
    pub fn load_from_file(path: &Path) -> Result<HanziDictionary, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }

        tracing::info!("Loading character dictionary from file: {}", path.display());
        let data = std::fs::read_to_string(path)?;
        let dict = HanziDictionary::from_ndjson(&data);
        if dict.skipped() > 0 {
            tracing::warn!(
                "{} malformed records skipped in {}",
                dict.skipped(),
                path.display()
            );
        }
        tracing::info!("Loaded {} character entries from file", dict.entry_count());
        Ok(dict)
    }

    /// Embedded data with `additional_paths` merged over it, in order
    pub fn load_with_additional(additional_paths: &[String]) -> HanziDictionary {
        let mut dict = Self::load_embedded();

        for path in additional_paths {
            match Self::load_from_file(Path::new(path)) {
                Ok(additional) => {
                    tracing::info!("Merging additional dictionary from: {}", path);
                    dict = dict.merge(additional);
                }
                Err(e) => {
                    tracing::warn!("Failed to load dictionary from {}: {}", path, e);
                }
            }
        }

        dict
    }
}

#[cfg(test)]
mod tests {
    use hanyu_core::dictionary::Dictionary;

    use super::*;

    #[test]
    fn embedded_data_parses_cleanly() {
        let dict = HanziLoader::load_embedded();
        assert_eq!(dict.skipped(), 0);
        assert!(dict.entry_count() >= 20);
        assert_eq!(dict.lookup('好').unwrap().decomposition, "⿰女子");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = HanziLoader::load_from_file(Path::new("/nonexistent/hanzi.txt")).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }

    #[test]
    fn unreadable_additional_paths_are_skipped() {
        let dict = HanziLoader::load_with_additional(&["/nonexistent/hanzi.txt".to_string()]);
        assert_eq!(dict.entry_count(), HanziLoader::load_embedded().entry_count());
    }
}
