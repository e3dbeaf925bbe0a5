use std::collections::HashMap;

use hanyu_core::dictionary::{CharacterInfo, Dictionary, DictionaryMetadata, Etymology, LoadError};
use serde::Deserialize;

// One line of the character data file (makemeahanzi-style records)
#[derive(Debug, Deserialize)]
struct HanziJson {
    character: String,
    #[serde(default)]
    radical: String,
    #[serde(default)]
    decomposition: String,
    #[serde(default)]
    etymology: Option<EtymologyJson>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    pinyin: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EtymologyJson {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    semantic: Option<String>,
}

/// Character dictionary keyed by single character
#[derive(Debug, Default)]
pub struct HanziDictionary {
    entries: HashMap<char, CharacterInfo>,
    skipped: usize,
}

impl HanziDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse line-delimited JSON. Blank lines are ignored; malformed lines
    /// are skipped and counted. A later line for the same character wins.
    pub fn from_ndjson(data: &str) -> Self {
        let mut dict = Self::new();

        for (number, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match parse_line(number + 1, line) {
                Ok(info) => {
                    dict.entries.insert(info.character, info);
                }
                Err(e) => {
                    tracing::warn!("Skipping dictionary record: {}", e);
                    dict.skipped += 1;
                }
            }
        }

        dict
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Records rejected while parsing
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Merge another dictionary into this one, `other` overriding duplicates
    pub fn merge(mut self, other: HanziDictionary) -> Self {
        self.skipped += other.skipped;
        self.entries.extend(other.entries);
        self
    }
}

fn parse_line(line: usize, raw: &str) -> Result<CharacterInfo, LoadError> {
    let record: HanziJson = serde_json::from_str(raw).map_err(|e| LoadError::ParseError {
        line,
        message: e.to_string(),
    })?;

    let mut chars = record.character.chars();
    let character = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(LoadError::ParseError {
                line,
                message: format!("expected one character, got {:?}", record.character),
            });
        }
    };

    Ok(CharacterInfo {
        character,
        radical: record.radical,
        decomposition: record.decomposition,
        etymology: record.etymology.map(|e| Etymology {
            kind: e.kind,
            hint: e.hint,
            phonetic: e.phonetic,
            semantic: e.semantic,
        }),
        definition: record.definition,
        readings: record.pinyin,
    })
}

impl Dictionary for HanziDictionary {
    fn lookup(&self, character: char) -> Option<CharacterInfo> {
        self.entries.get(&character).cloned()
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "Hanzi".to_string(),
            language: "zh".to_string(),
            entry_count: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_and_skips_bad_lines() {
        let data = concat!(
            r#"{"character":"你","radical":"亻","decomposition":"⿰亻尔","etymology":{"type":"pictophonetic","hint":"person"}}"#,
            "\n\n",
            "not json\n",
            r#"{"character":"你好","radical":"亻","decomposition":"?"}"#,
            "\n",
            r#"{"character":"山","radical":"山","decomposition":"？"}"#,
            "\n",
        );
        let dict = HanziDictionary::from_ndjson(data);
        assert_eq!(dict.entry_count(), 2);
        assert_eq!(dict.skipped(), 2);

        let ni = dict.lookup('你').unwrap();
        assert_eq!(ni.radical, "亻");
        let etymology = ni.etymology.unwrap();
        assert_eq!(etymology.hint.as_deref(), Some("person"));
        assert_eq!(etymology.kind.as_deref(), Some("pictophonetic"));

        assert!(dict.lookup('山').unwrap().etymology.is_none());
        assert!(dict.lookup('水').is_none());
    }

    #[test]
    fn merge_overrides_duplicates() {
        let base = HanziDictionary::from_ndjson(r#"{"character":"山","radical":"old","decomposition":"？"}"#);
        let extra = HanziDictionary::from_ndjson(r#"{"character":"山","radical":"山","decomposition":"？"}"#);
        let merged = base.merge(extra);
        assert_eq!(merged.entry_count(), 1);
        assert_eq!(merged.lookup('山').unwrap().radical, "山");
    }
}
