use hanyu_types::{TranslationResult, TranslationUnit};

/// A unit whose syllable count disagreed with its character count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misalignment {
    pub index: usize,
    pub chinese: String,
    pub characters: usize,
    pub syllables: usize,
}

/// Make every unit carry exactly one syllable per character.
///
/// Missing syllables become empty strings and extra ones are dropped.
/// Returns what was repaired.
pub fn repair(result: &mut TranslationResult) -> Vec<Misalignment> {
    result
        .tuples
        .iter_mut()
        .enumerate()
        .filter_map(|(index, unit)| repair_unit(index, unit))
        .collect()
}

fn repair_unit(index: usize, unit: &mut TranslationUnit) -> Option<Misalignment> {
    let characters = unit.char_count();
    let syllables = unit.pinyin.len();
    if characters == syllables {
        return None;
    }

    unit.pinyin.resize(characters, String::new());

    Some(Misalignment {
        index,
        chinese: unit.chinese.clone(),
        characters,
        syllables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(chinese: &str, pinyin: &[&str]) -> TranslationUnit {
        TranslationUnit {
            chinese: chinese.to_string(),
            pinyin: pinyin.iter().map(|s| s.to_string()).collect(),
            english: String::new(),
        }
    }

    #[test]
    fn pads_and_truncates() {
        let mut result = TranslationResult {
            full_translation: "Hello, I love cats.".to_string(),
            tuples: vec![
                unit("你好", &["ni3", "hao3"]),
                unit("我爱", &["wo3"]),
                unit("猫", &["mao1", "mi1"]),
            ],
        };

        let repaired = repair(&mut result);
        assert_eq!(repaired.len(), 2);
        assert_eq!(repaired[0].index, 1);
        assert_eq!(result.tuples[0].pinyin, vec!["ni3", "hao3"]);
        assert_eq!(result.tuples[1].pinyin, vec!["wo3", ""]);
        assert_eq!(result.tuples[2].pinyin, vec!["mao1"]);
    }
}
