//! Numbered pinyin (`hao3`) to tone-marked pinyin (`hǎo`).

const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'ü'];

/// Glyphs for tones 1-4 and the unmarked neutral tone
fn marks(vowel: char) -> Option<[char; 5]> {
    let table = match vowel {
        'a' => ['ā', 'á', 'ǎ', 'à', 'a'],
        'e' => ['ē', 'é', 'ě', 'è', 'e'],
        'i' => ['ī', 'í', 'ǐ', 'ì', 'i'],
        'o' => ['ō', 'ó', 'ǒ', 'ò', 'o'],
        'u' => ['ū', 'ú', 'ǔ', 'ù', 'u'],
        'ü' => ['ǖ', 'ǘ', 'ǚ', 'ǜ', 'ü'],
        _ => return None,
    };
    Some(table)
}

/// Trailing tone digit 1-5, if any
fn tone_digit(syllable: &str) -> Option<u8> {
    syllable
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .filter(|d| (1..=5).contains(d))
        .map(|d| d as u8)
}

/// Convert one numbered syllable.
///
/// Input without a trailing tone digit comes back unchanged. `v` stands in
/// for `ü`. Tone 5 (neutral) strips the digit without adding a mark.
pub fn convert(syllable: &str) -> String {
    let Some(tone) = tone_digit(syllable) else {
        return syllable.to_string();
    };
    let index = usize::from(tone - 1);

    let word: String = syllable[..syllable.len() - 1].replace('v', "ü");
    let vowels: Vec<char> = word.chars().filter(|c| VOWELS.contains(c)).collect();

    let target = match vowels.as_slice() {
        [] => return word,
        [only] => *only,
        _ if word.contains('a') => 'a',
        _ if word.contains('e') => 'e',
        _ if word.contains("ou") => 'o',
        [.., last] => *last,
    };

    match marks(target) {
        Some(table) => word.replacen(target, &table[index].to_string(), 1),
        None => word,
    }
}
