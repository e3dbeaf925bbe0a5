use serde_json::{Value, json};

pub const TRANSLATION_FUNCTION: &str = "extract_translation_data";

pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a translation assistant that extracts structured data from Chinese text. Follow these strict rules:
1. Break down the text into meaningful units (words or phrases)
2. For each unit, provide the pinyin with tone numbers (1-4) at the end of each syllable (e.g., 'ni3' for 你, 'hao3' for 好)
3. For each unit, provide the pinyin as an array where each element corresponds to exactly one character
4. Example: for '你好', pinyin should be ['ni3', 'hao3']
5. Include all characters (including particles like 的, 和, 等, and punctuation like 。, ！, ？, ，) either grouped logically or as separate units, BUT ALWAYS INCLUDE EVERY CHARACTER.
6. Ensure the number of pinyin syllables exactly matches the number of Chinese characters in each group
7. Always include the tone number (1-4) at the end of each pinyin syllable, using 5 for neutral tone";

pub const PRONOUNCE_SYSTEM_PROMPT: &str = "You are a reading assistant helping someone to learn Mandarin. Read out the following text in Mandarin and speak slowly. Do not skip any characters, you must always pronounce every single Mandarin character. Never explain anything about the translation, just pronounce the characters.";

pub const PRONOUNCE_PARTIAL_SYSTEM_PROMPT: &str = "You are a reading assistant helping someone to learn Mandarin. Read out the following word or phrase in Mandarin and speak slowly. Do not skip any characters; you must always pronounce every single Mandarin character. Never explain anything about the translation; just pronounce the characters.";

/// Function definition forcing the structured translation payload
pub fn translation_function() -> Value {
    json!({
        "name": TRANSLATION_FUNCTION,
        "description": "Extracts translation data from Chinese text, with pinyin aligned character by character.",
        "parameters": {
            "type": "object",
            "properties": {
                "full_translation": {
                    "type": "string",
                    "description": "Full English translation of the selected Chinese text"
                },
                "tuples": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "chinese": {
                                "type": "string",
                                "description": "Single Chinese character or meaningful group of characters"
                            },
                            "pinyin": {
                                "type": "array",
                                "description": "Array of pinyin syllables, one for each character in the Chinese string",
                                "items": { "type": "string" }
                            },
                            "english": {
                                "type": "string",
                                "description": "English translation of this character or group"
                            }
                        },
                        "required": ["chinese", "pinyin", "english"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["full_translation", "tuples"],
            "additionalProperties": false
        }
    })
}
