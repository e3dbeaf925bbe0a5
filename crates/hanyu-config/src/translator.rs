use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_translate_model() -> String {
    "gpt-4o".to_string()
}

fn default_audio_model() -> String {
    "gpt-4o-audio-preview".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_audio_format() -> String {
    "wav".to_string()
}

/// Language-model endpoint settings. The API key lives in the settings store.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_translate_model")]
    pub translate_model: String,
    #[serde(default = "default_audio_model")]
    pub audio_model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
    #[serde(default)]
    pub temperature: f32,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let api_url = env::var("HANYU_API_URL").unwrap_or_else(|_| default_api_url());

        Self {
            api_url,
            ..Self::default()
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            translate_model: default_translate_model(),
            audio_model: default_audio_model(),
            voice: default_voice(),
            audio_format: default_audio_format(),
            temperature: 0.0,
        }
    }
}
