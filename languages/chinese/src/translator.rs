use hanyu_config::translator::TranslatorConfig;
use hanyu_translator::{
    AudioClip, PronounceMode, Pronouncer, TranslateError, Translator,
};
use hanyu_types::TranslationResult;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::alignment;
use crate::prompt;

/// Chat-completions client for structured translation and spoken audio.
///
/// Cheap to build per request: the `reqwest::Client` is shared.
#[derive(Clone)]
pub struct OpenAiTranslator {
    client: reqwest::Client,
    config: TranslatorConfig,
    api_key: Option<String>,
}

impl OpenAiTranslator {
    pub fn new(config: TranslatorConfig, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), config, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        config: TranslatorConfig,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            config,
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str, TranslateError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(TranslateError::MissingApiKey),
        }
    }

    async fn post(&self, body: &Value) -> Result<ChatResponse, TranslateError> {
        let key = self.api_key()?;

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<ChatResponse>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => {
                tracing::error!("Unreadable API response: {}", e);
                Err(TranslateError::Schema(format!("Unreadable API response: {e}")))
            }
            Err(_) => Err(TranslateError::Api(format!("API request failed: {status}"))),
        }
    }

    pub fn translation_body(&self, text: &str) -> Value {
        json!({
            "model": self.config.translate_model,
            "messages": [
                { "role": "system", "content": prompt::TRANSLATION_SYSTEM_PROMPT },
                { "role": "user", "content": text }
            ],
            "functions": [prompt::translation_function()],
            "function_call": { "name": prompt::TRANSLATION_FUNCTION },
            "temperature": self.config.temperature
        })
    }

    pub fn pronounce_body(&self, text: &str, mode: PronounceMode) -> Value {
        let system = match mode {
            PronounceMode::Full => prompt::PRONOUNCE_SYSTEM_PROMPT,
            PronounceMode::Partial => prompt::PRONOUNCE_PARTIAL_SYSTEM_PROMPT,
        };

        json!({
            "model": self.config.audio_model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": text }
            ],
            "modalities": ["text", "audio"],
            "audio": {
                "voice": self.config.voice,
                "format": self.config.audio_format
            }
        })
    }
}

#[async_trait::async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str) -> Result<TranslationResult, TranslateError> {
        tracing::debug!("Requesting translation for {} characters", text.chars().count());
        let response = self.post(&self.translation_body(text)).await?;
        interpret_translation(response)
    }
}

#[async_trait::async_trait]
impl Pronouncer for OpenAiTranslator {
    async fn pronounce(&self, text: &str, mode: PronounceMode) -> Result<AudioClip, TranslateError> {
        tracing::debug!("Requesting {:?} pronunciation", mode);
        let response = self.post(&self.pronounce_body(text, mode)).await?;
        interpret_audio(response)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    function_call: Option<FunctionCall>,
    #[serde(default)]
    audio: Option<AudioPayload>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct AudioPayload {
    #[serde(default)]
    data: String,
}

fn first_message(response: ChatResponse) -> Result<Option<ChoiceMessage>, TranslateError> {
    if let Some(error) = response.error {
        tracing::error!("API error: {}", error.message);
        return Err(TranslateError::Api(error.message));
    }

    match response.choices.into_iter().next() {
        Some(choice) => Ok(choice.message),
        None => Err(TranslateError::EmptyResponse("No response from API".to_string())),
    }
}

/// Turn a chat response into aligned translation units
pub fn interpret_translation(response: ChatResponse) -> Result<TranslationResult, TranslateError> {
    let arguments = first_message(response)?
        .and_then(|m| m.function_call)
        .map(|call| call.arguments)
        .filter(|args| !args.is_empty())
        .ok_or_else(|| TranslateError::EmptyResponse("No function call in response.".to_string()))?;

    let mut result: TranslationResult = serde_json::from_str(&arguments).map_err(|e| {
        tracing::error!("Function arguments did not match schema: {}", e);
        TranslateError::Schema("Failed to parse function arguments.".to_string())
    })?;

    for misalignment in alignment::repair(&mut result) {
        tracing::warn!(
            "Pinyin misaligned for unit {} {:?}: {} characters, {} syllables",
            misalignment.index,
            misalignment.chinese,
            misalignment.characters,
            misalignment.syllables
        );
    }
    Ok(result)
}

/// Pull the base64 audio out of a chat response
pub fn interpret_audio(response: ChatResponse) -> Result<AudioClip, TranslateError> {
    let no_audio = || TranslateError::EmptyResponse("No audio data from API".to_string());

    let message = match first_message(response) {
        Err(TranslateError::EmptyResponse(_)) => return Err(no_audio()),
        other => other?,
    };

    message
        .and_then(|m| m.audio)
        .map(|audio| audio.data)
        .filter(|data| !data.is_empty())
        .map(AudioClip::new)
        .ok_or_else(no_audio)
}

#[cfg(test)]
mod tests {
    use hanyu_types::ErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn parse(raw: &str) -> ChatResponse {
        serde_json::from_str(raw).unwrap()
    }

    /// Answer a single request with a canned status line and body
    async fn serve_once(status: &'static str, body: &'static str) -> TranslatorConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        TranslatorConfig {
            api_url: format!("http://{addr}/v1/chat/completions"),
            ..TranslatorConfig::default()
        }
    }

    fn local_translator(config: TranslatorConfig) -> OpenAiTranslator {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        OpenAiTranslator::with_client(client, config, Some("sk-test".into()))
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..end]);
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= end + 4 + length
    }

    #[tokio::test]
    async fn error_status_with_json_body_surfaces_api_message() {
        let config = serve_once(
            "401 Unauthorized",
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        )
        .await;
        let translator = local_translator(config);

        let err = translator.translate("你好").await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect API key provided");
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn error_status_with_plain_body_reports_the_status() {
        let config = serve_once("502 Bad Gateway", "<html>upstream down</html>").await;
        let translator = local_translator(config);

        let err = translator
            .pronounce("你好", PronounceMode::Full)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API request failed: 502 Bad Gateway");
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn unreadable_success_body_is_a_schema_error() {
        let config = serve_once("200 OK", "not json").await;
        let translator = local_translator(config);

        let err = translator.translate("你好").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().starts_with("Unreadable API response"));
    }

    #[test]
    fn function_call_becomes_aligned_result() {
        let arguments = json!({
            "full_translation": "Hello",
            "tuples": [{ "chinese": "你好", "pinyin": ["ni3"], "english": "hello" }]
        })
        .to_string();
        let raw = json!({
            "choices": [{ "message": { "function_call": { "name": "extract_translation_data", "arguments": arguments } } }]
        })
        .to_string();

        let result = interpret_translation(parse(&raw)).unwrap();
        assert_eq!(result.full_translation, "Hello");
        assert_eq!(result.tuples[0].pinyin, vec!["ni3", ""]);
    }

    #[test]
    fn api_error_message_is_surfaced() {
        let raw = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let err = interpret_translation(parse(raw)).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect API key provided");
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn missing_pieces_map_to_fixed_messages() {
        let err = interpret_translation(parse(r#"{"choices":[]}"#)).unwrap_err();
        assert_eq!(err.to_string(), "No response from API");

        let err = interpret_translation(parse(r#"{"choices":[{"message":{"content":"hi"}}]}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "No function call in response.");

        let raw = r#"{"choices":[{"message":{"function_call":{"arguments":"{\"tuples\":3}"}}}]}"#;
        let err = interpret_translation(parse(raw)).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse function arguments.");
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn audio_is_taken_from_message() {
        let raw = r#"{"choices":[{"message":{"audio":{"id":"a1","data":"UklGRg=="}}}]}"#;
        assert_eq!(interpret_audio(parse(raw)).unwrap().base64, "UklGRg==");

        for raw in [r#"{"choices":[]}"#, r#"{"choices":[{"message":{"content":"x"}}]}"#] {
            let err = interpret_audio(parse(raw)).unwrap_err();
            assert_eq!(err.to_string(), "No audio data from API");
        }
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let translator = OpenAiTranslator::new(TranslatorConfig::default(), Some("  ".into()));
        let err = translator.translate("你好").await.unwrap_err();
        assert!(matches!(err, TranslateError::MissingApiKey));

        let err = translator
            .pronounce("你好", PronounceMode::Full)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API Key not set");
    }

    #[test]
    fn request_bodies_follow_mode() {
        let translator = OpenAiTranslator::new(TranslatorConfig::default(), None);
        let body = translator.translation_body("你好");
        assert_eq!(body["function_call"]["name"], "extract_translation_data");
        assert_eq!(body["messages"][1]["content"], "你好");

        let partial = translator.pronounce_body("你", PronounceMode::Partial);
        assert_eq!(partial["audio"]["voice"], "alloy");
        assert!(
            partial["messages"][0]["content"]
                .as_str()
                .unwrap()
                .contains("word or phrase")
        );
    }
}
