use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::config::GroqConfig;
use crate::models::FeedbackReport;
use crate::services::prompts::{ScoringMode, TRANSLATOR_PROMPT};

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read audio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("empty response content")]
    EmptyContent,

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Result of a scoring call. `translated_transcript` is only present
/// in translate-and-score mode.
#[derive(Debug, Clone)]
pub struct ScoredFeedback {
    pub report: FeedbackReport,
    pub translated_transcript: Option<String>,
}

/// Remote inference operations the pipeline depends on. Trait object
/// so tests can inject a double.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Speech-to-text for a local audio file.
    async fn transcribe(&self, audio_path: &Path) -> Result<String, InferenceError>;

    /// Translation of free text into the reviewer language.
    async fn translate(&self, text: &str) -> Result<String, InferenceError>;

    /// QA scoring of a transcript under the given template.
    async fn score(
        &self,
        transcript: &str,
        mode: ScoringMode,
    ) -> Result<ScoredFeedback, InferenceError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for Groq's OpenAI-compatible API (Whisper + Llama).
/// Built once at startup and shared across requests.
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    transcription_model: String,
    chat_model: String,
}

impl GroqClient {
    pub fn new(config: &GroqConfig, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transcription_model: config.transcription_model.clone(),
            chat_model: config.chat_model.clone(),
        }
    }

    async fn chat(
        &self,
        system_prompt: &str,
        user_content: &str,
        json_mode: bool,
    ) -> Result<String, InferenceError> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            response_format: json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api { status, body });
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(InferenceError::EmptyContent);
        }

        Ok(content)
    }
}

#[async_trait]
impl InferenceClient for GroqClient {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, InferenceError> {
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.bin".to_string());

        tracing::debug!(
            path = %audio_path.display(),
            model = %self.transcription_model,
            "calling transcription API"
        );

        let file_bytes = tokio::fs::read(audio_path).await?;

        let file_part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.transcription_model.clone());

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api { status, body });
        }

        let transcription: TranscriptionResponse = response.json().await?;
        if transcription.text.trim().is_empty() {
            return Err(InferenceError::EmptyContent);
        }

        tracing::debug!(chars = transcription.text.len(), "transcription received");
        Ok(transcription.text)
    }

    async fn translate(&self, text: &str) -> Result<String, InferenceError> {
        self.chat(TRANSLATOR_PROMPT, text, false).await
    }

    async fn score(
        &self,
        transcript: &str,
        mode: ScoringMode,
    ) -> Result<ScoredFeedback, InferenceError> {
        let content = self.chat(&mode.system_prompt(), transcript, true).await?;
        parse_scoring_response(&content)
    }
}

/// Parses the model's JSON reply into a normalized report. In
/// translate-and-score mode the same object also carries the
/// translated transcript.
fn parse_scoring_response(content: &str) -> Result<ScoredFeedback, InferenceError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| InferenceError::Malformed(format!("not valid JSON: {}", e)))?;

    let translated_transcript = value
        .get("translatedTranscript")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let report: FeedbackReport = serde_json::from_value(value)
        .map_err(|e| InferenceError::Malformed(format!("missing report fields: {}", e)))?;

    Ok(ScoredFeedback {
        report: report.normalize(),
        translated_transcript,
    })
}
