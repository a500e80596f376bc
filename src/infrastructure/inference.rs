use std::sync::Arc;
use tracing::{info, warn};

use crate::config::GroqConfig;
use crate::services::inference::{GroqClient, InferenceClient};

/// Builds the Groq client once at startup. Returns `None` when no API
/// key is configured; inference endpoints answer 500 in that case.
pub fn setup_inference(config: &GroqConfig) -> Option<Arc<dyn InferenceClient>> {
    match config.api_key.clone() {
        Some(api_key) => {
            info!(
                "🧠 Inference: {} (asr={}, chat={})",
                config.base_url, config.transcription_model, config.chat_model
            );
            Some(Arc::new(GroqClient::new(config, api_key)))
        }
        None => {
            warn!("GROQ_API_KEY is missing; inference endpoints will return 500");
            None
        }
    }
}
