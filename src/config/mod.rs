use std::env;

/// Full application configuration, assembled once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub groq: GroqConfig,
    pub storage: StorageConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            groq: GroqConfig::from_env(),
            storage: StorageConfig::from_env(),
            pipeline: PipelineConfig::from_env(),
        }
    }
}

/// Configuration for the Groq OpenAI-compatible inference API.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key. When absent, every inference endpoint answers 500.
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API (default: Groq cloud)
    pub base_url: String,

    /// Speech-to-text model (default: "whisper-large-v3")
    pub transcription_model: String,

    /// Chat completion model for translation and scoring
    /// (default: "llama-3.3-70b-versatile")
    pub chat_model: String,

    /// Scoring prompt variant: "summary", "weighted" or
    /// "translate-and-score" (default: "summary")
    pub scoring_mode: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            transcription_model: "whisper-large-v3".to_string(),
            chat_model: "llama-3.3-70b-versatile".to_string(),
            scoring_mode: "summary".to_string(),
        }
    }
}

impl GroqConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            api_key: env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),

            base_url: env::var("GROQ_BASE_URL").unwrap_or(default.base_url),

            transcription_model: env::var("GROQ_TRANSCRIPTION_MODEL")
                .unwrap_or(default.transcription_model),

            chat_model: env::var("GROQ_CHAT_MODEL").unwrap_or(default.chat_model),

            scoring_mode: env::var("SCORING_MODE").unwrap_or(default.scoring_mode),
        }
    }
}

/// Configuration for the S3-compatible media store and its CDN front.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    pub endpoint: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,

    /// Public base URL used to build object links (no trailing slash)
    pub cdn_base_url: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let endpoint = env::var("MEDIA_S3_ENDPOINT").unwrap_or_default();

        Self {
            region: env::var("MEDIA_S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            // Providers hand out bare hostnames; normalize to an URL.
            endpoint: if endpoint.starts_with("http") {
                endpoint
            } else {
                format!("https://{}", endpoint)
            },
            bucket: env::var("MEDIA_S3_BUCKET").unwrap_or_default(),
            access_key_id: env::var("MEDIA_S3_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: env::var("MEDIA_S3_SECRET_ACCESS_KEY").unwrap_or_default(),
            cdn_base_url: env::var("MEDIA_CDN_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }
}

/// Knobs for the transcription pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum request body size in bytes (default: 64 MB)
    pub max_upload_size: usize,

    /// Staged files at/above this size get re-encoded before
    /// transcription (default: 20 MB)
    pub compression_threshold: u64,

    /// Target audio bitrate handed to FFmpeg (default: "64k")
    pub target_bitrate: String,

    /// FFmpeg binary (default: "ffmpeg", resolved via PATH)
    pub ffmpeg_path: String,

    /// Scratch directory for staged uploads (default: system temp dir)
    pub scratch_dir: std::path::PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 64 * 1024 * 1024,
            compression_threshold: 20 * 1024 * 1024,
            target_bitrate: "64k".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            scratch_dir: env::temp_dir(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            compression_threshold: env::var("COMPRESSION_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.compression_threshold),

            target_bitrate: env::var("COMPRESSION_BITRATE").unwrap_or(default.target_bitrate),

            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or(default.ffmpeg_path),

            scratch_dir: env::var("SCRATCH_DIR")
                .map(std::path::PathBuf::from)
                .unwrap_or(default.scratch_dir),
        }
    }
}
