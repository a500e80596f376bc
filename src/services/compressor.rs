use thiserror::Error;
use tokio::process::Command;

use crate::config::PipelineConfig;
use crate::services::staging::{BlobStager, StagedFile};

#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("failed to spawn '{binary}': {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    #[error("ffmpeg exited with {status}: {stderr}")]
    Encode { status: String, stderr: String },
}

/// Re-encodes oversized audio at a lower constant bitrate before it is
/// shipped to the transcription API. One attempt, one fixed bitrate
/// target; callers treat failure as non-fatal and keep the original.
#[derive(Debug, Clone)]
pub struct AudioCompressor {
    ffmpeg_path: String,
    target_bitrate: String,
}

impl AudioCompressor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            target_bitrate: config.target_bitrate.clone(),
        }
    }

    /// Runs `ffmpeg -y -i <input> -b:a <bitrate> <output>.mp3` into a
    /// fresh staged path.
    pub async fn compress(
        &self,
        input: &StagedFile,
        stager: &BlobStager,
    ) -> Result<StagedFile, CompressionError> {
        let output = stager.reserve("mp3");

        tracing::debug!(
            input = %input.path().display(),
            output = %output.path().display(),
            bitrate = %self.target_bitrate,
            "compressing audio"
        );

        let result = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input.path())
            .arg("-b:a")
            .arg(&self.target_bitrate)
            .arg(output.path())
            .output()
            .await
            .map_err(|e| CompressionError::Spawn {
                binary: self.ffmpeg_path.clone(),
                source: e,
            });

        let result = match result {
            Ok(out) => out,
            Err(e) => {
                output.cleanup().await;
                return Err(e);
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).to_string();
            output.cleanup().await;
            return Err(CompressionError::Encode {
                status: result.status.to_string(),
                stderr,
            });
        }

        tracing::info!(output = %output.path().display(), "audio compression finished");
        Ok(output)
    }
}
