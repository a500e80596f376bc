use anyhow::{Context, Result};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Writes uploaded bytes into a scratch directory under unique names
/// so concurrent requests never collide. Uniqueness comes from naming
/// alone; there is no locking.
#[derive(Debug, Clone)]
pub struct BlobStager {
    scratch_dir: PathBuf,
}

impl BlobStager {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Persists `data` to a uniquely named file in the scratch area.
    /// Write failures are fatal; there is no retry.
    pub async fn stage(&self, data: &[u8], suggested_name: &str) -> Result<StagedFile> {
        let name = crate::utils::validation::sanitize_filename(suggested_name)
            .unwrap_or_else(|_| "upload.bin".to_string());

        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        let unique = format!(
            "upload-{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            suffix,
            name
        );
        let path = self.scratch_dir.join(unique);

        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("failed to write staged file {}", path.display()))?;

        tracing::debug!(path = %path.display(), size = data.len(), "staged upload");

        Ok(StagedFile { path: Some(path) })
    }

    /// Reserves a unique path in the scratch area without creating the
    /// file, for steps that produce their own output (e.g. FFmpeg).
    pub fn reserve(&self, extension: &str) -> StagedFile {
        let path = self
            .scratch_dir
            .join(format!("compressed-{}.{}", uuid::Uuid::new_v4(), extension));
        StagedFile { path: Some(path) }
    }
}

/// Handle to one staged file. The file lives at most as long as the
/// handle: `cleanup` removes it explicitly, and dropping the handle
/// removes it best-effort. Cleanup failures are logged and ignored.
#[derive(Debug)]
pub struct StagedFile {
    path: Option<PathBuf>,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.path
            .as_deref()
            .expect("staged file accessed after cleanup")
    }

    pub async fn size(&self) -> Result<u64> {
        let meta = tokio::fs::metadata(self.path()).await?;
        Ok(meta.len())
    }

    /// Deletes the staged file. Safe to call on reserved paths that
    /// were never written.
    pub async fn cleanup(mut self) {
        if let Some(path) = self.path.take() {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "removed staged file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove staged file");
                }
            }
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // Last line of defense when a pipeline unwinds without calling
        // cleanup(). Synchronous on purpose; Drop cannot await.
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove staged file on drop");
                }
            }
        }
    }
}
