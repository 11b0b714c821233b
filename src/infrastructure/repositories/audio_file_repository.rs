use crate::domain::tts::AudioEncoding;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::io::AsyncWriteExt;

/// URL prefix under which the output directory is served
pub const AUDIO_ROUTE_PREFIX: &str = "/audio";

/// How many fresh stamps to try when a file name is already taken
const MAX_CREATE_ATTEMPTS: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum AudioStorageError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write audio file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not find a free file name in {0}")]
    NameExhausted(PathBuf),
}

/// Stores synthesized audio as `speech-<epoch-millis>.<ext>` files
pub struct AudioFileRepository {
    output_dir: PathBuf,
    last_stamp: AtomicI64,
}

impl AudioFileRepository {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            last_stamp: AtomicI64::new(0),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it does not exist yet
    pub async fn ensure_output_dir(&self) -> Result<(), AudioStorageError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| AudioStorageError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })
    }

    /// Write audio bytes to a new file and return its web path
    /// (`/audio/<filename>`).
    pub async fn save(
        &self,
        audio: &[u8],
        encoding: AudioEncoding,
    ) -> Result<String, AudioStorageError> {
        self.ensure_output_dir().await?;

        for _ in 0..MAX_CREATE_ATTEMPTS {
            let filename = format!("speech-{}.{}", self.next_stamp(), encoding.file_extension());
            let path = self.output_dir.join(&filename);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "Audio file name taken, retrying");
                    continue;
                }
                Err(source) => return Err(AudioStorageError::Write { path, source }),
            };

            let written = async {
                file.write_all(audio).await?;
                file.flush().await
            }
            .await;

            if let Err(source) = written {
                return Err(AudioStorageError::Write { path, source });
            }

            tracing::info!(
                path = %path.display(),
                audio_size_bytes = audio.len(),
                "Audio file written"
            );

            return Ok(format!("{}/{}", AUDIO_ROUTE_PREFIX, filename));
        }

        Err(AudioStorageError::NameExhausted(self.output_dir.clone()))
    }

    /// Map a web path returned by [`save`](Self::save) back to the file on disk
    pub fn resolve(&self, web_path: &str) -> Option<PathBuf> {
        let filename = web_path
            .strip_prefix(AUDIO_ROUTE_PREFIX)?
            .strip_prefix('/')?;

        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return None;
        }

        Some(self.output_dir.join(filename))
    }

    /// Millisecond wall-clock stamp, strictly increasing per repository
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_stamp.load(Ordering::Relaxed);

        loop {
            let next = if now > last { now } else { last + 1 };
            match self
                .last_stamp
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}
