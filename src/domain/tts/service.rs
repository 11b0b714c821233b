use super::dto::SynthesizeRequest;
use super::error::TtsServiceError;
use super::model::{SpeechRequest, Voice, VoiceSelector, DEFAULT_LANGUAGE_CODE};
use crate::infrastructure::repositories::{AudioFileRepository, SpeechRepository};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsSynthesisResult {
    /// Web path of the stored file, e.g. `/audio/speech-1700000000000.mp3`
    pub audio_path: String,
    pub bytes_written: usize,
}

pub struct TtsService {
    speech_repo: Arc<dyn SpeechRepository>,
    audio_repo: Arc<AudioFileRepository>,
}

impl TtsService {
    pub fn new(speech_repo: Arc<dyn SpeechRepository>, audio_repo: Arc<AudioFileRepository>) -> Self {
        Self {
            speech_repo,
            audio_repo,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text and store the audio in the output directory
    ///
    /// This operation:
    /// - Validates the text and applies defaults (en-US, NEUTRAL, MP3)
    /// - Calls the speech provider once
    /// - Writes the returned bytes to a new timestamped file
    ///
    /// Returns the web path under which the file is served
    async fn synthesize(
        &self,
        request: SynthesizeRequest,
    ) -> Result<TtsSynthesisResult, TtsServiceError>;

    /// List the provider's voices, optionally filtered by language code
    async fn list_voices(&self, language_code: Option<String>) -> Result<Vec<Voice>, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        request: SynthesizeRequest,
    ) -> Result<TtsSynthesisResult, TtsServiceError> {
        let speech_request = build_speech_request(request)?;

        tracing::info!(
            provider = self.speech_repo.provider_name(),
            text_length = speech_request.text.len(),
            voice = ?speech_request.voice,
            audio_encoding = %speech_request.audio_encoding,
            "TTS synthesis request"
        );

        let start_time = std::time::Instant::now();
        let audio_data = self
            .speech_repo
            .synthesize(&speech_request)
            .await
            .map_err(|e| TtsServiceError::Synthesis(e.to_string()))?;

        tracing::info!(
            provider = self.speech_repo.provider_name(),
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_data.len(),
            "Speech provider returned audio"
        );

        let bytes_written = audio_data.len();
        let audio_path = self
            .audio_repo
            .save(&audio_data, speech_request.audio_encoding)
            .await
            .map_err(|e| TtsServiceError::Synthesis(e.to_string()))?;

        Ok(TtsSynthesisResult {
            audio_path,
            bytes_written,
        })
    }

    async fn list_voices(&self, language_code: Option<String>) -> Result<Vec<Voice>, TtsServiceError> {
        let language_code = language_code.filter(|code| !code.trim().is_empty());

        let voices = self
            .speech_repo
            .list_voices(language_code.as_deref())
            .await
            .map_err(|e| TtsServiceError::VoiceListing(e.to_string()))?;

        tracing::info!(
            provider = self.speech_repo.provider_name(),
            language_code = ?language_code,
            voice_count = voices.len(),
            "Voices listed"
        );

        Ok(voices)
    }
}

/// Validate a synthesis request and resolve its voice selector.
///
/// An explicit voice name wins over language and gender. Empty optional
/// strings are treated as absent.
pub fn build_speech_request(request: SynthesizeRequest) -> Result<SpeechRequest, TtsServiceError> {
    let text = match request.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(TtsServiceError::Invalid("Text is required".to_string())),
    };

    let voice = match request.voice_name.filter(|name| !name.trim().is_empty()) {
        Some(name) => VoiceSelector::Named(name),
        None => VoiceSelector::Language {
            language_code: request
                .language_code
                .filter(|code| !code.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string()),
            gender: request.ssml_gender.unwrap_or_default(),
        },
    };

    Ok(SpeechRequest {
        text,
        voice,
        audio_encoding: request.audio_encoding.unwrap_or_default(),
    })
}
