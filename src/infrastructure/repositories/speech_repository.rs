use crate::domain::tts::{SpeechRequest, Voice};
use async_trait::async_trait;

/// Repository for speech synthesis operations.
/// Abstracts the underlying provider (Google Cloud Text-to-Speech, AWS Polly, ...)
///
/// Implementations make exactly one provider call per operation: no retry,
/// no batching, no caching.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Short provider name used in logs
    fn provider_name(&self) -> &'static str;

    /// Synthesize text to audio bytes in the requested encoding
    ///
    /// # Errors
    /// Returns error if the provider call fails or the response carries no audio
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechProviderError>;

    /// List the voices the provider offers, optionally filtered by language code.
    /// Malformed provider records are dropped, provider order is kept.
    async fn list_voices(
        &self,
        language_code: Option<&str>,
    ) -> Result<Vec<Voice>, SpeechProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechProviderError {
    #[error("{0}")]
    Request(String),
    #[error("provider responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("No audio content received from provider")]
    EmptyAudio,
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("audio encoding {0} is not supported by this provider")]
    UnsupportedEncoding(String),
    #[error("no voice available for language {language_code} and gender {gender}")]
    NoMatchingVoice {
        language_code: String,
        gender: String,
    },
}
