use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("{0}")]
    Invalid(String),
    #[error("Failed to generate speech: {0}")]
    Synthesis(String),
    #[error("Failed to list voices: {0}")]
    VoiceListing(String),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::InvalidInput(msg),
            other => AppError::OperationFailed(other.to_string()),
        }
    }
}
