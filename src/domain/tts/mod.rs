pub mod dto;
pub mod error;
pub mod model;
pub mod service;

pub use dto::{SynthesizeRequest, SynthesizeResponse, VoicesQuery, VoicesResponse};
pub use error::TtsServiceError;
pub use model::{
    voices_from_records, AudioEncoding, ProviderVoiceRecord, SpeechRequest, Voice, VoiceGender,
    VoiceSelector, DEFAULT_LANGUAGE_CODE, DEFAULT_SAMPLE_RATE_HERTZ,
};
pub use service::{TtsService, TtsServiceApi, TtsSynthesisResult};
