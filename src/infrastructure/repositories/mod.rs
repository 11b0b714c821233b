pub mod audio_file_repository;
pub mod google_tts_repository;
pub mod polly_tts_repository;
pub mod speech_repository;

pub use audio_file_repository::{AudioFileRepository, AudioStorageError, AUDIO_ROUTE_PREFIX};
pub use google_tts_repository::{GoogleCredentials, GoogleTtsRepository};
pub use polly_tts_repository::PollyTtsRepository;
pub use speech_repository::{SpeechProviderError, SpeechRepository};
