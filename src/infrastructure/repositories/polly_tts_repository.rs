use super::speech_repository::{SpeechProviderError, SpeechRepository};
use crate::domain::tts::{
    voices_from_records, AudioEncoding, ProviderVoiceRecord, SpeechRequest, Voice, VoiceGender,
    VoiceSelector,
};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Gender, LanguageCode, OutputFormat, Voice as PollyVoice, VoiceId},
    Client as PollyClient,
};
use serde_json::Value;
use std::sync::Arc;

/// AWS Polly implementation of the speech repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Polly can only produce MP3, Ogg Vorbis and raw PCM; raw PCM has no
    /// container, so only the first two map onto our encodings.
    fn output_format(encoding: AudioEncoding) -> Result<OutputFormat, SpeechProviderError> {
        match encoding {
            AudioEncoding::Mp3 => Ok(OutputFormat::Mp3),
            AudioEncoding::OggOpus => Ok(OutputFormat::OggVorbis),
            other => Err(SpeechProviderError::UnsupportedEncoding(other.to_string())),
        }
    }

    /// Fetch every voice Polly offers for a language, following pagination
    async fn describe_voices(
        &self,
        language_code: Option<&str>,
    ) -> Result<Vec<PollyVoice>, SpeechProviderError> {
        let mut voices = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .polly_client
                .describe_voices()
                .set_language_code(language_code.map(LanguageCode::from))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = ?e,
                        language_code = ?language_code,
                        "AWS Polly describe_voices failed"
                    );
                    SpeechProviderError::Request(format!("AWS Polly error: {}", e))
                })?;

            voices.extend(output.voices().iter().cloned());

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(voices)
    }

    /// Resolve a voice selector into a concrete Polly voice id
    async fn resolve_voice_id(&self, selector: &VoiceSelector) -> Result<VoiceId, SpeechProviderError> {
        match selector {
            VoiceSelector::Named(name) => Ok(VoiceId::from(name.as_str())),
            VoiceSelector::Language {
                language_code,
                gender,
            } => {
                let voices = self.describe_voices(Some(language_code.as_str())).await?;
                pick_voice_id(&voices, *gender).ok_or_else(|| SpeechProviderError::NoMatchingVoice {
                    language_code: language_code.clone(),
                    gender: gender.to_string(),
                })
            }
        }
    }
}

/// First voice matching the requested gender. Polly has no neutral voices,
/// so NEUTRAL accepts any of them.
fn pick_voice_id(voices: &[PollyVoice], gender: VoiceGender) -> Option<VoiceId> {
    voices
        .iter()
        .filter(|voice| match gender {
            VoiceGender::Neutral => true,
            VoiceGender::Male => voice.gender() == Some(&Gender::Male),
            VoiceGender::Female => voice.gender() == Some(&Gender::Female),
        })
        .find_map(|voice| voice.id().cloned())
}

/// Describe a Polly voice in the provider-neutral record shape so it goes
/// through the same validation as every other provider's voices
fn voice_record_from_polly(voice: &PollyVoice) -> ProviderVoiceRecord {
    let mut language_codes: Vec<Value> = voice
        .language_code()
        .map(|code| Value::String(code.as_str().to_string()))
        .into_iter()
        .collect();
    language_codes.extend(
        voice
            .additional_language_codes()
            .iter()
            .map(|code| Value::String(code.as_str().to_string())),
    );

    ProviderVoiceRecord {
        name: voice.id().map(|id| Value::String(id.as_str().to_string())),
        language_codes: Some(Value::Array(language_codes)),
        ssml_gender: voice
            .gender()
            .map(|gender| Value::String(gender.as_str().to_uppercase())),
        natural_sample_rate_hertz: None,
    }
}

#[async_trait]
impl SpeechRepository for PollyTtsRepository {
    fn provider_name(&self) -> &'static str {
        "polly"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechProviderError> {
        let output_format = Self::output_format(request.audio_encoding)?;
        let voice_id = self.resolve_voice_id(&request.voice).await?;

        tracing::info!(
            voice_id = ?voice_id,
            output_format = ?output_format,
            text_length = request.text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        // Clone voice_id for error logging since it will be moved
        let voice_id_for_error = voice_id.clone();

        let result = self
            .polly_client
            .synthesize_speech()
            .text(&request.text)
            .voice_id(voice_id)
            .output_format(output_format)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice_id = ?voice_id_for_error,
                    text_length = request.text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                SpeechProviderError::Request(format!("AWS Polly error: {}", e))
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            SpeechProviderError::InvalidResponse(format!("Failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        if audio_bytes.is_empty() {
            return Err(SpeechProviderError::EmptyAudio);
        }

        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }

    async fn list_voices(
        &self,
        language_code: Option<&str>,
    ) -> Result<Vec<Voice>, SpeechProviderError> {
        let polly_voices = self.describe_voices(language_code).await?;
        Ok(voices_from_records(
            polly_voices.iter().map(voice_record_from_polly),
        ))
    }
}
