use super::speech_repository::{SpeechProviderError, SpeechRepository};
use crate::domain::tts::{
    voices_from_records, AudioEncoding, ProviderVoiceRecord, SpeechRequest, Voice, VoiceGender,
    VoiceSelector,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// How requests to the Text-to-Speech API are authenticated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoogleCredentials {
    ApiKey(String),
    AccessToken(String),
    /// No auth header at all, for emulators and local fakes
    Anonymous,
}

impl GoogleCredentials {
    /// An API key wins over an access token
    pub fn from_options(api_key: Option<String>, access_token: Option<String>) -> Self {
        match (api_key, access_token) {
            (Some(key), _) => GoogleCredentials::ApiKey(key),
            (None, Some(token)) => GoogleCredentials::AccessToken(token),
            (None, None) => GoogleCredentials::Anonymous,
        }
    }
}

/// Google Cloud Text-to-Speech (v1 REST) implementation of the speech repository
pub struct GoogleTtsRepository {
    client: reqwest::Client,
    endpoint: String,
    credentials: GoogleCredentials,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechBody<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml_gender: Option<VoiceGender>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: AudioEncoding,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListVoicesResponse {
    #[serde(default)]
    voices: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

impl GoogleTtsRepository {
    pub fn new(
        endpoint: impl Into<String>,
        credentials: GoogleCredentials,
        timeout: Duration,
    ) -> Result<Self, SpeechProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechProviderError::Request(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            GoogleCredentials::ApiKey(key) => builder.header(API_KEY_HEADER, key),
            GoogleCredentials::AccessToken(token) => builder.bearer_auth(token),
            GoogleCredentials::Anonymous => builder,
        }
    }

    /// Turn a non-2xx response into a provider error, preferring the API's own message
    async fn status_error(response: reqwest::Response) -> SpeechProviderError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GoogleErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        SpeechProviderError::Status { status, message }
    }
}

/// Google voice names start with their locale, e.g. `en-US-Wavenet-D`.
/// The API wants a language code alongside the name.
fn language_code_from_voice_name(name: &str) -> Option<&str> {
    let mut dashes = name.match_indices('-').map(|(i, _)| i);
    let _language_end = dashes.next()?;
    let region_end = dashes.next()?;
    Some(&name[..region_end])
}

fn voice_params(selector: &VoiceSelector) -> VoiceSelectionParams<'_> {
    match selector {
        VoiceSelector::Named(name) => VoiceSelectionParams {
            language_code: language_code_from_voice_name(name),
            name: Some(name.as_str()),
            ssml_gender: None,
        },
        VoiceSelector::Language {
            language_code,
            gender,
        } => VoiceSelectionParams {
            language_code: Some(language_code.as_str()),
            name: None,
            ssml_gender: Some(*gender),
        },
    }
}

#[async_trait]
impl SpeechRepository for GoogleTtsRepository {
    fn provider_name(&self) -> &'static str {
        "google"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechProviderError> {
        let body = SynthesizeSpeechBody {
            input: SynthesisInput {
                text: &request.text,
            },
            voice: voice_params(&request.voice),
            audio_config: AudioConfig {
                audio_encoding: request.audio_encoding,
            },
        };

        tracing::debug!(
            voice = ?body.voice,
            audio_encoding = %request.audio_encoding,
            text_length = request.text.len(),
            "Calling Google text:synthesize"
        );

        let url = format!("{}/v1/text:synthesize", self.endpoint);
        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Google text:synthesize request failed");
                SpeechProviderError::Request(e.to_string())
            })?;

        if !response.status().is_success() {
            let err = Self::status_error(response).await;
            tracing::error!(error = %err, "Google text:synthesize rejected the request");
            return Err(err);
        }

        let payload: SynthesizeSpeechResponse = response
            .json()
            .await
            .map_err(|e| SpeechProviderError::InvalidResponse(e.to_string()))?;

        let encoded = payload
            .audio_content
            .filter(|content| !content.is_empty())
            .ok_or(SpeechProviderError::EmptyAudio)?;

        let audio = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| SpeechProviderError::InvalidResponse(format!("audioContent: {}", e)))?;

        if audio.is_empty() {
            return Err(SpeechProviderError::EmptyAudio);
        }

        Ok(audio)
    }

    async fn list_voices(
        &self,
        language_code: Option<&str>,
    ) -> Result<Vec<Voice>, SpeechProviderError> {
        let url = format!("{}/v1/voices", self.endpoint);
        let mut builder = self.client.get(&url);
        if let Some(code) = language_code {
            builder = builder.query(&[("languageCode", code)]);
        }

        let response = self.authorize(builder).send().await.map_err(|e| {
            tracing::error!(error = %e, "Google voices request failed");
            SpeechProviderError::Request(e.to_string())
        })?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let payload: ListVoicesResponse = response
            .json()
            .await
            .map_err(|e| SpeechProviderError::InvalidResponse(e.to_string()))?;

        let raw = payload.voices.unwrap_or_default();
        let raw_count = raw.len();
        let records = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value::<ProviderVoiceRecord>(value).ok());
        let voices = voices_from_records(records);

        if voices.len() < raw_count {
            tracing::warn!(
                dropped = raw_count - voices.len(),
                "Dropped malformed voice records from Google"
            );
        }

        Ok(voices)
    }
}
