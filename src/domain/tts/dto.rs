use serde::{Deserialize, Serialize};

use super::model::{AudioEncoding, Voice, VoiceGender};

/// Request for POST /tts/synthesize
///
/// `text` is optional at the wire level so a missing field reaches validation
/// and is answered with `Text is required` instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssml_gender: Option<VoiceGender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_encoding: Option<AudioEncoding>,
}

/// Query string for GET /tts/voices
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicesQuery {
    pub language_code: Option<String>,
}

/// Response for POST /tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeResponse {
    pub status: String,
    pub data: SynthesizeData,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeData {
    pub audio_path: String,
}

/// Response for GET /tts/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub status: String,
    pub data: VoicesData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesData {
    pub voices: Vec<Voice>,
}

impl SynthesizeResponse {
    pub fn success(audio_path: String) -> Self {
        Self {
            status: "success".to_string(),
            data: SynthesizeData { audio_path },
        }
    }
}

impl VoicesResponse {
    pub fn success(voices: Vec<Voice>) -> Self {
        Self {
            status: "success".to_string(),
            data: VoicesData { voices },
        }
    }
}
