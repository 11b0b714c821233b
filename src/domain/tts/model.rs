use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Language used when a request names neither a voice nor a language
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// Sample rate reported for voices whose provider record does not carry one
pub const DEFAULT_SAMPLE_RATE_HERTZ: u32 = 24_000;

/// SSML voice gender as understood by the speech providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    #[serde(alias = "male")]
    Male,
    #[serde(alias = "female")]
    Female,
    #[default]
    #[serde(alias = "neutral")]
    Neutral,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Male => "MALE",
            VoiceGender::Female => "FEMALE",
            VoiceGender::Neutral => "NEUTRAL",
        }
    }

    /// Parse a provider gender value. Anything outside the three known genders
    /// (including `SSML_VOICE_GENDER_UNSPECIFIED`) is rejected.
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "MALE" => Some(VoiceGender::Male),
            "FEMALE" => Some(VoiceGender::Female),
            "NEUTRAL" => Some(VoiceGender::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output encoding of the synthesized audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    #[default]
    #[serde(alias = "mp3")]
    Mp3,
    #[serde(rename = "LINEAR16", alias = "linear16")]
    Linear16,
    #[serde(alias = "ogg_opus")]
    OggOpus,
    #[serde(alias = "mulaw")]
    Mulaw,
    #[serde(alias = "alaw")]
    Alaw,
}

impl AudioEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::OggOpus => "OGG_OPUS",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Alaw => "ALAW",
        }
    }

    /// File extension for stored audio, chosen so static serving picks the
    /// right content type. LINEAR16, MULAW and ALAW payloads come back with a
    /// WAV header.
    pub fn file_extension(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "mp3",
            AudioEncoding::OggOpus => "ogg",
            AudioEncoding::Linear16 | AudioEncoding::Mulaw | AudioEncoding::Alaw => "wav",
        }
    }
}

impl std::fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the provider should pick a voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSelector {
    /// An explicit provider voice name, e.g. `en-US-Wavenet-D` or `Joanna`
    Named(String),
    /// Let the provider choose a voice for this language and gender
    Language {
        language_code: String,
        gender: VoiceGender,
    },
}

/// A validated synthesis call, ready to hand to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceSelector,
    pub audio_encoding: AudioEncoding,
}

/// A voice offered by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub name: String,
    pub language_codes: Vec<String>,
    pub gender: VoiceGender,
    pub natural_sample_rate_hertz: u32,
}

/// A voice record exactly as the provider sent it.
///
/// Fields stay untyped so that a single malformed record can be dropped
/// instead of failing the whole listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderVoiceRecord {
    pub name: Option<Value>,
    pub language_codes: Option<Value>,
    pub ssml_gender: Option<Value>,
    pub natural_sample_rate_hertz: Option<Value>,
}

impl ProviderVoiceRecord {
    /// Apply defaults and validate the record's shape.
    ///
    /// Missing language codes become an empty list, a missing gender becomes
    /// `NEUTRAL` and a missing or zero sample rate becomes 24000. Returns `None`
    /// when the name is missing or empty, the language codes are not a list of
    /// strings, the gender is not one of the three known values, or the sample
    /// rate is not a positive integer.
    pub fn into_voice(self) -> Option<Voice> {
        let name = match self.name {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => return None,
        };

        let language_codes = match self.language_codes {
            None => Vec::new(),
            Some(Value::Array(codes)) => codes
                .into_iter()
                .map(|code| match code {
                    Value::String(code) => Some(code),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?,
            Some(_) => return None,
        };

        let gender = match self.ssml_gender {
            None => VoiceGender::Neutral,
            Some(Value::String(gender)) => VoiceGender::from_provider(&gender)?,
            Some(_) => return None,
        };

        let natural_sample_rate_hertz = match self.natural_sample_rate_hertz {
            None => DEFAULT_SAMPLE_RATE_HERTZ,
            Some(Value::Number(rate)) => match rate.as_u64() {
                Some(0) => DEFAULT_SAMPLE_RATE_HERTZ,
                Some(rate) => u32::try_from(rate).ok()?,
                None => return None,
            },
            Some(_) => return None,
        };

        Some(Voice {
            name,
            language_codes,
            gender,
            natural_sample_rate_hertz,
        })
    }
}

/// Map raw provider records into voices, dropping the malformed ones.
/// Provider order is preserved.
pub fn voices_from_records<I>(records: I) -> Vec<Voice>
where
    I: IntoIterator<Item = ProviderVoiceRecord>,
{
    records
        .into_iter()
        .filter_map(ProviderVoiceRecord::into_voice)
        .collect()
}
