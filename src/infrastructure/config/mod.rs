use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Audio storage
    pub audio_output_dir: PathBuf,
    pub audio_retention_hours: u64,
    pub cleanup_interval_minutes: u64,
    // Speech provider
    pub tts_provider: TtsProvider,
    pub google_tts_endpoint: String,
    pub google_tts_api_key: Option<String>,
    pub google_tts_access_token: Option<String>,
    pub tts_request_timeout_secs: u64,
    pub aws_region: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TtsProvider {
    Google,
    Polly,
}

impl std::fmt::Display for TtsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TtsProvider::Google => write!(f, "google"),
            TtsProvider::Polly => write!(f, "polly"),
        }
    }
}

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 3000)?,
            environment: match var_or("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var_or("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            audio_output_dir: PathBuf::from(var_or("AUDIO_OUTPUT_DIR", "output")),
            audio_retention_hours: parse_var("AUDIO_RETENTION_HOURS", 24)?,
            cleanup_interval_minutes: parse_var("CLEANUP_INTERVAL_MINUTES", 60)?,
            tts_provider: match var_or("TTS_PROVIDER", "google").to_lowercase().as_str() {
                "google" => TtsProvider::Google,
                "polly" => TtsProvider::Polly,
                other => {
                    return Err(ConfigError::InvalidValue {
                        name: "TTS_PROVIDER",
                        value: other.to_string(),
                    })
                }
            },
            google_tts_endpoint: var_or(
                "GOOGLE_TTS_ENDPOINT",
                "https://texttospeech.googleapis.com",
            ),
            google_tts_api_key: non_empty_var("GOOGLE_TTS_API_KEY"),
            google_tts_access_token: non_empty_var("GOOGLE_TTS_ACCESS_TOKEN"),
            tts_request_timeout_secs: parse_var("TTS_REQUEST_TIMEOUT_SECS", 30)?,
            aws_region: var_or("AWS_REGION", "us-east-1"),
        };

        to_secs("AUDIO_RETENTION_HOURS", config.audio_retention_hours, SECS_PER_HOUR)?;
        to_secs("CLEANUP_INTERVAL_MINUTES", config.cleanup_interval_minutes, SECS_PER_MINUTE)?;

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.audio_retention_hours.saturating_mul(SECS_PER_HOUR))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_minutes.saturating_mul(SECS_PER_MINUTE))
    }

    pub fn tts_request_timeout(&self) -> Duration {
        Duration::from_secs(self.tts_request_timeout_secs)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

/// Convert a count of `unit_secs`-long units to seconds, rejecting values that overflow
fn to_secs(name: &'static str, value: u64, unit_secs: u64) -> Result<u64, ConfigError> {
    value
        .checked_mul(unit_secs)
        .ok_or_else(|| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        })
}
