use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use speech_relay::controllers::tts::TtsController;
use speech_relay::domain::tts::TtsService;
use speech_relay::infrastructure::cleanup::AudioCleanup;
use speech_relay::infrastructure::config::{Config, LogFormat, TtsProvider};
use speech_relay::infrastructure::http::start_http_server;
use speech_relay::infrastructure::repositories::{
    AudioFileRepository, GoogleCredentials, GoogleTtsRepository, PollyTtsRepository,
    SpeechRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        provider = %config.tts_provider,
        "Starting speech relay on {}:{}",
        config.host,
        config.port
    );

    let speech_repo = create_speech_repository(&config).await?;

    let audio_repo = Arc::new(AudioFileRepository::new(config.audio_output_dir.clone()));
    audio_repo.ensure_output_dir().await?;
    tracing::info!(
        output_dir = %audio_repo.output_dir().display(),
        "Audio output directory ready"
    );

    // Sweep once now, then on every interval
    let cleanup = AudioCleanup::new(config.audio_output_dir.clone(), config.retention());
    tracing::info!(
        dir = %cleanup.output_dir().display(),
        retention_hours = config.audio_retention_hours,
        interval_minutes = config.cleanup_interval_minutes,
        "Scheduling audio cleanup"
    );
    cleanup.spawn(config.cleanup_interval());

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    let tts_service = Arc::new(TtsService::new(speech_repo, audio_repo));
    let tts_controller = Arc::new(TtsController::new(tts_service));

    start_http_server(config, tts_controller).await?;

    Ok(())
}

async fn create_speech_repository(
    config: &Config,
) -> Result<Arc<dyn SpeechRepository>, Box<dyn std::error::Error>> {
    match config.tts_provider {
        TtsProvider::Google => {
            let credentials = GoogleCredentials::from_options(
                config.google_tts_api_key.clone(),
                config.google_tts_access_token.clone(),
            );

            if credentials == GoogleCredentials::Anonymous {
                tracing::warn!("Neither GOOGLE_TTS_API_KEY nor GOOGLE_TTS_ACCESS_TOKEN is set; calling the provider without credentials");
            }

            let repo = GoogleTtsRepository::new(
                config.google_tts_endpoint.clone(),
                credentials,
                config.tts_request_timeout(),
            )?;
            tracing::info!(endpoint = %config.google_tts_endpoint, "Google Text-to-Speech client initialized");

            Ok(Arc::new(repo))
        }
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;

            tracing::info!(
                region = ?aws_config.region(),
                "AWS configuration loaded"
            );

            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            Ok(Arc::new(PollyTtsRepository::new(polly_client)))
        }
    }
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "speech_relay=debug,tower_http=debug"
    } else {
        "speech_relay=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
