use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{
        SynthesizeRequest, SynthesizeResponse, TtsServiceApi, VoicesQuery, VoicesResponse,
    },
    error::AppResult,
};

pub struct TtsController {
    tts_service: Arc<dyn TtsServiceApi>,
}

impl TtsController {
    pub fn new(tts_service: Arc<dyn TtsServiceApi>) -> Self {
        Self { tts_service }
    }

    /// POST /tts/synthesize - Convert text to speech and store it
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<SynthesizeRequest>, JsonRejection>,
    ) -> AppResult<Json<SynthesizeResponse>> {
        let Json(request) = payload?;

        let result = controller.tts_service.synthesize(request).await?;

        tracing::info!(
            audio_path = %result.audio_path,
            bytes = result.bytes_written,
            "Speech synthesized"
        );

        Ok(Json(SynthesizeResponse::success(result.audio_path)))
    }

    /// GET /tts/voices - List available voices, optionally filtered by `languageCode`
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
        query: Result<Query<VoicesQuery>, QueryRejection>,
    ) -> AppResult<Json<VoicesResponse>> {
        let Query(query) = query?;
        let voices = controller.tts_service.list_voices(query.language_code).await?;
        Ok(Json(VoicesResponse::success(voices)))
    }
}
