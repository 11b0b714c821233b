use crate::e2e::helpers::{fake_provider::mock_audio_bytes, is_audio_path, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use speech_relay::domain::tts::{AudioEncoding, VoiceGender, VoiceSelector};
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_text_to_speech(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/tts/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.json_body();
    assert_eq!(body.get("status"), Some(&json!("success")));

    let audio_path = body["data"]["audioPath"].as_str().unwrap();
    assert!(is_audio_path(audio_path, "mp3"), "unexpected audio path {}", audio_path);

    let stored = std::fs::read(ctx.file_for(audio_path)).unwrap();
    assert_eq!(stored, mock_audio_bytes());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_default_voice_settings(ctx: &TestContext) {
    ctx.client
        .post("/tts/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let requests = ctx.provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "hello");
    assert_eq!(
        requests[0].voice,
        VoiceSelector::Language {
            language_code: "en-US".to_string(),
            gender: VoiceGender::Neutral,
        }
    );
    assert_eq!(requests[0].audio_encoding, AudioEncoding::Mp3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_custom_voice_settings(ctx: &TestContext) {
    ctx.client
        .post(
            "/tts/synthesize",
            &json!({
                "text": "hola",
                "languageCode": "es-ES",
                "ssmlGender": "FEMALE",
                "audioEncoding": "OGG_OPUS"
            }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let requests = ctx.provider.requests();
    let request = &requests[0];
    assert_eq!(
        request.voice,
        VoiceSelector::Language {
            language_code: "es-ES".to_string(),
            gender: VoiceGender::Female,
        }
    );
    assert_eq!(request.audio_encoding, AudioEncoding::OggOpus);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_prefer_voice_name_over_language(ctx: &TestContext) {
    ctx.client
        .post(
            "/tts/synthesize",
            &json!({
                "text": "hello",
                "languageCode": "fr-FR",
                "voiceName": "en-US-Wavenet-A",
                "ssmlGender": "MALE"
            }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert_eq!(
        ctx.provider.requests()[0].voice,
        VoiceSelector::Named("en-US-Wavenet-A".to_string())
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_store_non_mp3_encodings_with_matching_extension(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/tts/synthesize",
            &json!({ "text": "hello", "audioEncoding": "LINEAR16" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let audio_path = response.json_body()["data"]["audioPath"].as_str().unwrap();
    assert!(is_audio_path(audio_path, "wav"), "unexpected audio path {}", audio_path);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text(ctx: &TestContext) {
    let response = ctx.client.post("/tts/synthesize", &json!({})).await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text is required");
    assert!(ctx.provider.requests().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/tts/synthesize", &json!({ "text": "" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text is required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/tts/synthesize", "{\"text\": ", "application/json")
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json_body().get("status"), Some(&json!("error")));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_gender(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/tts/synthesize",
            &json!({ "text": "hello", "ssmlGender": "ROBOT" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.provider.requests().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_provider_failure(ctx: &TestContext) {
    ctx.provider.fail_with("quota exhausted");

    let response = ctx
        .client
        .post("/tts/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("quota exhausted");

    let message = response.json_body()["message"].as_str().unwrap();
    assert!(
        message.starts_with("Failed to generate speech:"),
        "unexpected message {}",
        message
    );
    assert_eq!(std::fs::read_dir(ctx.output_dir()).unwrap().count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_under_api_prefix(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let audio_path = response.json_body()["data"]["audioPath"].as_str().unwrap();
    assert!(ctx.file_for(audio_path).exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_give_concurrent_requests_distinct_files(ctx: &TestContext) {
    let mut futures = Vec::new();
    for i in 0..10 {
        let client = ctx.client.clone();
        futures.push(async move {
            client
                .post("/tts/synthesize", &json!({ "text": format!("line {}", i) }))
                .await
        });
    }

    let mut paths = Vec::new();
    for result in futures::future::join_all(futures).await {
        let response = result.unwrap();
        response.assert_status(StatusCode::OK);
        paths.push(response.json_body()["data"]["audioPath"].as_str().unwrap().to_string());
    }

    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 10);
    assert_eq!(std::fs::read_dir(ctx.output_dir()).unwrap().count(), 10);
}
