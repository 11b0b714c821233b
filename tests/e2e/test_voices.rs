use crate::e2e::helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_context::test_context;

fn voices(body: &Value) -> &Vec<Value> {
    body["data"]["voices"]
        .as_array()
        .unwrap_or_else(|| panic!("voices should be an array: {}", body))
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_only_well_formed_voices(ctx: &TestContext) {
    let response = ctx.client.get("/tts/voices").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json_body();
    assert_eq!(body.get("status"), Some(&json!("success")));

    let voices = voices(body);
    let names: Vec<&str> = voices.iter().filter_map(|v| v["name"].as_str()).collect();
    assert_eq!(names, vec!["en-US-Wavenet-A", "en-GB-Standard-A", "es-ES-Standard-B"]);

    for voice in voices {
        assert!(!voice["name"].as_str().unwrap().is_empty());
        assert!(voice["languageCodes"].is_array());
        let gender = voice["gender"].as_str().unwrap();
        assert!(["MALE", "FEMALE", "NEUTRAL"].contains(&gender), "bad gender {}", gender);
        assert!(voice["naturalSampleRateHertz"].as_u64().unwrap() > 0);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fill_in_voice_defaults(ctx: &TestContext) {
    let response = ctx.client.get("/tts/voices?languageCode=es-ES").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        voices(response.json_body()),
        &vec![json!({
            "name": "es-ES-Standard-B",
            "languageCodes": ["es-ES"],
            "gender": "NEUTRAL",
            "naturalSampleRateHertz": 24000
        })]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_language_filter_to_provider(ctx: &TestContext) {
    ctx.client
        .get("/api/tts/voices?languageCode=en-GB")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client.get("/tts/voices").await.unwrap();

    assert_eq!(
        ctx.provider.voice_filters(),
        vec![Some("en-GB".to_string()), None]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_provider_failure(ctx: &TestContext) {
    ctx.provider.fail_with("catalog offline");

    let response = ctx.client.get("/tts/voices").await.unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Failed to list voices: catalog offline");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_query_with_json_error(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/tts/voices?languageCode=en-US&languageCode=en-GB")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Failed to deserialize query string");
    assert!(ctx.provider.voice_filters().is_empty());
}
