use super::*;
use crate::llm::types::Modality;
use images::EncodedImage;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_response(parts: serde_json::Value) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 1290, "candidatesTokenCount": 1290 },
        "modelVersion": "gemini-2.5-flash-image"
    })
    .to_string()
}

fn sample_request() -> GenerationRequest {
    GenerationRequest {
        parts: vec![
            RequestPart::Image(EncodedImage { data: "/9j/".into(), mime_type: "image/jpeg".into() }),
            RequestPart::Text("make it blue".into()),
        ],
        modalities: vec![Modality::Image, Modality::Text],
    }
}

fn test_client(base_url: String) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: "test-api-key".into(),
        model: "gemini-test".into(),
        base_url,
        timeouts: LlmTimeouts::default(),
    })
    .unwrap()
}

// =============================================================================
// build_request
// =============================================================================

#[test]
fn build_request_preserves_part_order_and_modalities() {
    let request = sample_request();
    let body = serde_json::to_value(build_request(&request)).unwrap();
    assert_eq!(
        body,
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/" } },
                    { "text": "make it blue" }
                ]
            }],
            "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
        })
    );
}

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_inline_image_part() {
    let json = make_response(json!([
        { "inlineData": { "mimeType": "image/png", "data": "iVBORw==" } }
    ]));
    let reply = parse_response(&json).unwrap();
    assert_eq!(reply.candidates.len(), 1);
    assert_eq!(
        reply.candidates[0].parts,
        vec![ReplyPart::InlineData { data: "iVBORw==".into(), mime_type: Some("image/png".into()) }]
    );
}

#[test]
fn parse_snake_case_inline_data() {
    let json = make_response(json!([
        { "inline_data": { "mime_type": "image/webp", "data": "UklGRg==" } }
    ]));
    let reply = parse_response(&json).unwrap();
    assert!(matches!(
        &reply.candidates[0].parts[0],
        ReplyPart::InlineData { mime_type: Some(m), .. } if m == "image/webp"
    ));
}

#[test]
fn parse_inline_data_without_mime_type() {
    let json = make_response(json!([{ "inlineData": { "data": "iVBORw==" } }]));
    let reply = parse_response(&json).unwrap();
    assert!(matches!(&reply.candidates[0].parts[0], ReplyPart::InlineData { mime_type: None, .. }));
}

#[test]
fn parse_mixed_parts_keep_order() {
    let json = make_response(json!([
        { "text": "Here is your car" },
        { "inlineData": { "mimeType": "image/png", "data": "iVBORw==" } }
    ]));
    let reply = parse_response(&json).unwrap();
    let parts = &reply.candidates[0].parts;
    assert_eq!(parts.len(), 2);
    assert!(matches!(&parts[0], ReplyPart::Text(t) if t == "Here is your car"));
    assert!(matches!(&parts[1], ReplyPart::InlineData { .. }));
}

#[test]
fn parse_thought_parts_are_unknown() {
    let json = make_response(json!([
        { "text": "Planning the edit...", "thought": true },
        { "text": "I cannot edit this image" }
    ]));
    let reply = parse_response(&json).unwrap();
    let parts = &reply.candidates[0].parts;
    assert_eq!(parts[0], ReplyPart::Unknown);
    assert_eq!(parts[1], ReplyPart::Text("I cannot edit this image".into()));
}

#[test]
fn parse_unrecognized_part_is_unknown() {
    let json = make_response(json!([{ "functionCall": { "name": "noop", "args": {} } }]));
    let reply = parse_response(&json).unwrap();
    assert_eq!(reply.candidates[0].parts, vec![ReplyPart::Unknown]);
}

#[test]
fn parse_candidate_without_content() {
    let json = json!({ "candidates": [{ "finishReason": "IMAGE_SAFETY" }] }).to_string();
    let reply = parse_response(&json).unwrap();
    assert_eq!(reply.candidates.len(), 1);
    assert!(reply.candidates[0].parts.is_empty());
}

#[test]
fn parse_prompt_block_reason() {
    let json = json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
    let reply = parse_response(&json).unwrap();
    assert!(reply.candidates.is_empty());
    assert_eq!(reply.block_reason.as_deref(), Some("SAFETY"));
}

#[test]
fn parse_invalid_json() {
    let err = parse_response("not json").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

// =============================================================================
// generate (HTTP)
// =============================================================================

#[tokio::test]
async fn generate_posts_to_model_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_json(serde_json::to_value(build_request(&sample_request())).unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_string(make_response(json!([
            { "inlineData": { "mimeType": "image/png", "data": "iVBORw==" } }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let reply = client.generate(&sample_request()).await.unwrap();
    assert!(matches!(&reply.candidates[0].parts[0], ReplyPart::InlineData { data, .. } if data == "iVBORw=="));
}

#[tokio::test]
async fn generate_non_success_status_is_api_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let err = client.generate(&sample_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::ApiResponse { status: 403, ref body } if body == "API key not valid"));
}

#[tokio::test]
async fn generate_non_success_status_surfaces_service_message() {
    let server = MockServer::start().await;
    let body = json!({ "error": { "code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT" } });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(body))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let err = client.generate(&sample_request()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "API response error: status 400: API key not valid. Please pass a valid API key."
    );
}

#[test]
fn error_message_prefers_envelope_message() {
    assert_eq!(error_message(r#"{"error":{"message":"quota exceeded"}}"#), "quota exceeded");
}

#[test]
fn error_message_falls_back_to_trimmed_body() {
    assert_eq!(error_message("  upstream unavailable \n"), "upstream unavailable");
    assert_eq!(error_message(r#"{"error":{"message":""}}"#), r#"{"error":{"message":""}}"#);
}

#[test]
fn error_message_caps_long_bodies() {
    let long = "x".repeat(2_000);
    assert_eq!(error_message(&long).len(), 500);
}

#[tokio::test]
async fn generate_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let err = client.generate(&sample_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[tokio::test]
async fn generate_unreachable_host_is_request_error() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let client = test_client("http://127.0.0.1:9".into());
    let err = client.generate(&sample_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::ApiRequest(_)));
}

#[test]
fn model_and_endpoint_use_config() {
    let client = test_client("https://example.test/v1beta".into());
    assert_eq!(client.model(), "gemini-test");
    assert_eq!(client.endpoint(), "https://example.test/v1beta/models/gemini-test:generateContent");
}
