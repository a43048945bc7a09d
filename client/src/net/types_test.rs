use super::*;

#[test]
fn success_body_yields_image() {
    let body = r#"{"success":true,"image":{"data":"AAEC","mimeType":"image/png"}}"#;
    let image = interpret_response(200, body).expect("image");
    assert_eq!(image, EncodedImage { data: "AAEC".into(), mime_type: "image/png".into() });
}

#[test]
fn missing_image_on_200_is_an_error() {
    assert_eq!(interpret_response(200, r#"{"success":true}"#), Err(NO_IMAGE_MESSAGE.to_owned()));
}

#[test]
fn success_false_on_200_uses_error_field() {
    let body = r#"{"success":false,"image":{"data":"AAEC","mimeType":"image/png"},"error":"nope"}"#;
    assert_eq!(interpret_response(200, body), Err("nope".to_owned()));
}

#[test]
fn error_status_uses_error_field() {
    assert_eq!(interpret_response(400, r#"{"error":"No image provided"}"#), Err("No image provided".to_owned()));
    assert_eq!(
        interpret_response(500, r#"{"error":"Google AI API key not configured"}"#),
        Err("Google AI API key not configured".to_owned())
    );
}

#[test]
fn error_status_without_error_field_uses_fallback() {
    assert_eq!(interpret_response(502, "{}"), Err(TRANSFORM_FAILED_MESSAGE.to_owned()));
}

#[test]
fn decline_appends_model_text() {
    let body = r#"{"success":false,"error":"Model returned text instead of image","text":"I cannot edit this photo."}"#;
    assert_eq!(
        interpret_response(422, body),
        Err("Model returned text instead of image: I cannot edit this photo.".to_owned())
    );
}

#[test]
fn decline_with_blank_text_keeps_error_only() {
    let body = r#"{"success":false,"error":"Model returned text instead of image","text":"  "}"#;
    assert_eq!(interpret_response(422, body), Err("Model returned text instead of image".to_owned()));
}

#[test]
fn non_json_body_reports_status() {
    assert_eq!(
        interpret_response(504, "<html>Gateway Timeout</html>"),
        Err("Failed to transform image (HTTP 504)".to_owned())
    );
}
