use std::time::Duration;

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::CONFIG;
use crate::llm::media::{gemini_image_mime, ImageFile};
use crate::utils::http::get_http_client;
use crate::utils::timing::log_llm_timing;

const ERROR_BODY_LIMIT: usize = 400;

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

fn redact_gemini_api_key(text: &str) -> String {
    let key = CONFIG.gemini_api_key.trim();
    if key.is_empty() {
        return text.to_string();
    }
    text.replace(key, "[redacted]")
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (message, truncate_for_log(&value.to_string(), ERROR_BODY_LIMIT));
    }

    (None, truncate_for_log(trimmed, ERROR_BODY_LIMIT))
}

fn summarize_parts(parts: &[Value]) -> Vec<Value> {
    parts
        .iter()
        .map(|part| {
            if let Some(text) = part.get("text").and_then(|value| value.as_str()) {
                json!({ "text": truncate_for_log(text, 200) })
            } else if let Some(inline_data) = part.get("inlineData") {
                let mime_type = inline_data
                    .get("mimeType")
                    .and_then(|value| value.as_str())
                    .unwrap_or("unknown");
                let data_len = inline_data
                    .get("data")
                    .and_then(|value| value.as_str())
                    .map(|value| value.len())
                    .unwrap_or(0);
                json!({ "inlineData": { "mimeType": mime_type, "dataLen": data_len } })
            } else {
                json!({ "unknownPart": true })
            }
        })
        .collect()
}

fn summarize_payload(payload: &Value) -> Value {
    let mut summary = Map::new();

    if let Some(contents) = payload.get("contents").and_then(|value| value.as_array()) {
        let mut summarized_contents = Vec::new();
        for content in contents {
            let role = content
                .get("role")
                .and_then(|value| value.as_str())
                .unwrap_or("user");
            let parts = content
                .get("parts")
                .and_then(|value| value.as_array())
                .map(|parts| summarize_parts(parts))
                .unwrap_or_default();
            summarized_contents.push(json!({ "role": role, "parts": parts }));
        }
        summary.insert("contents".to_string(), Value::Array(summarized_contents));
    }

    if let Some(config) = payload.get("generationConfig") {
        summary.insert("generationConfig".to_string(), config.clone());
    }

    Value::Object(summary)
}

fn summarize_response(response: &GeminiResponse) -> Value {
    let mut text_parts = 0usize;
    let mut image_parts = 0usize;
    let mut text_preview = None;

    let candidates = response.candidates.as_deref().unwrap_or(&[]);
    for candidate in candidates {
        if let Some(parts) = candidate.content.as_ref().and_then(|c| c.parts.as_ref()) {
            for part in parts {
                match part {
                    GeminiPart::Text { text } => {
                        text_parts += 1;
                        if text_preview.is_none() && !text.trim().is_empty() {
                            text_preview = Some(truncate_for_log(text, 200));
                        }
                    }
                    GeminiPart::InlineData { inline_data } => {
                        if inline_data.mime_type.starts_with("image/") {
                            image_parts += 1;
                        }
                    }
                }
            }
        }
    }

    json!({
        "candidates": candidates.len(),
        "textParts": text_parts,
        "imageParts": image_parts,
        "textPreview": text_preview
    })
}

pub fn build_content_parts(prompt: &str, images: &[&ImageFile]) -> Vec<Value> {
    let mut parts = vec![json!({ "text": prompt })];
    for image in images {
        let mime_type = gemini_image_mime(image);
        let encoded = general_purpose::STANDARD.encode(&image.bytes);
        parts.push(json!({
            "inlineData": {
                "mimeType": mime_type,
                "data": encoded
            }
        }));
    }
    parts
}

pub fn extract_text(response: &GeminiResponse) -> String {
    let mut text_parts = Vec::new();
    for candidate in response.candidates.as_deref().unwrap_or(&[]) {
        if let Some(parts) = candidate.content.as_ref().and_then(|c| c.parts.as_ref()) {
            for part in parts {
                if let GeminiPart::Text { text } = part {
                    if !text.trim().is_empty() {
                        text_parts.push(text.clone());
                    }
                }
            }
        }
    }
    text_parts.join("\n")
}

pub fn extract_first_image(response: &GeminiResponse) -> Option<Vec<u8>> {
    for candidate in response.candidates.as_deref().unwrap_or(&[]) {
        if let Some(parts) = candidate.content.as_ref().and_then(|c| c.parts.as_ref()) {
            for part in parts {
                if let GeminiPart::InlineData { inline_data } = part {
                    if !inline_data.mime_type.starts_with("image/") {
                        continue;
                    }
                    match general_purpose::STANDARD.decode(&inline_data.data) {
                        Ok(bytes) => return Some(bytes),
                        Err(err) => {
                            warn!("Skipping undecodable inline image payload: {err}");
                        }
                    }
                }
            }
        }
    }
    None
}

pub fn first_finish_reason(response: &GeminiResponse) -> String {
    response
        .candidates
        .as_deref()
        .unwrap_or(&[])
        .first()
        .and_then(|candidate| candidate.finish_reason.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

async fn call_gemini_api(model: &str, payload: Value, timeout: Duration) -> Result<GeminiResponse> {
    let client = get_http_client();
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
        model, CONFIG.gemini_api_key
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let payload_summary = summarize_payload(&payload);
        debug!(target: "llm.gemini", model = model, payload = %payload_summary);
    }

    let response = match client
        .post(&url)
        .timeout(timeout)
        .json(&payload)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            let err_text = redact_gemini_api_key(&err.to_string());
            warn!(
                "Gemini request failed to send: {} (timeout={}, connect={}, status={:?})",
                err_text,
                err.is_timeout(),
                err.is_connect(),
                err.status()
            );
            return Err(anyhow!("Gemini request failed: {}", err_text));
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let (message, body_summary) = summarize_error_body(&body);
        warn!("Gemini API error: status={}, body={}", status, body_summary);
        let detail = message.unwrap_or(body_summary);
        return Err(anyhow!(
            "Gemini request failed with status {}: {}",
            status,
            detail
        ));
    }

    let value = response.json::<GeminiResponse>().await?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let response_summary = summarize_response(&value);
        debug!(target: "llm.gemini", model = model, response = %response_summary);
    }
    Ok(value)
}

pub async fn call_vision(prompt: &str, image: &ImageFile) -> Result<String> {
    let parts = build_content_parts(prompt, &[image]);
    let payload = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "temperature": CONFIG.gemini_vision_temperature },
    });

    let model = &CONFIG.gemini_vision_model;
    log_llm_timing("gemini", model, "vision_analysis", None, || async {
        let response = call_gemini_api(
            model,
            payload,
            Duration::from_secs(CONFIG.analysis_timeout_secs),
        )
        .await?;
        Ok(extract_text(&response))
    })
    .await
}

pub async fn call_text(prompt: &str) -> Result<String> {
    let payload = json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": { "temperature": CONFIG.gemini_text_temperature },
    });

    let model = &CONFIG.gemini_vision_model;
    log_llm_timing("gemini", model, "text_generation", None, || async {
        let response = call_gemini_api(
            model,
            payload,
            Duration::from_secs(CONFIG.text_timeout_secs),
        )
        .await?;
        Ok(extract_text(&response))
    })
    .await
}

pub async fn call_image_generation(prompt: &str, images: &[&ImageFile]) -> Result<GeminiResponse> {
    let parts = build_content_parts(prompt, images);
    let payload = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] },
    });

    let model = &CONFIG.gemini_image_model;
    let metadata = json!({ "imageCount": images.len() });
    log_llm_timing("gemini", model, "image_generation", Some(metadata), || async {
        call_gemini_api(
            model,
            payload,
            Duration::from_secs(CONFIG.synthesis_timeout_secs),
        )
        .await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_from(value: Value) -> GeminiResponse {
        serde_json::from_value(value).expect("valid response fixture")
    }

    #[test]
    fn extracts_first_image_across_parts() {
        let encoded = general_purpose::STANDARD.encode([1u8, 2, 3]);
        let response = response_from(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "here you go" },
                    { "inlineData": { "mimeType": "image/png", "data": encoded } },
                    { "inlineData": { "mimeType": "image/png", "data": "unused" } }
                ] }
            }]
        }));

        assert_eq!(extract_first_image(&response), Some(vec![1, 2, 3]));
    }

    #[test]
    fn ignores_non_image_inline_data() {
        let encoded = general_purpose::STANDARD.encode([9u8]);
        let response = response_from(json!({
            "candidates": [{
                "content": { "parts": [
                    { "inlineData": { "mimeType": "application/pdf", "data": encoded } }
                ] }
            }]
        }));

        assert_eq!(extract_first_image(&response), None);
    }

    #[test]
    fn joins_text_parts_and_skips_blank_ones() {
        let response = response_from(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "first" },
                    { "text": "   " },
                    { "text": "second" }
                ] }
            }]
        }));

        assert_eq!(extract_text(&response), "first\nsecond");
    }

    #[test]
    fn reports_finish_reason_of_first_candidate() {
        let response = response_from(json!({
            "candidates": [
                { "finishReason": "IMAGE_SAFETY" },
                { "finishReason": "STOP" }
            ]
        }));
        assert_eq!(first_finish_reason(&response), "IMAGE_SAFETY");

        let empty = response_from(json!({ "candidates": [] }));
        assert_eq!(first_finish_reason(&empty), "N/A");
    }

    #[test]
    fn builds_text_part_first_then_inline_images() {
        let person = ImageFile::new(vec![0u8; 4], "image/jpeg");
        let extra = ImageFile::new(vec![1u8; 4], "image/png");
        let parts = build_content_parts("the prompt", &[&person, &extra]);

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["text"], "the prompt");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[2]["inlineData"]["mimeType"], "image/png");
    }

    #[test]
    fn summarizes_structured_error_bodies() {
        let (message, summary) =
            summarize_error_body(r#"{"error": {"message": "quota exceeded"}}"#);
        assert_eq!(message.as_deref(), Some("quota exceeded"));
        assert!(summary.contains("quota exceeded"));

        let (message, summary) = summarize_error_body("");
        assert!(message.is_none());
        assert_eq!(summary, "empty response body");
    }

    #[test]
    fn truncates_long_error_bodies() {
        let body = "x".repeat(ERROR_BODY_LIMIT + 50);
        let (_, summary) = summarize_error_body(&body);
        assert!(summary.ends_with("... (truncated)"));
    }
}
