// Dasa Sandbox - platform/ai_http.rs
//
// HTTP implementation of `AiService` on a blocking `reqwest` client.
// Calls are made from job worker threads, never from the UI thread.
//
// One attempt per call, no retries, transport-default timeouts. Every
// failure is mapped to a `ServiceError`; the tool kind turns that into the
// message the user sees. API keys are sent but never traced.

use crate::core::model::{GeneratedImage, ImageInput};
use crate::core::tools::AiService;
use crate::platform::config::AiEndpoints;
use crate::platform::image_io;
use crate::util::constants;
use crate::util::error::ServiceError;
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const OP_OCR: &str = "ocr";
const OP_IMAGE: &str = "text-to-image";
const OP_SUMMARIZE: &str = "summarize";
const OP_TRANSLATE: &str = "translate";

/// Remote AI services over HTTP.
pub struct HttpAiService {
    client: Client,
    endpoints: AiEndpoints,
}

impl HttpAiService {
    pub fn new(endpoints: AiEndpoints) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(format!(
                "{}/{}",
                constants::APP_ID,
                constants::APP_VERSION
            ))
            .build()
            .map_err(|source| ServiceError::Transport {
                operation: "client",
                source,
            })?;
        tracing::debug!(endpoints = ?endpoints, "HTTP AI service ready");
        Ok(Self { client, endpoints })
    }

    fn with_hf_token(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.endpoints.hf_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl AiService for HttpAiService {
    fn extract_text(&self, image: &ImageInput) -> Result<String, ServiceError> {
        let part = multipart::Part::bytes(image.bytes.to_vec()).file_name(image.file_name.clone());
        let form = multipart::Form::new().part("file", part);
        let request = self
            .client
            .post(&self.endpoints.ocr_url)
            .header("apikey", &self.endpoints.ocr_api_key)
            .multipart(form);

        let (status, body) = read_json(OP_OCR, execute(OP_OCR, request)?)?;
        let parsed: OcrResponse = serde_json::from_value(body).map_err(|source| {
            if status.is_success() {
                ServiceError::Decode {
                    operation: OP_OCR,
                    source,
                }
            } else {
                ServiceError::Status {
                    operation: OP_OCR,
                    status: status.as_u16(),
                    body: String::new(),
                }
            }
        })?;
        parsed.into_text()
    }

    fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ServiceError> {
        let request = self
            .with_hf_token(self.client.post(&self.endpoints.image_url))
            .json(&serde_json::json!({ "inputs": prompt }));
        let response = execute(OP_IMAGE, request)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().map_err(|source| ServiceError::Transport {
            operation: OP_IMAGE,
            source,
        })?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                operation: OP_IMAGE,
                status: status.as_u16(),
                body: body_preview(&bytes),
            });
        }
        if bytes.is_empty() {
            return Err(ServiceError::EmptyResult {
                operation: OP_IMAGE,
            });
        }

        let preview = match image_io::decode_image(&bytes) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                tracing::debug!(error = %e, content_type = ?content_type, "Generated image has no preview");
                None
            }
        };

        Ok(GeneratedImage {
            bytes: Arc::from(bytes.to_vec()),
            content_type,
            preview,
        })
    }

    fn summarize(&self, text: &str) -> Result<String, ServiceError> {
        let request = self
            .with_hf_token(self.client.post(&self.endpoints.summarize_url))
            .json(&serde_json::json!({ "inputs": text }));
        let (status, body) = read_json(OP_SUMMARIZE, execute(OP_SUMMARIZE, request)?)?;
        reject_reported_error(OP_SUMMARIZE, status, &body)?;

        body.get(0)
            .and_then(|first| first.get("summary_text"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(ServiceError::EmptyResult {
                operation: OP_SUMMARIZE,
            })
    }

    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError> {
        let mut payload = serde_json::json!({
            "q": text,
            "source": source,
            "target": target,
            "format": "text",
        });
        if let Some(key) = &self.endpoints.translate_api_key {
            payload["api_key"] = Value::String(key.clone());
        }
        let request = self.client.post(&self.endpoints.translate_url).json(&payload);
        let (status, body) = read_json(OP_TRANSLATE, execute(OP_TRANSLATE, request)?)?;
        reject_reported_error(OP_TRANSLATE, status, &body)?;

        let parsed: TranslateResponse =
            serde_json::from_value(body).map_err(|source| ServiceError::Decode {
                operation: OP_TRANSLATE,
                source,
            })?;
        parsed
            .translated_text
            .filter(|s| !s.is_empty())
            .ok_or(ServiceError::EmptyResult {
                operation: OP_TRANSLATE,
            })
    }
}

// =============================================================================
// Wire shapes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrResponse {
    #[serde(default)]
    parsed_results: Option<Vec<OcrParsedResult>>,
    #[serde(default)]
    is_errored_on_processing: Option<bool>,
    /// A string or an array of strings, depending on the failure.
    #[serde(default)]
    error_message: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrParsedResult {
    #[serde(default)]
    parsed_text: Option<String>,
}

impl OcrResponse {
    fn into_text(self) -> Result<String, ServiceError> {
        let message = self.error_message.as_ref().and_then(message_text);
        if self.is_errored_on_processing == Some(true) || message.is_some() {
            return Err(ServiceError::Rejected {
                operation: OP_OCR,
                message: message.unwrap_or_else(|| "OCR processing failed".to_string()),
            });
        }
        self.parsed_results
            .and_then(|results| results.into_iter().next())
            .and_then(|first| first.parsed_text)
            .filter(|t| !t.is_empty())
            .ok_or(ServiceError::EmptyResult { operation: OP_OCR })
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

fn execute(operation: &'static str, request: RequestBuilder) -> Result<Response, ServiceError> {
    tracing::debug!(operation, "Sending AI request");
    let response = request
        .send()
        .map_err(|source| ServiceError::Transport { operation, source })?;
    tracing::debug!(operation, status = response.status().as_u16(), "AI response received");
    Ok(response)
}

/// Read a JSON body. A body that is not JSON is reported as the HTTP status
/// when the status already failed, otherwise as a decode error.
fn read_json(
    operation: &'static str,
    response: Response,
) -> Result<(StatusCode, Value), ServiceError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .map_err(|source| ServiceError::Transport { operation, source })?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => Ok((status, value)),
        Err(source) if status.is_success() => Err(ServiceError::Decode { operation, source }),
        Err(_) => Err(ServiceError::Status {
            operation,
            status: status.as_u16(),
            body: body_preview(&bytes),
        }),
    }
}

/// Turn `{ "error": ... }` into `Rejected` and any other failed status into
/// `Status`.
fn reject_reported_error(
    operation: &'static str,
    status: StatusCode,
    body: &Value,
) -> Result<(), ServiceError> {
    if let Some(message) = body.get("error").and_then(message_text) {
        return Err(ServiceError::Rejected { operation, message });
    }
    if !status.is_success() {
        return Err(ServiceError::Status {
            operation,
            status: status.as_u16(),
            body: body_preview(body.to_string().as_bytes()),
        });
    }
    Ok(())
}

/// Flatten a string or array-of-strings message. Empty means absent.
fn message_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null | Value::Bool(false) => String::new(),
        other => other.to_string(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn body_preview(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.chars().take(constants::MAX_ERROR_BODY_PREVIEW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_text_accepts_string_or_array() {
        assert_eq!(message_text(&json!("bad file")).as_deref(), Some("bad file"));
        assert_eq!(
            message_text(&json!(["E101", "Timed out"])).as_deref(),
            Some("E101; Timed out")
        );
        assert!(message_text(&json!("")).is_none());
        assert!(message_text(&json!(null)).is_none());
    }

    #[test]
    fn test_ocr_response_success() {
        let parsed: OcrResponse = serde_json::from_value(json!({
            "ParsedResults": [{ "ParsedText": "HELLO\r\n" }],
            "IsErroredOnProcessing": false,
            "ErrorMessage": null
        }))
        .unwrap();
        assert_eq!(parsed.into_text().unwrap(), "HELLO\r\n");
    }

    #[test]
    fn test_ocr_response_error_flag() {
        let parsed: OcrResponse = serde_json::from_value(json!({
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["Unable to recognize the file type"]
        }))
        .unwrap();
        match parsed.into_text() {
            Err(ServiceError::Rejected { message, .. }) => {
                assert_eq!(message, "Unable to recognize the file type")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ocr_response_without_text_is_empty() {
        let parsed: OcrResponse = serde_json::from_value(json!({
            "ParsedResults": [{ "ParsedText": "" }]
        }))
        .unwrap();
        assert!(matches!(
            parsed.into_text(),
            Err(ServiceError::EmptyResult { .. })
        ));
    }

    #[test]
    fn test_reported_error_wins_over_status() {
        let body = json!({ "error": "Model is loading" });
        let err = reject_reported_error(OP_SUMMARIZE, StatusCode::SERVICE_UNAVAILABLE, &body)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Rejected { .. }));
    }

    #[test]
    fn test_body_preview_is_bounded() {
        let long = vec![b'x'; constants::MAX_ERROR_BODY_PREVIEW * 2];
        assert_eq!(body_preview(&long).len(), constants::MAX_ERROR_BODY_PREVIEW);
    }
}
