//! Remote extractor adapter.
//!
//! Wraps the LLM completion call and classifies its failures: quota
//! exhaustion is a value callers can react to (substitute the regex
//! fallback), everything else propagates as [`RemoteError`] and should abort
//! the batch rather than be masked as missing data.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::models::config::RemoteConfig;
use crate::models::record::{BolRecord, DocumentKind, ExtractionRecord, WaybillRecord};

mod schema;

/// Classified result of a remote extraction call.
#[derive(Debug)]
pub enum RemoteOutcome {
    /// The collaborator produced a parsable record.
    Extracted(ExtractionRecord),
    /// The upstream plan/credits are exhausted; not terminal for the batch.
    QuotaExhausted,
}

/// Something that can turn OCR text into a structured record.
///
/// Implemented by [`RemoteExtractor`]; tests substitute stubs.
#[allow(async_fn_in_trait)]
pub trait StructuredExtractor {
    async fn extract(
        &self,
        text: &str,
        kind: DocumentKind,
    ) -> Result<RemoteOutcome, RemoteError>;
}

/// OpenAI-backed structured extractor.
pub struct RemoteExtractor {
    client: reqwest::Client,
    config: RemoteConfig,
    api_key: String,
}

impl RemoteExtractor {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(RemoteError::MissingCredential)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    async fn call(&self, text: &str, kind: DocumentKind) -> Result<RemoteOutcome, RemoteError> {
        // Keep the payload small; long OCR blobs add cost without adding fields
        let snippet: String = text.chars().take(self.config.max_input_chars).collect();

        let payload = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": schema::system_prompt(kind) },
                { "role": "user", "content": snippet },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": schema::response_schema(kind),
            },
        });

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            debug!(attempt, model = %self.config.model, "sending extraction request");

            let response = self
                .client
                .post(&self.config.endpoint)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            let retry_after = parse_retry_after(&response);
            let body_text = response.text().await?;
            let body: Value = serde_json::from_str(&body_text).unwrap_or(Value::Null);

            if status.is_success() {
                let content = body["choices"][0]["message"]["content"]
                    .as_str()
                    .ok_or_else(|| {
                        RemoteError::MalformedResponse(
                            "completion has no message content".to_string(),
                        )
                    })?;
                let value = coerce_json(content)?;
                return Ok(RemoteOutcome::Extracted(parse_record(kind, value)?));
            }

            // Fail soft on quota problems: the caller substitutes the fallback
            if matches!(
                status,
                StatusCode::TOO_MANY_REQUESTS | StatusCode::BAD_REQUEST
            ) && is_quota_error(&body)
            {
                return Ok(RemoteOutcome::QuotaExhausted);
            }

            // Gentle backoff for real throttling and server errors
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                if attempt >= self.config.max_attempts {
                    return Err(RemoteError::RetriesExhausted {
                        attempts: attempt,
                        status: status.as_u16(),
                    });
                }
                let delay = retry_after.unwrap_or_else(|| {
                    self.config.base_backoff_secs * 2f64.powi(attempt as i32 - 1) + jitter_secs()
                });
                warn!(
                    %status,
                    attempt,
                    max_attempts = self.config.max_attempts,
                    delay_secs = delay,
                    "retryable API status, backing off"
                );
                tokio::time::sleep(Duration::from_secs_f64(delay)).await;
                continue;
            }

            // Other client errors: surface a snippet and stop
            return Err(RemoteError::Api {
                status: status.as_u16(),
                detail: body_text.chars().take(300).collect(),
            });
        }
    }
}

impl StructuredExtractor for RemoteExtractor {
    async fn extract(
        &self,
        text: &str,
        kind: DocumentKind,
    ) -> Result<RemoteOutcome, RemoteError> {
        self.call(text, kind).await
    }
}

/// Parse completion text that may carry prose around the JSON body by taking
/// the outermost `{...}` span.
pub fn coerce_json(content: &str) -> Result<Value, RemoteError> {
    if let Ok(value) = serde_json::from_str(content) {
        return Ok(value);
    }

    let start = content.find('{');
    let end = content.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if end > start {
            return serde_json::from_str(&content[start..=end])
                .map_err(|e| RemoteError::MalformedResponse(e.to_string()));
        }
    }

    Err(RemoteError::MalformedResponse(
        "no JSON object in completion".to_string(),
    ))
}

fn parse_record(kind: DocumentKind, value: Value) -> Result<ExtractionRecord, RemoteError> {
    match kind {
        DocumentKind::Bol => serde_json::from_value::<BolRecord>(value)
            .map(ExtractionRecord::Bol)
            .map_err(|e| RemoteError::MalformedResponse(e.to_string())),
        DocumentKind::Waybill => serde_json::from_value::<WaybillRecord>(value)
            .map(ExtractionRecord::Waybill)
            .map_err(|e| RemoteError::MalformedResponse(e.to_string())),
    }
}

fn is_quota_error(body: &Value) -> bool {
    let error = &body["error"];
    if error["type"].as_str() == Some("insufficient_quota") {
        return true;
    }
    error["message"]
        .as_str()
        .is_some_and(|m| m.to_lowercase().contains("quota"))
}

/// Up to 0.6s of backoff spread, seeded from the clock, so simultaneous
/// retries do not land in lockstep.
fn jitter_secs() -> f64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    f64::from(nanos % 600) / 1000.0
}

fn parse_retry_after(response: &reqwest::Response) -> Option<f64> {
    response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coerce_plain_json() {
        let value = coerce_json(r#"{"bol_number": "AB123456"}"#).unwrap();
        assert_eq!(value["bol_number"], "AB123456");
    }

    #[test]
    fn test_coerce_json_with_surrounding_prose() {
        let content = r#"Here is the extraction:
{"bol_number": "AB123456", "total_weight": 1200}
Let me know if you need anything else."#;
        let value = coerce_json(content).unwrap();
        assert_eq!(value["total_weight"], 1200);
    }

    #[test]
    fn test_coerce_without_json_fails() {
        assert!(matches!(
            coerce_json("I could not read the document."),
            Err(RemoteError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_quota_classification() {
        let body: Value = serde_json::from_str(
            r#"{"error": {"type": "insufficient_quota", "message": "..."}}"#,
        )
        .unwrap();
        assert!(is_quota_error(&body));

        let body: Value = serde_json::from_str(
            r#"{"error": {"type": "requests", "message": "You exceeded your current quota"}}"#,
        )
        .unwrap();
        assert!(is_quota_error(&body));

        let body: Value =
            serde_json::from_str(r#"{"error": {"type": "invalid_api_key", "message": "bad key"}}"#)
                .unwrap();
        assert!(!is_quota_error(&body));
    }

    #[test]
    fn test_jitter_stays_within_backoff_spread() {
        for _ in 0..32 {
            let jitter = jitter_secs();
            assert!((0.0..0.6).contains(&jitter));
        }
    }

    #[test]
    fn test_parse_record_by_kind() {
        let value: Value =
            serde_json::from_str(r#"{"date": "2024-03-14", "gross_weight": 42000}"#).unwrap();
        let record = parse_record(DocumentKind::Waybill, value).unwrap();
        match record {
            ExtractionRecord::Waybill(w) => assert_eq!(w.gross_weight, Some(42000.0)),
            _ => panic!("expected waybill record"),
        }
    }
}
