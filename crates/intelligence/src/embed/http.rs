//! HTTP plumbing for remote embedding providers
//!
//! A single POST helper plus a retry wrapper, shared by every provider that
//! speaks JSON over HTTP.

use super::EmbedError;

/// POST a JSON body with bearer auth and return the parsed JSON response.
///
/// Non-2xx statuses and transport failures map to `Network`, except
/// timeouts which map to `Timeout`.
#[cfg(feature = "cohere")]
pub fn post_json(
    url: &str,
    api_key: &str,
    timeout: std::time::Duration,
    body: &serde_json::Value,
) -> Result<serde_json::Value, EmbedError> {
    let body_bytes = serde_json::to_vec(body)
        .map_err(|e| EmbedError::Parse(format!("failed to serialize request: {}", e)))?;

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let mut response = agent
        .post(url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .header("Authorization", &format!("Bearer {}", api_key))
        .send(&body_bytes[..])
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("timed out") || msg.contains("Timeout") {
                EmbedError::Timeout
            } else {
                EmbedError::Network(msg)
            }
        })?;

    let response_text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| EmbedError::Network(format!("failed to read response: {}", e)))?;

    parse_json_body(&response_text)
}

/// Longest response excerpt carried in a parse error, in characters
const EXCERPT_CHARS: usize = 200;

/// Parse a response body as JSON.
///
/// The error keeps the first `EXCERPT_CHARS` characters of the body.
pub fn parse_json_body(text: &str) -> Result<serde_json::Value, EmbedError> {
    serde_json::from_str(text).map_err(|e| {
        EmbedError::Parse(format!(
            "invalid JSON response ({}): {}",
            e,
            text.chars().take(EXCERPT_CHARS).collect::<String>()
        ))
    })
}

/// Whether a failed call is worth repeating.
pub fn is_transient(err: &EmbedError) -> bool {
    matches!(err, EmbedError::Network(_) | EmbedError::Timeout)
}

/// Run `call_fn`, retrying once if the first attempt fails transiently.
///
/// `operation` labels the tracing events.
pub fn retry_once<T>(
    call_fn: impl Fn() -> Result<T, EmbedError>,
    operation: &str,
) -> Result<T, EmbedError> {
    match call_fn() {
        Ok(v) => Ok(v),
        Err(e) if is_transient(&e) => {
            tracing::warn!(
                target: "ragsearch::embed",
                op = operation,
                error = %e,
                "First call failed, retrying"
            );
            call_fn().map_err(|e| {
                tracing::warn!(
                    target: "ragsearch::embed",
                    op = operation,
                    error = %e,
                    "Retry also failed"
                );
                e
            })
        }
        Err(e) => Err(e),
    }
}
