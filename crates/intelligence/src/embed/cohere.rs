//! Cohere embed API provider
//!
//! Calls `POST {endpoint}/v1/embed` with `input_type = "search_document"`.
//! The network path is compiled only with the `cohere` feature; without it,
//! every call returns `FeatureDisabled("cohere")`.

use serde_json::Value;

use super::{EmbedError, Embedder};

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "COHERE_API_KEY";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "embed-english-v3.0";

/// Default API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.cohere.com";

/// Cohere accepts at most this many texts per request.
pub const MAX_BATCH: usize = 96;

/// Output dimension of the published Cohere v3 embedding models.
pub fn model_dimension(model: &str) -> Option<usize> {
    match model {
        "embed-english-v3.0" | "embed-multilingual-v3.0" => Some(1024),
        "embed-english-light-v3.0" | "embed-multilingual-light-v3.0" => Some(384),
        _ => None,
    }
}

/// Embedder backed by the Cohere HTTP API.
#[allow(dead_code)] // url, api_key and timeout are read behind #[cfg(feature = "cohere")]
#[derive(Debug, Clone)]
pub struct CohereEmbedder {
    url: String,
    model: String,
    api_key: Option<String>,
    timeout: std::time::Duration,
    dimension: usize,
}

impl CohereEmbedder {
    /// Create an embedder for `model`.
    ///
    /// `api_key` falls back to `COHERE_API_KEY`. `dimension` is required
    /// only for models whose size is not known up front.
    pub fn new(
        model: Option<&str>,
        api_key: Option<&str>,
        dimension: Option<usize>,
        timeout_ms: u64,
    ) -> Self {
        let model = model.unwrap_or(DEFAULT_MODEL).to_string();
        let api_key = api_key
            .map(str::to_string)
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty());
        let dimension = model_dimension(&model).or(dimension).unwrap_or(1024);
        CohereEmbedder {
            url: format!("{}/v1/embed", DEFAULT_ENDPOINT),
            model,
            api_key,
            timeout: std::time::Duration::from_millis(timeout_ms),
            dimension,
        }
    }

    /// Point the embedder at a different base URL (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.url = format!("{}/v1/embed", endpoint.trim_end_matches('/'));
        self
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether an API key was found.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[cfg(feature = "cohere")]
    fn call_api(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(EmbedError::MissingApiKey(API_KEY_ENV))?;
        let body = serde_json::json!({
            "model": self.model,
            "texts": texts,
            "input_type": "search_document",
            "embedding_types": ["float"],
        });
        let start = std::time::Instant::now();
        let json = super::http::retry_once(
            || super::http::post_json(&self.url, key, self.timeout, &body),
            "cohere_embed",
        )?;
        tracing::debug!(
            target: "ragsearch::embed",
            model = %self.model,
            texts = texts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Cohere embed call"
        );
        parse_embeddings(&json, texts.len(), self.dimension)
    }

    #[cfg(not(feature = "cohere"))]
    fn call_api(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Err(EmbedError::FeatureDisabled("cohere"))
    }
}

/// Extract embeddings from a Cohere response body.
///
/// Accepts both `{"embeddings": [[..]]}` and the typed form
/// `{"embeddings": {"float": [[..]]}}`.
pub fn parse_embeddings(
    json: &Value,
    expected_count: usize,
    dimension: usize,
) -> Result<Vec<Vec<f32>>, EmbedError> {
    let embeddings = json.get("embeddings").ok_or_else(|| {
        let msg = json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("missing 'embeddings' field");
        EmbedError::Parse(msg.to_string())
    })?;
    let rows = embeddings
        .as_array()
        .or_else(|| embeddings.get("float").and_then(Value::as_array))
        .ok_or_else(|| EmbedError::Parse("'embeddings' is not an array".into()))?;

    if rows.len() != expected_count {
        return Err(EmbedError::Parse(format!(
            "expected {} embeddings, got {}",
            expected_count,
            rows.len()
        )));
    }

    rows.iter()
        .map(|row| {
            let values = row
                .as_array()
                .ok_or_else(|| EmbedError::Parse("embedding is not an array".into()))?;
            let vector = values
                .iter()
                .map(|v| {
                    v.as_f64()
                        .map(|f| f as f32)
                        .ok_or_else(|| EmbedError::Parse("non-numeric embedding value".into()))
                })
                .collect::<Result<Vec<f32>, _>>()?;
            if vector.len() != dimension {
                return Err(EmbedError::DimensionMismatch {
                    expected: dimension,
                    got: vector.len(),
                });
            }
            Ok(vector)
        })
        .collect()
}

impl Embedder for CohereEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut out = self.embed_batch(&[text])?;
        out.pop()
            .ok_or_else(|| EmbedError::Parse("empty embeddings response".into()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(EmbedError::EmptyInput);
        }
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            out.extend(self.call_api(batch)?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "cohere"
    }
}
