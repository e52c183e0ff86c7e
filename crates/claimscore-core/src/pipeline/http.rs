//! Pipeline reached over HTTP.
//!
//! - `POST {endpoint}/generate` with `{"query": ...}` returns a [`Generation`]
//! - `POST {endpoint}/load` with `{"path": ...}` ingests a document

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::{Generation, RagPipeline};
use crate::config::PipelineConfig;
use crate::error::{EvalError, Result};

pub struct HttpPipeline {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPipeline {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EvalError::Other(format!("failed to build HTTP client: {}", e)))?;
        let endpoint = endpoint.into().trim_end_matches('/').to_string();

        Ok(Self { client, endpoint })
    }

    /// Build from `[pipeline]` config; `endpoint` must be set
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| EvalError::invalid_value("pipeline endpoint", "not configured"))?;
        Self::new(endpoint, Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, route: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.endpoint, route);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EvalError::pipeline(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EvalError::pipeline(format!(
                "{} returned {} - {}",
                url, status, error_text
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl RagPipeline for HttpPipeline {
    async fn generate(&self, query: &str) -> Result<Generation> {
        let response = self
            .post("generate", serde_json::json!({ "query": query }))
            .await?;

        let generation: Generation = response
            .json()
            .await
            .map_err(|e| EvalError::pipeline(format!("invalid generate response: {}", e)))?;

        tracing::debug!(
            answer_len = generation.answer.len(),
            chunks = generation.contexts.len(),
            "pipeline generated answer"
        );
        Ok(generation)
    }

    async fn load(&self, path: &Path) -> Result<()> {
        self.post(
            "load",
            serde_json::json!({ "path": path.display().to_string() }),
        )
        .await?;
        tracing::info!(path = %path.display(), "pipeline ingested document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pipeline(server: &MockServer) -> HttpPipeline {
        HttpPipeline::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_parses_answer_and_contexts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(body_json(serde_json::json!({ "query": "Who loves Juliet?" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "Romeo loves Juliet.",
                "contexts": [
                    { "text": "Romeo loves Juliet.", "chunk_number": 1 },
                    { "text": "Juliet is a Capulet.", "chunk_number": 2 }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generation = pipeline(&server).generate("Who loves Juliet?").await.unwrap();

        assert_eq!(generation.answer, "Romeo loves Juliet.");
        assert_eq!(generation.contexts.len(), 2);
        assert_eq!(generation.contexts[1].chunk_number, 2);
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("index offline"))
            .mount(&server)
            .await;

        let err = pipeline(&server).generate("q").await.unwrap_err();
        match err {
            EvalError::Pipeline { reason } => assert!(reason.contains("index offline")),
            other => panic!("expected pipeline error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = pipeline(&server).generate("q").await.unwrap_err();
        assert!(matches!(err, EvalError::Pipeline { .. }));
    }

    #[tokio::test]
    async fn test_load_posts_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/load"))
            .and(body_json(serde_json::json!({ "path": "docs/romeo.txt" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        pipeline(&server)
            .load(Path::new("docs/romeo.txt"))
            .await
            .unwrap();
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let err = HttpPipeline::from_config(&PipelineConfig::default()).err().unwrap();
        assert!(matches!(err, EvalError::InvalidValue { .. }));
    }
}
