//! Judge backed by an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;

use super::prompts::{self, SYSTEM_PROMPT};
use super::{Judge, JudgeOperation, QualityInputs};
use crate::config::JudgeConfig;
use crate::error::{EvalError, Result};

/// Chat-completions judge client.
///
/// Retries and rate limiting are left to the endpoint or a proxy in front
/// of it; this client only enforces the configured request timeout.
pub struct OpenAiJudge {
    client: reqwest::Client,
    model: String,
    api_base: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiJudge {
    /// Build a judge from config, reading the API key from `api_key_env`
    pub fn from_config(config: &JudgeConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            EvalError::invalid_value(
                "judge api key",
                format!(
                    "environment variable {} must be set",
                    config.api_key_env
                ),
            )
        })?;
        Self::with_api_key(config, api_key)
    }

    /// Build a judge with an explicit API key
    pub fn with_api_key(config: &JudgeConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EvalError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, operation: JudgeOperation, variables: &[(&str, &str)]) -> Result<String> {
        let prompt = prompts::render(operation, variables);

        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EvalError::oracle(operation, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EvalError::oracle(
                operation,
                format!("API request failed: {} - {}", status, error_text),
            ));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EvalError::oracle(operation, format!("invalid response body: {}", e)))?;

        let content = response_json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| EvalError::oracle(operation, "invalid chat completion format"))?;

        tracing::debug!(operation = operation.name(), reply = content, "judge reply");
        Ok(content.to_string())
    }
}

#[async_trait]
impl Judge for OpenAiJudge {
    async fn extract_claims(&self, numbered_text: &str) -> Result<String> {
        self.complete(JudgeOperation::ExtractClaims, &[("response", numbered_text)])
            .await
    }

    async fn compare_claims(&self, claim_1: &str, claim_2: &str) -> Result<String> {
        self.complete(
            JudgeOperation::CompareClaims,
            &[("claim_1", claim_1), ("claim_2", claim_2)],
        )
        .await
    }

    async fn groundedness(&self, inputs: &QualityInputs<'_>) -> Result<String> {
        self.complete(JudgeOperation::Groundedness, &inputs.variables())
            .await
    }

    async fn relevance(&self, inputs: &QualityInputs<'_>) -> Result<String> {
        self.complete(JudgeOperation::Relevance, &inputs.variables())
            .await
    }

    async fn coherence(&self, inputs: &QualityInputs<'_>) -> Result<String> {
        self.complete(JudgeOperation::Coherence, &inputs.variables())
            .await
    }

    async fn fluency(&self, inputs: &QualityInputs<'_>) -> Result<String> {
        self.complete(JudgeOperation::Fluency, &inputs.variables())
            .await
    }

    async fn retrieval_score(&self, inputs: &QualityInputs<'_>) -> Result<String> {
        self.complete(JudgeOperation::RetrievalScore, &inputs.variables())
            .await
    }

    async fn similarity(&self, inputs: &QualityInputs<'_>) -> Result<String> {
        self.complete(JudgeOperation::Similarity, &inputs.variables())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> JudgeConfig {
        JudgeConfig {
            api_base: format!("{}/v1", server.uri()),
            ..JudgeConfig::default()
        }
    }

    fn chat_reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    #[tokio::test]
    async fn test_compare_claims_success() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v1/chat/completions"))
            .and(matchers::header("Authorization", "Bearer test-key"))
            .and(matchers::body_string_contains("Claim 1: The sky is blue"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_reply("4 - same fact")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let judge = OpenAiJudge::with_api_key(&config_for(&mock_server), "test-key").unwrap();
        let reply = judge
            .compare_claims("The sky is blue", "Sky is blue")
            .await
            .unwrap();

        assert_eq!(reply, "4 - same fact");
    }

    #[tokio::test]
    async fn test_request_carries_model_and_prompt() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 1000
            })))
            .and(matchers::body_string_contains("[1] Romeo loves Juliet."))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_reply("Romeo loves Juliet [1]")),
            )
            .mount(&mock_server)
            .await;

        let judge = OpenAiJudge::with_api_key(&config_for(&mock_server), "k").unwrap();
        let reply = judge
            .extract_claims("[1] Romeo loves Juliet.")
            .await
            .unwrap();
        assert_eq!(reply, "Romeo loves Juliet [1]");
    }

    #[tokio::test]
    async fn test_http_error_is_oracle_error() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let judge = OpenAiJudge::with_api_key(&config_for(&mock_server), "k").unwrap();
        let err = judge
            .fluency(&QualityInputs {
                question: "q",
                context: "c",
                answer: "a",
                ground_truth: "g",
            })
            .await
            .unwrap_err();

        match err {
            EvalError::Oracle { operation, reason } => {
                assert_eq!(operation, JudgeOperation::Fluency);
                assert!(reason.contains("429"));
                assert!(reason.contains("rate limited"));
            }
            other => panic!("expected oracle error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_oracle_error() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&mock_server)
            .await;

        let judge = OpenAiJudge::with_api_key(&config_for(&mock_server), "k").unwrap();
        let err = judge.compare_claims("a", "b").await.unwrap_err();
        assert!(matches!(err, EvalError::Oracle { .. }));
        assert!(err.to_string().contains("invalid chat completion format"));
    }

    #[test]
    fn test_missing_api_key_env() {
        let config = JudgeConfig {
            api_key_env: "CLAIMSCORE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..JudgeConfig::default()
        };

        let err = OpenAiJudge::from_config(&config).err().unwrap();
        assert!(matches!(err, EvalError::InvalidValue { .. }));
        assert!(err.to_string().contains("must be set"));
    }
}
