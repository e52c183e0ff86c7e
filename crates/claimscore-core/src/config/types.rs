//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Top-level configuration (`claimscore.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Judge backend settings
    #[serde(default)]
    pub judge: JudgeConfig,

    /// RAG pipeline adapter settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Engine settings
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Run history settings
    #[serde(default)]
    pub results: ResultsConfig,
}

/// OpenAI-compatible judge backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL up to and including the API version segment
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout enforced by the HTTP client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where generated answers come from.
///
/// `recording` takes precedence over `endpoint` when both are set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Base URL of an HTTP pipeline exposing `/generate` and `/load`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// File of pre-recorded answers to replay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            recording: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationConfig {
    /// Maximum judge calls in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Reuse claim-pair scores within one run
    #[serde(default = "default_true")]
    pub memoize_similarity: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            memoize_similarity: true,
        }
    }
}

/// Run history settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultsConfig {
    /// Directory holding `runs.jsonl` and labelled report files
    #[serde(default = "default_results_dir")]
    pub dir: String,

    /// Append each finished run to the results log
    #[serde(default = "default_true")]
    pub record: bool,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            dir: default_results_dir(),
            record: true,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_concurrency() -> usize {
    1
}

fn default_results_dir() -> String {
    ".claimscore".to_string()
}

fn default_true() -> bool {
    true
}
