//! Pipeline that replays answers recorded earlier.
//!
//! The recording is a JSON (or `.yaml`/`.yml`) list:
//!
//! ```json
//! [{"question": "...", "answer": "...", "contexts": ["chunk one", "chunk two"]}]
//! ```
//!
//! Chunks are numbered from 1 in list order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Generation, RagContext, RagPipeline};
use crate::bail_malformed;
use crate::error::{EvalError, Result};

#[derive(Debug, Deserialize)]
struct RecordedAnswer {
    #[serde(alias = "Question")]
    question: String,
    #[serde(alias = "Answer")]
    answer: String,
    #[serde(default, alias = "Contexts")]
    contexts: Vec<String>,
}

#[derive(Debug, Default)]
pub struct RecordedPipeline {
    answers: HashMap<String, Generation>,
}

impl RecordedPipeline {
    /// Read a recording file
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let records: Vec<RecordedAnswer> = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| EvalError::malformed(path, e))?,
            _ => serde_json::from_str(&content).map_err(|e| EvalError::malformed(path, e))?,
        };

        let mut answers = HashMap::with_capacity(records.len());
        for record in records {
            if answers.contains_key(&record.question) {
                bail_malformed!(path, format!("duplicate question: {}", record.question));
            }
            let contexts = record
                .contexts
                .into_iter()
                .zip(1..)
                .map(|(text, chunk_number)| RagContext { text, chunk_number })
                .collect();
            answers.insert(
                record.question,
                Generation {
                    answer: record.answer,
                    contexts,
                },
            );
        }

        tracing::debug!(path = %path.display(), answers = answers.len(), "loaded recording");
        Ok(Self { answers })
    }

    /// Build directly from `(question, generation)` pairs
    pub fn from_answers(answers: impl IntoIterator<Item = (String, Generation)>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[async_trait]
impl RagPipeline for RecordedPipeline {
    async fn generate(&self, query: &str) -> Result<Generation> {
        self.answers
            .get(query)
            .cloned()
            .ok_or_else(|| EvalError::pipeline(format!("no recorded answer for question: {}", query)))
    }

    async fn load(&self, path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "recorded pipeline ignores ingestion");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_json_recording_numbers_chunks() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "answers.json",
            r#"[{"question": "Who loves Juliet?", "answer": "Romeo.", "contexts": ["Romeo loves Juliet.", "Juliet is a Capulet."]}]"#,
        );

        let pipeline = RecordedPipeline::open(&path).unwrap();
        let generation = pipeline.generate("Who loves Juliet?").await.unwrap();

        assert_eq!(generation.answer, "Romeo.");
        assert_eq!(generation.contexts[0].chunk_number, 1);
        assert_eq!(generation.contexts[1].chunk_number, 2);
        assert_eq!(generation.contexts[1].text, "Juliet is a Capulet.");
    }

    #[tokio::test]
    async fn test_yaml_recording() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "answers.yaml",
            "- question: Where is Verona?\n  answer: Italy.\n",
        );

        let pipeline = RecordedPipeline::open(&path).unwrap();
        let generation = pipeline.generate("Where is Verona?").await.unwrap();
        assert!(generation.contexts.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_question_is_pipeline_error() {
        let pipeline = RecordedPipeline::default();
        let err = pipeline.generate("anything").await.unwrap_err();
        assert!(matches!(err, EvalError::Pipeline { .. }));
    }

    #[tokio::test]
    async fn test_load_is_noop() {
        let pipeline = RecordedPipeline::default();
        pipeline.load(Path::new("missing.txt")).await.unwrap();
    }

    #[test]
    fn test_malformed_recording() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "answers.json", r#"{"question": "not a list"}"#);
        let err = RecordedPipeline::open(&path).unwrap_err();
        assert!(matches!(err, EvalError::MalformedInput { .. }));
    }

    #[test]
    fn test_duplicate_question_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "answers.json",
            r#"[{"question": "q", "answer": "a"}, {"question": "q", "answer": "b"}]"#,
        );
        let err = RecordedPipeline::open(&path).unwrap_err();
        assert!(matches!(err, EvalError::MalformedInput { .. }));
    }
}
