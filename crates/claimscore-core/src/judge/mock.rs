//! Scripted judge for tests and dry runs.
//!
//! By default the mock treats every numbered sentence as one claim,
//! scores identical claims 5 and everything else 1, and answers every
//! quality question with 3.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Judge, JudgeOperation, QualityInputs};
use crate::error::{EvalError, Result};

type Comparator = dyn Fn(&str, &str) -> u8 + Send + Sync;

pub struct MockJudge {
    extractions: Vec<(String, String)>,
    comparator: Box<Comparator>,
    replies: HashMap<JudgeOperation, String>,
    failures: HashSet<JudgeOperation>,
    calls: Mutex<HashMap<JudgeOperation, usize>>,
}

impl Default for MockJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockJudge {
    pub fn new() -> Self {
        Self {
            extractions: Vec::new(),
            comparator: Box::new(|a, b| if a == b { 5 } else { 1 }),
            replies: HashMap::new(),
            failures: HashSet::new(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Reply with `reply` when the numbered text contains `needle`.
    ///
    /// Scripts are checked in the order they were added.
    pub fn with_extraction(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.extractions.push((needle.into(), reply.into()));
        self
    }

    /// Score claim pairs with `comparator`; the reply embeds the score
    pub fn with_comparator(
        mut self,
        comparator: impl Fn(&str, &str) -> u8 + Send + Sync + 'static,
    ) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    /// Fixed reply for a quality operation
    pub fn with_reply(mut self, operation: JudgeOperation, reply: impl Into<String>) -> Self {
        self.replies.insert(operation, reply.into());
        self
    }

    /// Make every call to `operation` fail
    pub fn failing(mut self, operation: JudgeOperation) -> Self {
        self.failures.insert(operation);
        self
    }

    /// Number of times `operation` has been invoked
    pub fn call_count(&self, operation: JudgeOperation) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(&operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn record(&self, operation: JudgeOperation) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(operation).or_insert(0) += 1;
        }
        if self.failures.contains(&operation) {
            return Err(EvalError::oracle(operation, "scripted failure"));
        }
        Ok(())
    }

    fn quality(&self, operation: JudgeOperation) -> Result<String> {
        self.record(operation)?;
        Ok(self
            .replies
            .get(&operation)
            .cloned()
            .unwrap_or_else(|| "3".to_string()))
    }
}

/// `[id] sentence` lines become `sentence [id]` claims
fn sentences_as_claims(numbered_text: &str) -> String {
    numbered_text
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let rest = line.strip_prefix('[')?;
            let (id, sentence) = rest.split_once(']')?;
            let sentence = sentence.trim().trim_end_matches(['.', '!', '?']);
            (!sentence.is_empty()).then(|| format!("{} [{}]", sentence, id))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Judge for MockJudge {
    async fn extract_claims(&self, numbered_text: &str) -> Result<String> {
        self.record(JudgeOperation::ExtractClaims)?;
        let scripted = self
            .extractions
            .iter()
            .find(|(needle, _)| numbered_text.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());
        Ok(scripted.unwrap_or_else(|| sentences_as_claims(numbered_text)))
    }

    async fn compare_claims(&self, claim_1: &str, claim_2: &str) -> Result<String> {
        self.record(JudgeOperation::CompareClaims)?;
        let score = (self.comparator)(claim_1, claim_2);
        Ok(format!("{} - scripted comparison", score))
    }

    async fn groundedness(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
        self.quality(JudgeOperation::Groundedness)
    }

    async fn relevance(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
        self.quality(JudgeOperation::Relevance)
    }

    async fn coherence(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
        self.quality(JudgeOperation::Coherence)
    }

    async fn fluency(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
        self.quality(JudgeOperation::Fluency)
    }

    async fn retrieval_score(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
        self.quality(JudgeOperation::RetrievalScore)
    }

    async fn similarity(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
        self.quality(JudgeOperation::Similarity)
    }
}
