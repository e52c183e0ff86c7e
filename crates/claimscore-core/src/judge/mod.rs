//! Judge capability used for claim extraction, claim comparison and
//! direct quality scoring.
//!
//! The judge exposes a fixed set of operations, one trait method each.
//! Backends implement [`Judge`]; the engine only ever talks to a judge
//! through [`JudgeClient`], which applies cancellation and bounds the
//! number of calls in flight.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use claimscore_core::judge::{mock::MockJudge, JudgeClient};
//!
//! # async fn demo() -> claimscore_core::error::Result<()> {
//! let client = JudgeClient::new(Arc::new(MockJudge::new())).with_concurrency(4);
//! let reply = client.compare_claims("The sky is blue", "The sky is blue").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod openai;
pub mod prompts;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::cancel::run_cancellable;
use crate::error::{EvalError, Result};
use crate::trace_time;

/// The fixed set of operations a judge can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgeOperation {
    ExtractClaims,
    CompareClaims,
    Groundedness,
    Relevance,
    Coherence,
    Fluency,
    RetrievalScore,
    Similarity,
}

impl JudgeOperation {
    pub const ALL: [JudgeOperation; 8] = [
        JudgeOperation::ExtractClaims,
        JudgeOperation::CompareClaims,
        JudgeOperation::Groundedness,
        JudgeOperation::Relevance,
        JudgeOperation::Coherence,
        JudgeOperation::Fluency,
        JudgeOperation::RetrievalScore,
        JudgeOperation::Similarity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JudgeOperation::ExtractClaims => "ExtractClaims",
            JudgeOperation::CompareClaims => "CompareClaims",
            JudgeOperation::Groundedness => "Groundedness",
            JudgeOperation::Relevance => "Relevance",
            JudgeOperation::Coherence => "Coherence",
            JudgeOperation::Fluency => "Fluency",
            JudgeOperation::RetrievalScore => "RetrievalScore",
            JudgeOperation::Similarity => "Similarity",
        }
    }
}

impl fmt::Display for JudgeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six direct quality questions asked of the judge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Groundedness,
    Relevance,
    Coherence,
    Fluency,
    RetrievalScore,
    Similarity,
}

impl Quality {
    pub const ALL: [Quality; 6] = [
        Quality::Groundedness,
        Quality::Relevance,
        Quality::Coherence,
        Quality::Fluency,
        Quality::RetrievalScore,
        Quality::Similarity,
    ];

    pub fn operation(self) -> JudgeOperation {
        match self {
            Quality::Groundedness => JudgeOperation::Groundedness,
            Quality::Relevance => JudgeOperation::Relevance,
            Quality::Coherence => JudgeOperation::Coherence,
            Quality::Fluency => JudgeOperation::Fluency,
            Quality::RetrievalScore => JudgeOperation::RetrievalScore,
            Quality::Similarity => JudgeOperation::Similarity,
        }
    }
}

/// Inputs shared by every direct quality question
#[derive(Debug, Clone, Copy)]
pub struct QualityInputs<'a> {
    pub question: &'a str,
    /// Retrieved chunk texts joined with newlines
    pub context: &'a str,
    pub answer: &'a str,
    pub ground_truth: &'a str,
}

impl<'a> QualityInputs<'a> {
    /// Template variables in the order prompts reference them
    pub fn variables(&self) -> [(&'static str, &'a str); 4] {
        [
            ("question", self.question),
            ("context", self.context),
            ("answer", self.answer),
            ("ground_truth", self.ground_truth),
        ]
    }
}

/// A generative-text backend able to perform every [`JudgeOperation`].
///
/// Every method returns the judge's raw reply; interpreting it (claim
/// parsing, score extraction) is the caller's job. Failures are reported
/// as [`EvalError::Oracle`].
#[async_trait]
pub trait Judge: Send + Sync {
    /// Extract claims from `[id] sentence` numbered text
    async fn extract_claims(&self, numbered_text: &str) -> Result<String>;

    /// Compare two claims; the reply embeds a 1-5 score
    async fn compare_claims(&self, claim_1: &str, claim_2: &str) -> Result<String>;

    async fn groundedness(&self, inputs: &QualityInputs<'_>) -> Result<String>;

    async fn relevance(&self, inputs: &QualityInputs<'_>) -> Result<String>;

    async fn coherence(&self, inputs: &QualityInputs<'_>) -> Result<String>;

    async fn fluency(&self, inputs: &QualityInputs<'_>) -> Result<String>;

    async fn retrieval_score(&self, inputs: &QualityInputs<'_>) -> Result<String>;

    async fn similarity(&self, inputs: &QualityInputs<'_>) -> Result<String>;
}

/// Cancellation-aware, concurrency-bounded handle to a [`Judge`].
///
/// Clones share the same judge, token and permit pool.
#[derive(Clone)]
pub struct JudgeClient {
    judge: Arc<dyn Judge>,
    cancel: CancellationToken,
    permits: Arc<Semaphore>,
}

impl JudgeClient {
    /// Create a client allowing one call in flight at a time
    pub fn new(judge: Arc<dyn Judge>) -> Self {
        Self {
            judge,
            cancel: CancellationToken::new(),
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Allow up to `concurrency` judge calls in flight (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(concurrency.max(1)));
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub async fn extract_claims(&self, numbered_text: &str) -> Result<String> {
        self.call(
            JudgeOperation::ExtractClaims,
            self.judge.extract_claims(numbered_text),
        )
        .await
    }

    pub async fn compare_claims(&self, claim_1: &str, claim_2: &str) -> Result<String> {
        self.call(
            JudgeOperation::CompareClaims,
            self.judge.compare_claims(claim_1, claim_2),
        )
        .await
    }

    /// Ask one of the six direct quality questions
    pub async fn assess(&self, quality: Quality, inputs: &QualityInputs<'_>) -> Result<String> {
        let judge = &self.judge;
        let operation = quality.operation();
        match quality {
            Quality::Groundedness => self.call(operation, judge.groundedness(inputs)).await,
            Quality::Relevance => self.call(operation, judge.relevance(inputs)).await,
            Quality::Coherence => self.call(operation, judge.coherence(inputs)).await,
            Quality::Fluency => self.call(operation, judge.fluency(inputs)).await,
            Quality::RetrievalScore => self.call(operation, judge.retrieval_score(inputs)).await,
            Quality::Similarity => self.call(operation, judge.similarity(inputs)).await,
        }
    }

    async fn call<T>(
        &self,
        operation: JudgeOperation,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(EvalError::Cancelled),
            permit = self.permits.acquire() => {
                permit.map_err(|e| EvalError::oracle(operation, e))?
            }
        };

        let start = Instant::now();
        let result = run_cancellable(&self.cancel, fut).await;
        trace_time!(start, "judge_call", operation = operation.name());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockJudge;
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_operation_names_are_unique() {
        let names: std::collections::HashSet<_> =
            JudgeOperation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), JudgeOperation::ALL.len());
    }

    #[test]
    fn test_quality_maps_to_operation() {
        assert_eq!(
            Quality::RetrievalScore.operation(),
            JudgeOperation::RetrievalScore
        );
        assert_eq!(Quality::ALL.len(), 6);
    }

    #[tokio::test]
    async fn test_client_dispatches_quality() {
        let judge = Arc::new(MockJudge::new().with_reply(JudgeOperation::Fluency, "5 fluent"));
        let client = JudgeClient::new(judge.clone());
        let inputs = QualityInputs {
            question: "q",
            context: "c",
            answer: "a",
            ground_truth: "g",
        };

        let reply = client.assess(Quality::Fluency, &inputs).await.unwrap();
        assert_eq!(reply, "5 fluent");
        assert_eq!(judge.call_count(JudgeOperation::Fluency), 1);
        assert_eq!(judge.call_count(JudgeOperation::Coherence), 0);
    }

    #[tokio::test]
    async fn test_client_refuses_calls_after_cancel() {
        let judge = Arc::new(MockJudge::new());
        let client = JudgeClient::new(judge.clone());
        client.cancellation().cancel();

        let result = client.compare_claims("a", "b").await;
        assert!(matches!(result, Err(EvalError::Cancelled)));
        assert_eq!(judge.call_count(JudgeOperation::CompareClaims), 0);
    }

    struct SlowJudge {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Judge for SlowJudge {
        async fn extract_claims(&self, _numbered_text: &str) -> Result<String> {
            unimplemented!()
        }

        async fn compare_claims(&self, _claim_1: &str, _claim_2: &str) -> Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("3".to_string())
        }

        async fn groundedness(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
            unimplemented!()
        }

        async fn relevance(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
            unimplemented!()
        }

        async fn coherence(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
            unimplemented!()
        }

        async fn fluency(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
            unimplemented!()
        }

        async fn retrieval_score(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
            unimplemented!()
        }

        async fn similarity(&self, _inputs: &QualityInputs<'_>) -> Result<String> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let judge = Arc::new(SlowJudge {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let client = JudgeClient::new(judge.clone()).with_concurrency(2);

        let calls = (0..6).map(|_| client.compare_claims("a", "b"));
        let results = futures::future::join_all(calls).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert!(judge.peak.load(Ordering::SeqCst) <= 2);
    }
}
