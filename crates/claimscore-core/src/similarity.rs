//! Claim-to-claim similarity through the judge.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::claims::Claim;
use crate::error::Result;
use crate::judge::JudgeClient;
use crate::logging::CacheMetrics;

/// Scores at or above this count as a match
pub const MATCH_THRESHOLD: u8 = 3;

/// Pull a 1-5 score out of a judge reply.
///
/// The first character in `'1'..='5'` wins; replies without one score 1.
pub fn parse_score(reply: &str) -> u8 {
    reply
        .chars()
        .find(|c| ('1'..='5').contains(c))
        .and_then(|c| c.to_digit(10))
        .map(|d| (d as u8).clamp(1, 5))
        .unwrap_or(1)
}

/// Judge-backed claim comparison with an optional per-run memo.
///
/// The memo key is the unordered pair of claim texts, so `(a, b)` and
/// `(b, a)` share one judge call.
pub struct SimilarityScorer {
    judge: JudgeClient,
    memoize: bool,
    cache: Mutex<HashMap<(String, String), u8>>,
    metrics: CacheMetrics,
}

impl SimilarityScorer {
    pub fn new(judge: JudgeClient, memoize: bool) -> Self {
        Self {
            judge,
            memoize,
            cache: Mutex::new(HashMap::new()),
            metrics: CacheMetrics::new(),
        }
    }

    pub fn judge(&self) -> &JudgeClient {
        &self.judge
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Score how strongly `a` and `b` relate, 1 (unrelated) to 5 (same fact)
    pub async fn score(&self, a: &Claim, b: &Claim) -> Result<u8> {
        let key = cache_key(&a.text, &b.text);

        if self.memoize {
            if let Some(score) = self.cached(&key) {
                self.metrics.record_hit();
                return Ok(score);
            }
            self.metrics.record_miss();
        }

        let reply = self.judge.compare_claims(&a.text, &b.text).await?;
        let score = parse_score(&reply);
        tracing::debug!(
            claim_1 = %a.text,
            claim_2 = %b.text,
            score,
            explanation = %reply.trim(),
            "compared claims"
        );

        if self.memoize {
            if let Ok(mut cache) = self.cache.lock() {
                cache.insert(key, score);
            }
        }
        Ok(score)
    }

    /// Whether `a` and `b` score at least [`MATCH_THRESHOLD`]
    pub async fn matches(&self, a: &Claim, b: &Claim) -> Result<bool> {
        Ok(self.score(a, b).await? >= MATCH_THRESHOLD)
    }

    /// Whether `claim` matches at least one of `others`.
    ///
    /// Stops at the first match.
    pub async fn matches_any(&self, claim: &Claim, others: &[Claim]) -> Result<bool> {
        for other in others {
            if self.matches(claim, other).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn cached(&self, key: &(String, String)) -> Option<u8> {
        self.cache.lock().ok()?.get(key).copied()
    }
}

fn cache_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
