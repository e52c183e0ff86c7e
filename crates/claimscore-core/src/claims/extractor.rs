use crate::error::{EvalError, Result};
use crate::judge::JudgeClient;

use super::{number_sentences, parse_claims, tokenize_sentences, Claim};

/// Turns free text into claims with the judge's help.
#[derive(Clone)]
pub struct ClaimExtractor {
    judge: JudgeClient,
}

impl ClaimExtractor {
    pub fn new(judge: JudgeClient) -> Self {
        Self { judge }
    }

    /// Extract every claim (triplet and sentence form) from `text`.
    ///
    /// # Errors
    ///
    /// - `Extraction` if the judge call fails or returns blank text
    /// - `Cancelled` if the run is cancelled while waiting on the judge
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn extract(&self, text: &str) -> Result<Vec<Claim>> {
        let numbered = number_sentences(&tokenize_sentences(text));

        let reply = self
            .judge
            .extract_claims(&numbered)
            .await
            .map_err(|e| match e {
                EvalError::Cancelled => EvalError::Cancelled,
                other => EvalError::Extraction {
                    reason: other.to_string(),
                },
            })?;

        if reply.trim().is_empty() {
            return Err(EvalError::Extraction {
                reason: "judge returned an empty claims list".to_string(),
            });
        }

        let claims = parse_claims(reply.trim());
        tracing::debug!(claims = claims.len(), "extracted claims");
        Ok(claims)
    }
}
