//! Claim-based and direct quality metrics.
//!
//! The claim evaluators only ever see non-triplet claims and compare them
//! through a shared [`SimilarityScorer`](crate::similarity::SimilarityScorer);
//! the direct evaluator asks the judge for six 1-5 scores.

pub mod direct;
pub mod generation;
pub mod overall;
pub mod retrieval;

pub use direct::evaluate_direct;
pub use generation::{evaluate_generation, GenerationInputs};
pub use overall::evaluate_overall;
pub use retrieval::evaluate_retrieval;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::claims::Claim;
    use crate::judge::mock::MockJudge;
    use crate::judge::JudgeClient;
    use crate::similarity::SimilarityScorer;

    pub fn claims(texts: &[&str]) -> Vec<Claim> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Claim::new(*text, vec![i as u32 + 1]))
            .collect()
    }

    /// Claims match when they share their first letter
    pub fn first_letter_scorer() -> SimilarityScorer {
        let judge = MockJudge::new().with_comparator(|a, b| {
            if a.chars().next() == b.chars().next() {
                5
            } else {
                1
            }
        });
        SimilarityScorer::new(JudgeClient::new(Arc::new(judge)), true)
    }
}
