use crate::claims::Claim;
use crate::error::Result;
use crate::report::{ratio, RetrievalClaimReport};
use crate::similarity::SimilarityScorer;

/// Compare every context claim with every ground-truth claim.
///
/// `claim_recall` counts each matching pair, so a ground-truth claim covered
/// by several context claims is counted several times.
pub async fn evaluate_retrieval(
    scorer: &SimilarityScorer,
    ground_truth: &[Claim],
    context: &[Claim],
) -> Result<RetrievalClaimReport> {
    let mut covered = 0;
    let mut relevant = 0;

    for context_claim in context {
        let mut is_relevant = false;
        for ground_truth_claim in ground_truth {
            if scorer.matches(context_claim, ground_truth_claim).await? {
                covered += 1;
                is_relevant = true;
            }
        }
        if is_relevant {
            relevant += 1;
        }
    }

    let claim_recall = ratio(covered, ground_truth.len());
    let context_precision = ratio(relevant, context.len());

    tracing::debug!(covered, relevant, claim_recall, context_precision, "retrieval claim metrics");
    Ok(RetrievalClaimReport {
        claim_recall,
        context_precision,
    })
}
