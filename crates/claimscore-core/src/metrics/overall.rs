use crate::claims::Claim;
use crate::error::Result;
use crate::report::{ratio, OverallClaimReport};
use crate::similarity::SimilarityScorer;

/// Precision, recall and F1 of generated claims against ground-truth claims.
///
/// Claims are paired by position; the longer list's tail is never compared.
pub async fn evaluate_overall(
    scorer: &SimilarityScorer,
    generated: &[Claim],
    ground_truth: &[Claim],
) -> Result<OverallClaimReport> {
    let mut correct = 0;
    for (generated_claim, ground_truth_claim) in generated.iter().zip(ground_truth) {
        if scorer.matches(generated_claim, ground_truth_claim).await? {
            correct += 1;
        }
    }

    let precision = ratio(correct, generated.len());
    let recall = ratio(correct, ground_truth.len());
    let f1_score = f1(precision, recall);

    tracing::debug!(correct, precision, recall, f1_score, "overall claim metrics");
    Ok(OverallClaimReport {
        precision,
        recall,
        f1_score,
    })
}

/// Harmonic mean, 0 when either input is 0
fn f1(precision: f64, recall: f64) -> f64 {
    if precision == 0.0 || recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}
