use crate::error::Result;
use crate::judge::{JudgeClient, Quality, QualityInputs};
use crate::report::LlmReport;
use crate::similarity::parse_score;

/// Ask the judge the six direct quality questions and rescale each 1-5
/// score to `[0, 1]`.
pub async fn evaluate_direct(judge: &JudgeClient, inputs: &QualityInputs<'_>) -> Result<LlmReport> {
    let mut scores = [0.0; 6];
    for (slot, quality) in scores.iter_mut().zip(Quality::ALL) {
        let reply = judge.assess(quality, inputs).await?;
        let raw = parse_score(&reply);
        tracing::debug!(operation = %quality.operation(), raw, reply = %reply.trim(), "direct score");
        *slot = rescale(raw);
    }

    let [groundedness, relevance, coherence, fluency, retrieval_score, similarity] = scores;
    Ok(LlmReport {
        groundedness,
        relevance,
        coherence,
        fluency,
        retrieval_score,
        similarity,
    })
}

fn rescale(raw: u8) -> f64 {
    f64::from(raw.saturating_sub(1)) / 4.0
}
