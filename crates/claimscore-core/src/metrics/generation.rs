//! Generation metrics: how the answer uses (or ignores) the retrieved
//! chunks and how it relates to the ground truth.

use crate::claims::Claim;
use crate::error::Result;
use crate::report::{ratio, GenerationClaimReport};
use crate::similarity::{SimilarityScorer, MATCH_THRESHOLD};

/// Claim sets for one question
#[derive(Debug, Clone, Copy)]
pub struct GenerationInputs<'a> {
    /// Every chunk's claims flattened in chunk order
    pub context: &'a [Claim],
    /// Claims per retrieved chunk; a chunk may have none
    pub chunks: &'a [Vec<Claim>],
    pub generated: &'a [Claim],
    pub ground_truth: &'a [Claim],
}

pub async fn evaluate_generation(
    scorer: &SimilarityScorer,
    inputs: GenerationInputs<'_>,
) -> Result<GenerationClaimReport> {
    let total = inputs.generated.len();

    let faithful = count_faithful(scorer, inputs.generated, inputs.context).await?;
    let (relevant_chunks, irrelevant_chunks) =
        partition_chunks(scorer, inputs.chunks, inputs.ground_truth).await?;
    let (incorrect_in_relevant, incorrect_in_irrelevant) = count_incorrect(
        scorer,
        inputs.generated,
        inputs.ground_truth,
        &relevant_chunks,
        &irrelevant_chunks,
    )
    .await?;
    let (hallucinated, self_known) =
        count_provenance(scorer, inputs.generated, inputs.chunks, inputs.ground_truth).await?;
    let context_utilization =
        context_utilization(scorer, inputs.chunks, inputs.generated, inputs.ground_truth).await?;

    tracing::debug!(
        total,
        faithful,
        relevant_chunks = relevant_chunks.len(),
        irrelevant_chunks = irrelevant_chunks.len(),
        incorrect_in_relevant,
        incorrect_in_irrelevant,
        hallucinated,
        self_known,
        "generation claim metrics"
    );

    Ok(GenerationClaimReport {
        faithfulness: ratio(faithful, total),
        relevant_noise_sensitivity: ratio(incorrect_in_relevant, total),
        irrelevant_noise_sensitivity: ratio(incorrect_in_irrelevant, total),
        hallucination: ratio(hallucinated, total),
        self_knowledge_score: ratio(self_known, total),
        context_utilization,
    })
}

/// Generated claims backed by at least one context claim
async fn count_faithful(
    scorer: &SimilarityScorer,
    generated: &[Claim],
    context: &[Claim],
) -> Result<usize> {
    let mut faithful = 0;
    for claim in generated {
        if scorer.matches_any(claim, context).await? {
            faithful += 1;
        }
    }
    Ok(faithful)
}

/// Split chunks into those supporting some ground-truth claim and the rest
async fn partition_chunks<'c>(
    scorer: &SimilarityScorer,
    chunks: &'c [Vec<Claim>],
    ground_truth: &[Claim],
) -> Result<(Vec<&'c [Claim]>, Vec<&'c [Claim]>)> {
    let mut relevant = Vec::new();
    let mut irrelevant = Vec::new();

    for chunk in chunks {
        let mut is_relevant = false;
        for chunk_claim in chunk {
            if scorer.matches_any(chunk_claim, ground_truth).await? {
                is_relevant = true;
                break;
            }
        }
        if is_relevant {
            relevant.push(chunk.as_slice());
        } else {
            irrelevant.push(chunk.as_slice());
        }
    }

    Ok((relevant, irrelevant))
}

/// Count generated claims that disagree with ground truth, split by where
/// they came from.
///
/// For every (generated, ground truth) pair below the threshold: a match in
/// a relevant chunk counts against relevant noise; otherwise any
/// sub-threshold score against an irrelevant chunk claim counts against
/// irrelevant noise.
async fn count_incorrect(
    scorer: &SimilarityScorer,
    generated: &[Claim],
    ground_truth: &[Claim],
    relevant_chunks: &[&[Claim]],
    irrelevant_chunks: &[&[Claim]],
) -> Result<(usize, usize)> {
    let mut in_relevant = 0;
    let mut in_irrelevant = 0;

    for generated_claim in generated {
        for ground_truth_claim in ground_truth {
            if scorer.matches(generated_claim, ground_truth_claim).await? {
                continue;
            }
            if any_chunk_claim(scorer, generated_claim, relevant_chunks, |s| {
                s >= MATCH_THRESHOLD
            })
            .await?
            {
                in_relevant += 1;
            } else if any_chunk_claim(scorer, generated_claim, irrelevant_chunks, |s| {
                s < MATCH_THRESHOLD
            })
            .await?
            {
                in_irrelevant += 1;
            }
        }
    }

    Ok((in_relevant, in_irrelevant))
}

/// Count hallucinated and self-known generated claims.
///
/// Hallucinated claims match no chunk claim and no ground-truth claim;
/// self-known claims match both.
async fn count_provenance(
    scorer: &SimilarityScorer,
    generated: &[Claim],
    chunks: &[Vec<Claim>],
    ground_truth: &[Claim],
) -> Result<(usize, usize)> {
    let chunk_slices: Vec<&[Claim]> = chunks.iter().map(Vec::as_slice).collect();
    let mut hallucinated = 0;
    let mut self_known = 0;

    for claim in generated {
        let in_chunks =
            any_chunk_claim(scorer, claim, &chunk_slices, |s| s >= MATCH_THRESHOLD).await?;
        let in_ground_truth = scorer.matches_any(claim, ground_truth).await?;

        match (in_chunks, in_ground_truth) {
            (false, false) => hallucinated += 1,
            (true, true) => self_known += 1,
            _ => {}
        }
    }

    Ok((hallucinated, self_known))
}

/// Mean, over chunks with claims, of the share of ground-truth claims that
/// the chunk supports and the answer repeats
async fn context_utilization(
    scorer: &SimilarityScorer,
    chunks: &[Vec<Claim>],
    generated: &[Claim],
    ground_truth: &[Claim],
) -> Result<f64> {
    let mut total = 0.0;
    let mut counted = 0;

    for chunk in chunks.iter().filter(|chunk| !chunk.is_empty()) {
        let mut used = 0;
        for ground_truth_claim in ground_truth {
            let in_chunk = scorer.matches_any(ground_truth_claim, chunk).await?;
            let in_answer = scorer.matches_any(ground_truth_claim, generated).await?;
            if in_chunk && in_answer {
                used += 1;
            }
        }
        total += ratio(used, ground_truth.len());
        counted += 1;
    }

    Ok(if counted == 0 {
        0.0
    } else {
        total / counted as f64
    })
}

/// Whether `claim` scores `accept` against any claim of any chunk.
///
/// Stops at the first accepted score.
async fn any_chunk_claim(
    scorer: &SimilarityScorer,
    claim: &Claim,
    chunks: &[&[Claim]],
    accept: impl Fn(u8) -> bool,
) -> Result<bool> {
    for chunk in chunks {
        for chunk_claim in chunk.iter() {
            if accept(scorer.score(claim, chunk_claim).await?) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
