//! Per-question and per-run report types.
//!
//! Every metric is an `f64`; averages are taken field by field across the
//! question reports, and an empty run averages to all zeros.

use serde::{Deserialize, Serialize};

/// Direct judge scores, each rescaled from 1-5 to `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmReport {
    pub groundedness: f64,
    pub relevance: f64,
    pub coherence: f64,
    pub fluency: f64,
    pub retrieval_score: f64,
    pub similarity: f64,
}

/// Positional generated-vs-ground-truth claim agreement
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallClaimReport {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// How well the retrieved context covers the ground truth
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalClaimReport {
    /// Matching (context, ground truth) pairs over ground-truth claims; may exceed 1
    pub claim_recall: f64,
    pub context_precision: f64,
}

/// How the generated answer relates to the context and the ground truth
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationClaimReport {
    pub faithfulness: f64,
    pub relevant_noise_sensitivity: f64,
    pub irrelevant_noise_sensitivity: f64,
    pub hallucination: f64,
    pub self_knowledge_score: f64,
    pub context_utilization: f64,
}

/// Number of non-triplet claims each evaluator saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimCounts {
    pub generated: usize,
    pub ground_truth: usize,
    /// Context claims across all chunks
    pub context: usize,
    /// Retrieved chunks, including ones that yielded no claims
    pub chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReport {
    pub question: String,
    /// Answer produced by the pipeline
    pub answer: String,
    pub ground_truth: String,
    pub llm_report: LlmReport,
    pub overall_claim_report: OverallClaimReport,
    pub retrieval_claim_report: RetrievalClaimReport,
    pub generation_claim_report: GenerationClaimReport,
    #[serde(default)]
    pub claim_counts: ClaimCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub question_reports: Vec<QuestionReport>,
    pub average_llm_report: LlmReport,
    pub average_overall_claim_report: OverallClaimReport,
    pub average_retrieval_claim_report: RetrievalClaimReport,
    pub average_generation_claim_report: GenerationClaimReport,
}

impl EvaluationReport {
    /// Build the run report, averaging every metric independently
    pub fn from_question_reports(question_reports: Vec<QuestionReport>) -> Self {
        let reports = &question_reports;

        let average_llm_report = LlmReport {
            groundedness: mean(reports, |r| r.llm_report.groundedness),
            relevance: mean(reports, |r| r.llm_report.relevance),
            coherence: mean(reports, |r| r.llm_report.coherence),
            fluency: mean(reports, |r| r.llm_report.fluency),
            retrieval_score: mean(reports, |r| r.llm_report.retrieval_score),
            similarity: mean(reports, |r| r.llm_report.similarity),
        };

        let average_overall_claim_report = OverallClaimReport {
            precision: mean(reports, |r| r.overall_claim_report.precision),
            recall: mean(reports, |r| r.overall_claim_report.recall),
            f1_score: mean(reports, |r| r.overall_claim_report.f1_score),
        };

        let average_retrieval_claim_report = RetrievalClaimReport {
            claim_recall: mean(reports, |r| r.retrieval_claim_report.claim_recall),
            context_precision: mean(reports, |r| r.retrieval_claim_report.context_precision),
        };

        let average_generation_claim_report = GenerationClaimReport {
            faithfulness: mean(reports, |r| r.generation_claim_report.faithfulness),
            relevant_noise_sensitivity: mean(reports, |r| {
                r.generation_claim_report.relevant_noise_sensitivity
            }),
            irrelevant_noise_sensitivity: mean(reports, |r| {
                r.generation_claim_report.irrelevant_noise_sensitivity
            }),
            hallucination: mean(reports, |r| r.generation_claim_report.hallucination),
            self_knowledge_score: mean(reports, |r| r.generation_claim_report.self_knowledge_score),
            context_utilization: mean(reports, |r| r.generation_claim_report.context_utilization),
        };

        Self {
            question_reports,
            average_llm_report,
            average_overall_claim_report,
            average_retrieval_claim_report,
            average_generation_claim_report,
        }
    }
}

fn mean(reports: &[QuestionReport], metric: impl Fn(&QuestionReport) -> f64) -> f64 {
    if reports.is_empty() {
        return 0.0;
    }
    reports.iter().map(metric).sum::<f64>() / reports.len() as f64
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(groundedness: f64, f1_score: f64) -> QuestionReport {
        QuestionReport {
            question: "q".to_string(),
            answer: "a".to_string(),
            ground_truth: "g".to_string(),
            llm_report: LlmReport {
                groundedness,
                ..Default::default()
            },
            overall_claim_report: OverallClaimReport {
                f1_score,
                ..Default::default()
            },
            retrieval_claim_report: RetrievalClaimReport::default(),
            generation_claim_report: GenerationClaimReport::default(),
            claim_counts: ClaimCounts::default(),
        }
    }

    #[test]
    fn test_averages_are_per_metric_means() {
        let report = EvaluationReport::from_question_reports(vec![
            question(0.0, 1.0),
            question(0.5, 0.0),
            question(1.0, 0.5),
        ]);

        assert_eq!(report.question_reports.len(), 3);
        assert!((report.average_llm_report.groundedness - 0.5).abs() < 1e-12);
        assert!((report.average_overall_claim_report.f1_score - 0.5).abs() < 1e-12);
        assert_eq!(report.average_llm_report.fluency, 0.0);
    }

    #[test]
    fn test_empty_run_averages_to_zero() {
        let report = EvaluationReport::from_question_reports(Vec::new());
        assert_eq!(report, EvaluationReport::default());
        assert!(!report.average_generation_claim_report.hallucination.is_nan());
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(3, 0), 0.0);
        assert_eq!(ratio(3, 2), 1.5);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(question(0.25, 0.0)).unwrap();
        assert_eq!(json["llm_report"]["groundedness"], 0.25);
        assert!(json["generation_claim_report"]
            .get("self_knowledge_score")
            .is_some());
        assert_eq!(json["claim_counts"]["ground_truth"], 0);
    }
}
