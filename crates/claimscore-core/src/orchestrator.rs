//! Runs a ground-truth dataset through a pipeline and scores every answer.

use futures::{stream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::cancel::run_cancellable;
use crate::claims::{non_triplet, Claim, ClaimExtractor};
use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::ground_truth::QuestionAnswer;
use crate::judge::{JudgeClient, QualityInputs};
use crate::log_cache_stats;
use crate::metrics::{
    evaluate_direct, evaluate_generation, evaluate_overall, evaluate_retrieval, GenerationInputs,
};
use crate::pipeline::{Generation, RagPipeline};
use crate::report::{ClaimCounts, EvaluationReport, QuestionReport};
use crate::similarity::SimilarityScorer;

/// Evaluation engine.
///
/// Questions run one after another in dataset order. Within a question the
/// chunk extractions and the four evaluators may overlap; the judge client's
/// permit pool bounds how many judge calls are actually in flight.
pub struct Evaluator {
    judge: JudgeClient,
    extractor: ClaimExtractor,
    concurrency: usize,
    memoize_similarity: bool,
}

impl Evaluator {
    pub fn new(judge: JudgeClient, config: &EvaluationConfig) -> Self {
        let concurrency = config.concurrency.max(1);
        let judge = judge.with_concurrency(concurrency);
        Self {
            extractor: ClaimExtractor::new(judge.clone()),
            judge,
            concurrency,
            memoize_similarity: config.memoize_similarity,
        }
    }

    /// Token that aborts the run when cancelled
    pub fn cancellation(&self) -> &CancellationToken {
        self.judge.cancellation()
    }

    /// Evaluate every question; any failure aborts the whole run.
    pub async fn run<P>(&self, pipeline: &P, dataset: &[QuestionAnswer]) -> Result<EvaluationReport>
    where
        P: RagPipeline + ?Sized,
    {
        tracing::info!(questions = dataset.len(), concurrency = self.concurrency, "starting evaluation");
        let scorer = SimilarityScorer::new(self.judge.clone(), self.memoize_similarity);

        let mut question_reports = Vec::with_capacity(dataset.len());
        for (index, record) in dataset.iter().enumerate() {
            let span = tracing::info_span!("question", index = index + 1);
            let report = self
                .evaluate_question(pipeline, &scorer, record)
                .instrument(span)
                .await?;
            question_reports.push(report);
        }

        if self.memoize_similarity {
            log_cache_stats!(scorer.metrics(), "similarity_cache");
        }

        let report = EvaluationReport::from_question_reports(question_reports);
        tracing::info!(
            questions = report.question_reports.len(),
            f1_score = report.average_overall_claim_report.f1_score,
            faithfulness = report.average_generation_claim_report.faithfulness,
            "evaluation finished"
        );
        Ok(report)
    }

    async fn evaluate_question<P>(
        &self,
        pipeline: &P,
        scorer: &SimilarityScorer,
        record: &QuestionAnswer,
    ) -> Result<QuestionReport>
    where
        P: RagPipeline + ?Sized,
    {
        tracing::info!(question = %record.question, "evaluating question");

        let generation =
            run_cancellable(self.cancellation(), pipeline.generate(&record.question)).await?;
        tracing::info!(
            answer_len = generation.answer.len(),
            chunks = generation.contexts.len(),
            "pipeline answered"
        );

        let chunks = self.extract_chunks(&generation).await?;
        let (ground_truth, generated) = tokio::try_join!(
            self.extract(&record.answer),
            self.extract(&generation.answer)
        )?;
        let context: Vec<Claim> = chunks.iter().flatten().cloned().collect();
        tracing::debug!(
            generated = generated.len(),
            ground_truth = ground_truth.len(),
            context = context.len(),
            "claims ready"
        );

        let joined_context = generation.joined_context();
        let quality_inputs = QualityInputs {
            question: &record.question,
            context: &joined_context,
            answer: &generation.answer,
            ground_truth: &record.answer,
        };

        let (llm_report, overall_claim_report, retrieval_claim_report, generation_claim_report) = tokio::try_join!(
            evaluate_direct(&self.judge, &quality_inputs),
            evaluate_overall(scorer, &generated, &ground_truth),
            evaluate_retrieval(scorer, &ground_truth, &context),
            evaluate_generation(
                scorer,
                GenerationInputs {
                    context: &context,
                    chunks: &chunks,
                    generated: &generated,
                    ground_truth: &ground_truth,
                },
            ),
        )?;

        tracing::info!(
            precision = overall_claim_report.precision,
            recall = overall_claim_report.recall,
            f1_score = overall_claim_report.f1_score,
            claim_recall = retrieval_claim_report.claim_recall,
            faithfulness = generation_claim_report.faithfulness,
            hallucination = generation_claim_report.hallucination,
            "question scored"
        );

        let claim_counts = ClaimCounts {
            generated: generated.len(),
            ground_truth: ground_truth.len(),
            context: context.len(),
            chunks: chunks.len(),
        };

        Ok(QuestionReport {
            question: record.question.clone(),
            answer: generation.answer,
            ground_truth: record.answer.clone(),
            llm_report,
            overall_claim_report,
            retrieval_claim_report,
            generation_claim_report,
            claim_counts,
        })
    }

    /// Non-triplet claims per chunk, in chunk order
    async fn extract_chunks(&self, generation: &Generation) -> Result<Vec<Vec<Claim>>> {
        stream::iter(&generation.contexts)
            .map(|chunk| self.extract(&chunk.text))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    async fn extract(&self, text: &str) -> Result<Vec<Claim>> {
        Ok(non_triplet(self.extractor.extract(text).await?))
    }
}
