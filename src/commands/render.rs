//! Report rendering shared by `run` and `show`

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::cli::OutputFormat;
use claimscore_core::error::Result;
use claimscore_core::report::{EvaluationReport, QuestionReport};

/// Render a report in the requested format
pub fn render_report(report: &EvaluationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Human => Ok(human_report(report)),
    }
}

/// Write a report to `path`: YAML for `.yaml`/`.yml`, pretty JSON otherwise
pub fn write_report_file(path: &Path, report: &EvaluationReport) -> Result<()> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let content = if is_yaml {
        render_report(report, OutputFormat::Yaml)?
    } else {
        render_report(report, OutputFormat::Json)?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn human_report(report: &EvaluationReport) -> String {
    let mut out = String::new();

    for (i, question) in report.question_reports.iter().enumerate() {
        let _ = writeln!(out, "Q{}: {}", i + 1, question.question);
        write_question(&mut out, question);
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Average over {} question(s)",
        report.question_reports.len()
    );
    let overall = &report.average_overall_claim_report;
    let retrieval = &report.average_retrieval_claim_report;
    let generation = &report.average_generation_claim_report;
    let llm = &report.average_llm_report;
    let _ = writeln!(
        out,
        "  overall     precision={:.3} recall={:.3} f1={:.3}",
        overall.precision, overall.recall, overall.f1_score
    );
    let _ = writeln!(
        out,
        "  retrieval   claim_recall={:.3} context_precision={:.3}",
        retrieval.claim_recall, retrieval.context_precision
    );
    let _ = writeln!(
        out,
        "  generation  faithfulness={:.3} relevant_noise={:.3} irrelevant_noise={:.3} hallucination={:.3} self_knowledge={:.3} context_utilization={:.3}",
        generation.faithfulness,
        generation.relevant_noise_sensitivity,
        generation.irrelevant_noise_sensitivity,
        generation.hallucination,
        generation.self_knowledge_score,
        generation.context_utilization
    );
    let _ = writeln!(
        out,
        "  judge       groundedness={:.3} relevance={:.3} coherence={:.3} fluency={:.3} retrieval={:.3} similarity={:.3}",
        llm.groundedness, llm.relevance, llm.coherence, llm.fluency, llm.retrieval_score, llm.similarity
    );

    out
}

fn write_question(out: &mut String, question: &QuestionReport) {
    let counts = &question.claim_counts;
    let overall = &question.overall_claim_report;
    let retrieval = &question.retrieval_claim_report;
    let generation = &question.generation_claim_report;

    let _ = writeln!(
        out,
        "  claims      generated={} ground_truth={} context={} chunks={}",
        counts.generated, counts.ground_truth, counts.context, counts.chunks
    );
    let _ = writeln!(
        out,
        "  overall     precision={:.3} recall={:.3} f1={:.3}",
        overall.precision, overall.recall, overall.f1_score
    );
    let _ = writeln!(
        out,
        "  retrieval   claim_recall={:.3} context_precision={:.3}",
        retrieval.claim_recall, retrieval.context_precision
    );
    let _ = writeln!(
        out,
        "  generation  faithfulness={:.3} hallucination={:.3} self_knowledge={:.3} context_utilization={:.3}",
        generation.faithfulness,
        generation.hallucination,
        generation.self_knowledge_score,
        generation.context_utilization
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscore_core::report::{
        ClaimCounts, GenerationClaimReport, LlmReport, OverallClaimReport, RetrievalClaimReport,
    };
    use tempfile::TempDir;

    fn report() -> EvaluationReport {
        EvaluationReport::from_question_reports(vec![QuestionReport {
            question: "Who loves Juliet?".to_string(),
            answer: "Romeo.".to_string(),
            ground_truth: "Romeo loves Juliet.".to_string(),
            llm_report: LlmReport::default(),
            overall_claim_report: OverallClaimReport {
                precision: 1.0,
                recall: 0.5,
                f1_score: 2.0 / 3.0,
            },
            retrieval_claim_report: RetrievalClaimReport::default(),
            generation_claim_report: GenerationClaimReport::default(),
            claim_counts: ClaimCounts::default(),
        }])
    }

    #[test]
    fn test_human_report_lists_questions_and_averages() {
        let text = render_report(&report(), OutputFormat::Human).unwrap();
        assert!(text.contains("Q1: Who loves Juliet?"));
        assert!(text.contains("f1=0.667"));
        assert!(text.contains("Average over 1 question(s)"));
    }

    #[test]
    fn test_json_report_is_full_report() {
        let text = render_report(&report(), OutputFormat::Json).unwrap();
        let parsed: EvaluationReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report());
    }

    #[test]
    fn test_write_report_file_picks_format_by_extension() {
        let dir = TempDir::new().unwrap();
        let yaml_path = dir.path().join("out/report.yml");
        let json_path = dir.path().join("report.out");

        write_report_file(&yaml_path, &report()).unwrap();
        write_report_file(&json_path, &report()).unwrap();

        let yaml = fs::read_to_string(yaml_path).unwrap();
        assert!(yaml.contains("question_reports:"));
        let json = fs::read_to_string(json_path).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }
}
