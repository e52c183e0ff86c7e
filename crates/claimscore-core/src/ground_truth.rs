//! Ground-truth question/answer datasets.
//!
//! Supported files, chosen by extension:
//! - `.json`: array of `{"question", "answer"}` objects
//! - `.jsonl`: one object per line, blank lines skipped
//! - `.yaml` / `.yml`: list of objects

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::bail_malformed;
use crate::error::{EvalError, Result};

/// One question and its reference answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    #[serde(alias = "Question")]
    pub question: String,
    #[serde(alias = "Answer")]
    pub answer: String,
}

/// Load a dataset, keeping file order.
///
/// # Errors
///
/// `MalformedInput` if the file cannot be read or parsed, has an unknown
/// extension, or contains a record with an empty question.
pub fn load(path: &Path) -> Result<Vec<QuestionAnswer>> {
    let content = fs::read_to_string(path).map_err(|e| EvalError::malformed(path, e))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let records: Vec<QuestionAnswer> = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content).map_err(|e| EvalError::malformed(path, e))?,
        Some("jsonl") => parse_jsonl(path, &content)?,
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| EvalError::malformed(path, e))?
        }
        other => bail_malformed!(
            path,
            format!(
                "unsupported ground truth extension {:?} (expected json, jsonl, yaml or yml)",
                other.unwrap_or("")
            )
        ),
    };

    if let Some(index) = records.iter().position(|r| r.question.trim().is_empty()) {
        bail_malformed!(path, format!("record {} has an empty question", index + 1));
    }

    tracing::info!(path = %path.display(), questions = records.len(), "loaded ground truth");
    Ok(records)
}

fn parse_jsonl(path: &Path, content: &str) -> Result<Vec<QuestionAnswer>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| EvalError::malformed(path, format!("line {}: {}", i + 1, e)))
        })
        .collect()
}

/// SHA-256 hex digest identifying a dataset's content
pub fn fingerprint(records: &[QuestionAnswer]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        hasher.update(record.question.as_bytes());
        hasher.update([0u8]);
        hasher.update(record.answer.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_array() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "gt.json",
            r#"[{"question": "Who loves Juliet?", "answer": "Romeo."}, {"Question": "Where?", "Answer": "Verona."}]"#,
        );

        let records = load(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].question, "Where?");
        assert_eq!(records[1].answer, "Verona.");
    }

    #[test]
    fn test_load_jsonl_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "gt.jsonl",
            "{\"question\": \"a\", \"answer\": \"1\"}\n\n{\"question\": \"b\", \"answer\": \"2\"}\n",
        );

        let records = load(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "a");
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "gt.yml", "- question: a\n  answer: one\n");

        let records = load(&path).unwrap();
        assert_eq!(records[0].answer, "one");
    }

    #[test]
    fn test_empty_question_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "gt.json", r#"[{"question": "  ", "answer": "x"}]"#);

        let err = load(&path).unwrap_err();
        assert!(matches!(err, EvalError::MalformedInput { .. }));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "gt.csv", "question,answer\n");

        let err = load(&path).unwrap_err();
        assert!(matches!(err, EvalError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, EvalError::MalformedInput { .. }));
    }

    #[test]
    fn test_bad_jsonl_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "gt.jsonl", "{\"question\": \"a\", \"answer\": \"1\"}\nnope\n");

        match load(&path).unwrap_err() {
            EvalError::MalformedInput { reason, .. } => assert!(reason.starts_with("line 2")),
            other => panic!("expected malformed input, got {other:?}"),
        }
    }

    #[test]
    fn test_fingerprint_depends_on_content_and_order() {
        let a = QuestionAnswer {
            question: "a".to_string(),
            answer: "1".to_string(),
        };
        let b = QuestionAnswer {
            question: "b".to_string(),
            answer: "2".to_string(),
        };

        let forward = fingerprint(&[a.clone(), b.clone()]);
        assert_eq!(forward.len(), 64);
        assert_eq!(forward, fingerprint(&[a.clone(), b.clone()]));
        assert_ne!(forward, fingerprint(&[b, a]));
    }
}
