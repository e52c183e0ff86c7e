//! Append-only log of finished evaluation runs (`runs.jsonl`).

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::report::EvaluationReport;

pub const RUNS_FILE: &str = "runs.jsonl";

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// ULID; sorts by creation time
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Ground-truth file the run was scored against
    pub ground_truth: PathBuf,
    pub dataset_fingerprint: String,
    pub judge_model: String,
    pub report: EvaluationReport,
}

impl RunRecord {
    /// New record with a fresh id, finished now
    pub fn new(
        label: Option<String>,
        started_at: DateTime<Utc>,
        ground_truth: PathBuf,
        dataset_fingerprint: String,
        judge_model: String,
        report: EvaluationReport,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            label,
            started_at,
            finished_at: Utc::now(),
            ground_truth,
            dataset_fingerprint,
            judge_model,
            report,
        }
    }
}

pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    /// Log stored at `<dir>/runs.jsonl`; the directory is created on first append
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(RUNS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &RunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
        tracing::debug!(id = %record.id, path = %self.path.display(), "recorded run");
        Ok(())
    }

    /// Every recorded run, oldest first
    pub fn load_all(&self) -> Result<Vec<RunRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RunRecord = serde_json::from_str(&line)
                .map_err(|e| EvalError::malformed(&self.path, format!("line {}: {}", i + 1, e)))?;
            records.push(record);
        }
        Ok(records)
    }

    /// Find a run by full id or unique id prefix (case-insensitive)
    pub fn find(&self, id_or_prefix: &str) -> Result<RunRecord> {
        let needle = id_or_prefix.trim().to_ascii_uppercase();
        if needle.is_empty() {
            return Err(EvalError::invalid_value("run id", "empty"));
        }

        let records = self.load_all()?;
        if let Some(exact) = records.iter().find(|r| r.id == needle) {
            return Ok(exact.clone());
        }

        let mut candidates = records.into_iter().filter(|r| r.id.starts_with(&needle));
        match (candidates.next(), candidates.next()) {
            (Some(record), None) => Ok(record),
            (Some(_), Some(_)) => Err(EvalError::invalid_value(
                "run id",
                format!("prefix {} matches more than one run", id_or_prefix),
            )),
            (None, _) => Err(EvalError::not_found("run", id_or_prefix)),
        }
    }
}
