use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One in-flight conversion. Lives only for the duration of the request that started it.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub status: JobStatus,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ConversionJob {
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
            status: JobStatus::Pending,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn succeed(&mut self) {
        self.status = JobStatus::Succeeded;
        self.finished_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.finished_at = Some(Utc::now());
    }

    pub fn is_terminal(&self) -> bool {
        self.status != JobStatus::Pending
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at.unwrap_or_else(Utc::now) - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_transitions() {
        let mut job = ConversionJob::new(PathBuf::from("in.mov"), PathBuf::from("out.mp4"));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(!job.is_terminal());

        job.fail("engine crashed");
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("engine crashed"));
        assert!(job.is_terminal());
        assert!(job.elapsed_ms() >= 0);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&JobStatus::Succeeded).unwrap();
        assert_eq!(json, "\"succeeded\"");
        assert_eq!(JobStatus::Pending.to_string(), "pending");
    }
}
