//! Background job plumbing for the controller.
//!
//! The analysis call runs on a worker thread; its outcome is delivered back
//! to the UI thread over an mpsc channel drained once per frame. The worker
//! always reports, so the busy affordance is released on every outcome.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use crate::analysis_api::{self, AnalysisResult, AnalyzeError, FilePart};

pub(super) enum JobMessage {
    AnalyzeFinished(AnalyzeFinishedMessage),
}

pub(super) struct AnalyzeFinishedMessage {
    pub(super) result: Result<AnalysisResult, AnalyzeError>,
}

/// Everything the worker needs; paths are read on the worker thread.
#[derive(Debug)]
pub(super) struct AnalyzeJob {
    pub(super) endpoint: String,
    pub(super) files: Vec<(&'static str, PathBuf)>,
}

pub(super) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    analyze_in_progress: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            analyze_in_progress: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(super) fn analyze_in_progress(&self) -> bool {
        self.analyze_in_progress
    }

    pub(super) fn begin_analyze(&mut self, job: AnalyzeJob) {
        if self.analyze_in_progress {
            return;
        }
        self.analyze_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = run_analyze(job);
            let _ = tx.send(JobMessage::AnalyzeFinished(AnalyzeFinishedMessage {
                result,
            }));
        });
    }

    pub(super) fn clear_analyze(&mut self) {
        self.analyze_in_progress = false;
    }
}

fn run_analyze(job: AnalyzeJob) -> Result<AnalysisResult, AnalyzeError> {
    let mut parts = Vec::with_capacity(job.files.len());
    for (field, path) in &job.files {
        parts.push(FilePart::from_path(field, path)?);
    }
    analysis_api::analyze(&job.endpoint, &parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::tests::serve_once;
    use std::time::Duration;

    fn csv_files(dir: &std::path::Path) -> Vec<(&'static str, PathBuf)> {
        crate::analysis_api::FILE_FIELDS
            .iter()
            .map(|field| {
                let path = dir.join(format!("{field}.csv"));
                std::fs::write(&path, "0.0,1.0\n").unwrap();
                (*field, path)
            })
            .collect()
    }

    #[test]
    fn worker_reports_success_over_the_channel() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"final_decision_text": "PERFECTO."}"#;
        let url = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ));

        let mut jobs = ControllerJobs::new();
        jobs.begin_analyze(AnalyzeJob {
            endpoint: url,
            files: csv_files(dir.path()),
        });
        assert!(jobs.analyze_in_progress());

        let message = jobs
            .message_rx
            .recv_timeout(Duration::from_secs(10))
            .unwrap();
        let JobMessage::AnalyzeFinished(message) = message;
        let result = message.result.unwrap();
        assert_eq!(result.final_decision_text.as_deref(), Some("PERFECTO."));
    }

    #[test]
    fn worker_reports_missing_file_as_error() {
        let mut jobs = ControllerJobs::new();
        jobs.begin_analyze(AnalyzeJob {
            endpoint: "http://127.0.0.1:9/analyze".to_string(),
            files: vec![("allke_csv", PathBuf::from("/nonexistent/allke.csv"))],
        });
        let message = jobs
            .message_rx
            .recv_timeout(Duration::from_secs(10))
            .unwrap();
        let JobMessage::AnalyzeFinished(message) = message;
        assert!(matches!(
            message.result,
            Err(AnalyzeError::ReadFile { .. })
        ));
    }

    #[test]
    fn second_job_is_rejected_while_in_flight() {
        let mut jobs = ControllerJobs::new();
        jobs.analyze_in_progress = true;
        jobs.begin_analyze(AnalyzeJob {
            endpoint: "http://127.0.0.1:9/analyze".to_string(),
            files: Vec::new(),
        });
        // No worker was spawned; the channel stays empty.
        assert!(matches!(
            jobs.try_recv_message(),
            Err(TryRecvError::Empty)
        ));
    }
}
