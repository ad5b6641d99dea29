//! Typed result reports for each action family
//!
//! Every helper on [`GriClient`](crate::client::GriClient) returns a
//! report carrying the raw decoded response (when one was obtained), a
//! success flag derived from the protocol return code, and an optional
//! human-readable error description. Pose-retrieval reports additionally
//! expose the exhaustion warnings so callers can tell a drained result
//! queue apart from a real failure.

use grirust_core::{describe_error, describe_status, ErrorCode, JobStatus, Pose, ResponseMessage};

/// Derive the human-readable error text for a report
pub(crate) fn error_text(response: Option<&ResponseMessage>) -> Option<String> {
    match response {
        None => Some("No response received".to_string()),
        Some(r) if r.is_ok() => None,
        Some(r) => Some(describe_error(r.error_code)),
    }
}

fn response_ok(response: &Option<ResponseMessage>) -> bool {
    response.as_ref().is_some_and(ResponseMessage::is_ok)
}

/// System readiness (STATUS action)
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub response: Option<ResponseMessage>,
    pub error: Option<String>,
    /// Server-side pipelines are loaded and ready for jobs
    pub ready: bool,
}

impl StatusReport {
    pub fn success(&self) -> bool {
        response_ok(&self.response)
    }
}

/// Synchronous job trigger result
#[derive(Debug, Clone)]
pub struct SyncJobReport {
    pub response: Option<ResponseMessage>,
    pub error: Option<String>,
    /// First result pose, present on success
    pub pose: Option<Pose>,
    pub remaining_primary: Option<i32>,
    pub remaining_related: Option<i32>,
}

impl SyncJobReport {
    pub fn success(&self) -> bool {
        response_ok(&self.response)
    }
}

/// Asynchronous job trigger acknowledgement
#[derive(Debug, Clone)]
pub struct AsyncTriggerReport {
    pub response: Option<ResponseMessage>,
    pub error: Option<String>,
    pub acknowledged: bool,
}

impl AsyncTriggerReport {
    pub fn success(&self) -> bool {
        response_ok(&self.response)
    }
}

/// Asynchronous job status query result
#[derive(Debug, Clone)]
pub struct JobStatusReport {
    pub response: Option<ResponseMessage>,
    pub error: Option<String>,
    /// Raw status code; codes from newer servers pass through unmapped
    pub status_code: i32,
}

impl JobStatusReport {
    pub fn success(&self) -> bool {
        response_ok(&self.response)
    }

    /// Status as a known lifecycle state, `None` for unrecognized codes
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::try_from(self.status_code).ok()
    }

    /// Human-readable status label
    pub fn status_label(&self) -> String {
        describe_status(self.status_code)
    }
}

/// Primary pose retrieval result
#[derive(Debug, Clone)]
pub struct PoseReport {
    pub response: Option<ResponseMessage>,
    pub error: Option<String>,
    pub pose: Option<Pose>,
    pub remaining_primary: Option<i32>,
    pub remaining_related: Option<i32>,
}

impl PoseReport {
    pub fn success(&self) -> bool {
        response_ok(&self.response)
    }

    /// True when the server reported the primary result queue as drained
    pub fn exhausted(&self) -> bool {
        self.response
            .as_ref()
            .is_some_and(|r| r.error_code == ErrorCode::NoPosesFound.code())
    }
}

/// Related pose retrieval result
#[derive(Debug, Clone)]
pub struct RelatedPoseReport {
    pub response: Option<ResponseMessage>,
    pub error: Option<String>,
    pub pose: Option<Pose>,
    pub remaining_related: Option<i32>,
}

impl RelatedPoseReport {
    pub fn success(&self) -> bool {
        response_ok(&self.response)
    }

    /// True when the server reported no related poses for the current result
    pub fn exhausted(&self) -> bool {
        self.response
            .as_ref()
            .is_some_and(|r| r.error_code == ErrorCode::NoRelatedPoses.code())
    }
}

/// Hand-eye calibration step acknowledgement
#[derive(Debug, Clone)]
pub struct HecReport {
    pub response: Option<ResponseMessage>,
    pub error: Option<String>,
    pub acknowledged: bool,
}

impl HecReport {
    pub fn success(&self) -> bool {
        response_ok(&self.response)
    }
}
