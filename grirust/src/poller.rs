//! Bounded polling for asynchronous jobs
//!
//! Repeatedly queries a job's status until it reaches a terminal state
//! or a wall-clock deadline passes. The deadline is a single monotonic
//! instant checked before each sleep and before each poll, so the loop
//! never sleeps a negative duration and never polls past the deadline.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use grirust_core::{describe_status, JobStatus};

use crate::client::GriClient;

/// Poll-loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitState {
    /// Still polling
    Waiting,

    /// Job reported DONE
    Done,

    /// Job reported FAILED
    Failed,

    /// Deadline passed before a terminal status
    TimedOut,

    /// Status query failed; no point retrying
    Aborted,
}

impl GriClient {
    /// Wait for an asynchronous job to reach a terminal state
    ///
    /// Polls [`get_job_status`](GriClient::get_job_status) every
    /// `poll_interval` until the job reports DONE or FAILED, or until
    /// `wait_timeout` elapses. The first poll happens immediately.
    ///
    /// Returns true only for DONE. FAILED and UNKNOWN (the latter
    /// signals a communication failure during the status query) abort
    /// the wait with no further polls. Unrecognized status codes keep
    /// the wait alive so newer servers do not break the loop.
    pub async fn wait_for_job(
        &mut self,
        job_id: u16,
        poll_interval: Duration,
        wait_timeout: Duration,
    ) -> bool {
        let deadline = Instant::now() + wait_timeout;
        info!(
            "wait_for_job(job={}): Waiting up to {:.1}s (polling every {:.1}s)...",
            job_id,
            wait_timeout.as_secs_f64(),
            poll_interval.as_secs_f64()
        );

        let mut state = WaitState::Waiting;
        let mut first_poll = true;

        while state == WaitState::Waiting {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                state = WaitState::TimedOut;
                break;
            };

            if first_poll {
                first_poll = false;
            } else {
                sleep(poll_interval.min(remaining)).await;
                if Instant::now() >= deadline {
                    state = WaitState::TimedOut;
                    break;
                }
            }

            let report = self.get_job_status(job_id).await;
            match report.status() {
                Some(JobStatus::Done) => state = WaitState::Done,
                Some(JobStatus::Failed) => state = WaitState::Failed,
                Some(JobStatus::Unknown) => state = WaitState::Aborted,
                Some(JobStatus::Inactive) | Some(JobStatus::Running) => {
                    debug!(
                        "wait_for_job(job={}): Status={}. Continuing wait...",
                        job_id,
                        describe_status(report.status_code)
                    );
                }
                None => {
                    warn!(
                        "wait_for_job(job={}): Received unexpected status code {}. Continuing wait.",
                        job_id, report.status_code
                    );
                }
            }
        }

        match state {
            WaitState::Done => {
                info!("wait_for_job(job={}): Job completed successfully (Status: DONE).", job_id);
                true
            }
            WaitState::Failed => {
                error!("wait_for_job(job={}): Job failed (Status: FAILED).", job_id);
                false
            }
            WaitState::Aborted => {
                error!(
                    "wait_for_job(job={}): Job status unknown (communication error?). Aborting wait.",
                    job_id
                );
                false
            }
            WaitState::TimedOut | WaitState::Waiting => {
                error!(
                    "wait_for_job(job={}): Timeout after {:.1}s.",
                    job_id,
                    wait_timeout.as_secs_f64()
                );
                false
            }
        }
    }
}
