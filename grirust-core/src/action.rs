//! GRI protocol action and job status definitions

use std::fmt;

use crate::error::{Error, Result};

/// Action identifiers defined by the GRI protocol
///
/// Each request names exactly one action; the server echoes it back in
/// the response header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    /// System readiness query
    Status = 1,

    /// Trigger a vision job and wait for the first result
    TriggerJobSync = 2,

    /// Trigger a vision job without waiting for completion
    TriggerJobAsync = 3,

    /// Query the lifecycle state of an asynchronous job
    GetJobStatus = 4,

    /// Fetch the next primary result pose
    GetNextPose = 5,

    /// Fetch a pose related to the current primary result
    GetRelatedPose = 6,

    /// Initialize a hand-eye calibration pipeline
    HecInit = 7,

    /// Record a robot pose for one calibration slot
    HecSetPose = 8,

    /// Compute the hand-eye calibration from the recorded poses
    HecCalibrate = 9,
}

impl Action {
    /// Get action name
    pub fn name(self) -> &'static str {
        match self {
            Self::Status => "STATUS",
            Self::TriggerJobSync => "TRIGGER_JOB_SYNC",
            Self::TriggerJobAsync => "TRIGGER_JOB_ASYNC",
            Self::GetJobStatus => "GET_JOB_STATUS",
            Self::GetNextPose => "GET_NEXT_POSE",
            Self::GetRelatedPose => "GET_RELATED_POSE",
            Self::HecInit => "HEC_INIT",
            Self::HecSetPose => "HEC_SET_POSE",
            Self::HecCalibrate => "HEC_CALIBRATE",
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> u8 {
        action as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Status),
            2 => Ok(Self::TriggerJobSync),
            3 => Ok(Self::TriggerJobAsync),
            4 => Ok(Self::GetJobStatus),
            5 => Ok(Self::GetNextPose),
            6 => Ok(Self::GetRelatedPose),
            7 => Ok(Self::HecInit),
            8 => Ok(Self::HecSetPose),
            9 => Ok(Self::HecCalibrate),
            _ => Err(Error::UnknownAction(value)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), *self as u8)
    }
}

/// Lifecycle states reported for asynchronous jobs
///
/// The server reports the status as a 32-bit data field; codes outside
/// this set are possible with newer servers and must be tolerated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum JobStatus {
    /// Status could not be determined (also used after a communication failure)
    Unknown = 0,

    /// Job exists but has not started processing
    Inactive = 1,

    /// Job is processing
    Running = 2,

    /// Job finished successfully
    Done = 3,

    /// Job finished with an error
    Failed = 4,
}

impl JobStatus {
    /// Get status name
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Inactive => "INACTIVE",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }

    /// Check if this status ends a polling wait
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Unknown)
    }
}

impl From<JobStatus> for i32 {
    fn from(status: JobStatus) -> i32 {
        status as i32
    }
}

impl TryFrom<i32> for JobStatus {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Inactive),
            2 => Ok(Self::Running),
            3 => Ok(Self::Done),
            4 => Ok(Self::Failed),
            _ => Err(Error::UnknownJobStatus(value)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Return a human-readable label for a raw job status code
pub fn describe_status(code: i32) -> String {
    match JobStatus::try_from(code) {
        Ok(status) => status.name().to_string(),
        Err(_) => format!("UNRECOGNIZED({code})"),
    }
}

/// Pose encoding format codes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum PoseFormat {
    /// Position in millimeters, orientation as quaternion in XYZW order
    QuaternionXyzw = 2,
}

impl From<PoseFormat> for u8 {
    fn from(format: PoseFormat) -> u8 {
        format as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_conversion() {
        assert_eq!(u8::from(Action::Status), 1);
        assert_eq!(u8::from(Action::HecCalibrate), 9);
        assert_eq!(Action::try_from(5).unwrap(), Action::GetNextPose);
    }

    #[test]
    fn test_unknown_action() {
        assert!(Action::try_from(0).is_err());
        assert!(Action::try_from(10).is_err());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Status.to_string(), "STATUS(1)");
        assert_eq!(Action::HecSetPose.to_string(), "HEC_SET_POSE(8)");
    }

    #[test]
    fn test_job_status_conversion() {
        assert_eq!(i32::from(JobStatus::Done), 3);
        assert_eq!(JobStatus::try_from(4).unwrap(), JobStatus::Failed);
        assert!(JobStatus::try_from(5).is_err());
        assert!(JobStatus::try_from(-1).is_err());
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Unknown.is_terminal());
        assert!(!JobStatus::Inactive.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn test_describe_status() {
        assert_eq!(describe_status(3), "DONE");
        assert_eq!(describe_status(7), "UNRECOGNIZED(7)");
    }

    #[test]
    fn test_pose_format() {
        assert_eq!(u8::from(PoseFormat::QuaternionXyzw), 2);
    }
}
