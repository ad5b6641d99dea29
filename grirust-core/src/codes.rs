//! Signed GRI return codes and their descriptions
//!
//! The response header carries a signed 16-bit code: zero means success,
//! negative values are hard errors, positive values are soft warnings
//! (exhausted result queues, job still running). Callers must branch on
//! the sign; a warning is not a communication failure.

use std::fmt;

use crate::error::{Error, Result};

/// Known GRI return codes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ErrorCode {
    /// Success
    NoError = 0,

    // Hard errors
    UnknownError = -1,
    InternalError = -2,
    ApiNotReachable = -3,
    ApiResponseError = -4,
    PipelineNotAvailable = -5,
    InvalidRequestError = -6,
    InvalidRequestLength = -7,
    InvalidAction = -8,
    ProcessingTimeout = -9,
    UnknownProtocolVersion = -10,
    WrongProtocolForJob = -11,
    JobDoesNotExist = -12,
    MisconfiguredJob = -13,
    HecConfigError = -14,
    HecInitError = -15,
    HecSetPoseError = -16,
    HecCalibrateError = -17,
    HecInsufficientDetection = -18,

    // Soft warnings
    NoPosesFound = 1,
    NoRelatedPoses = 2,
    NoReturnSpecified = 3,
    JobStillRunning = 4,
}

impl ErrorCode {
    /// Raw wire value of this code
    pub const fn code(self) -> i16 {
        self as i16
    }

    /// Check if this code is a hard error
    pub fn is_error(self) -> bool {
        self.code() < 0
    }

    /// Check if this code is a soft warning (e.g. an exhaustion signal)
    pub fn is_warning(self) -> bool {
        self.code() > 0
    }

    /// Fixed human-readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::NoError => "No error",
            Self::UnknownError => "Unknown error",
            Self::InternalError => "Internal system error",
            Self::ApiNotReachable => "Cannot reach vision API",
            Self::ApiResponseError => "API returned a negative code",
            Self::PipelineNotAvailable => "Processing pipeline unavailable",
            Self::InvalidRequestError => "Malformed request",
            Self::InvalidRequestLength => "Wrong message length",
            Self::InvalidAction => "Unsupported action",
            Self::ProcessingTimeout => "Operation timed out",
            Self::UnknownProtocolVersion => "Protocol version not supported",
            Self::WrongProtocolForJob => "Job does not match protocol version",
            Self::JobDoesNotExist => "Invalid job ID",
            Self::MisconfiguredJob => "Invalid job configuration",
            Self::HecConfigError => "Invalid calibration configuration",
            Self::HecInitError => "Calibration initialization failed",
            Self::HecSetPoseError => "Failed to record calibration pose",
            Self::HecCalibrateError => "Unable to compute calibration",
            Self::HecInsufficientDetection => "Calibration pattern not detected",
            Self::NoPosesFound => "No primary poses available",
            Self::NoRelatedPoses => "No related poses available",
            Self::NoReturnSpecified => "Job configured with no return type",
            Self::JobStillRunning => "Job still running",
        }
    }
}

impl From<ErrorCode> for i16 {
    fn from(code: ErrorCode) -> i16 {
        code as i16
    }
}

impl TryFrom<i16> for ErrorCode {
    type Error = Error;

    fn try_from(value: i16) -> Result<Self> {
        match value {
            0 => Ok(Self::NoError),
            -1 => Ok(Self::UnknownError),
            -2 => Ok(Self::InternalError),
            -3 => Ok(Self::ApiNotReachable),
            -4 => Ok(Self::ApiResponseError),
            -5 => Ok(Self::PipelineNotAvailable),
            -6 => Ok(Self::InvalidRequestError),
            -7 => Ok(Self::InvalidRequestLength),
            -8 => Ok(Self::InvalidAction),
            -9 => Ok(Self::ProcessingTimeout),
            -10 => Ok(Self::UnknownProtocolVersion),
            -11 => Ok(Self::WrongProtocolForJob),
            -12 => Ok(Self::JobDoesNotExist),
            -13 => Ok(Self::MisconfiguredJob),
            -14 => Ok(Self::HecConfigError),
            -15 => Ok(Self::HecInitError),
            -16 => Ok(Self::HecSetPoseError),
            -17 => Ok(Self::HecCalibrateError),
            -18 => Ok(Self::HecInsufficientDetection),
            1 => Ok(Self::NoPosesFound),
            2 => Ok(Self::NoRelatedPoses),
            3 => Ok(Self::NoReturnSpecified),
            4 => Ok(Self::JobStillRunning),
            _ => Err(Error::UnknownErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

/// Return a human-readable description for a raw return code
///
/// Unknown codes produce a generic description instead of failing, so
/// newer server codes never break logging paths.
pub fn describe_error(code: i16) -> String {
    match ErrorCode::try_from(code) {
        Ok(known) => known.description().to_string(),
        Err(_) => format!("Unknown error code: {code}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::NoError.code(), 0);
        assert_eq!(ErrorCode::HecInsufficientDetection.code(), -18);
        assert_eq!(ErrorCode::JobStillRunning.code(), 4);
    }

    #[test]
    fn test_error_warning_split() {
        assert!(ErrorCode::ApiNotReachable.is_error());
        assert!(!ErrorCode::ApiNotReachable.is_warning());
        assert!(ErrorCode::NoPosesFound.is_warning());
        assert!(!ErrorCode::NoPosesFound.is_error());
        assert!(!ErrorCode::NoError.is_error());
        assert!(!ErrorCode::NoError.is_warning());
    }

    #[test]
    fn test_round_trip() {
        for code in [-18i16..=-1, 0..=0, 1..=4].into_iter().flatten() {
            let parsed = ErrorCode::try_from(code).unwrap();
            assert_eq!(i16::from(parsed), code);
        }
    }

    #[test]
    fn test_describe_known() {
        assert_eq!(describe_error(-18), "Calibration pattern not detected");
        assert_eq!(describe_error(1), "No primary poses available");
        assert_eq!(describe_error(0), "No error");
    }

    #[test]
    fn test_describe_unknown() {
        assert_eq!(describe_error(-99), "Unknown error code: -99");
        assert_eq!(describe_error(77), "Unknown error code: 77");
    }
}
