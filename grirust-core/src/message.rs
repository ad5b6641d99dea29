//! GRI message structure and encoding/decoding

use bytes::{Buf, BufMut, BytesMut};
use std::fmt;
use tracing::warn;

use crate::{
    action::{Action, PoseFormat},
    constants::{MAGIC, PROTOCOL_VERSION, REQUEST_LENGTH, RESPONSE_LENGTH},
    error::{Error, Result},
    pose::Pose,
};

/// GRI protocol request
///
/// # Message layout (54 bytes, little-endian)
///
/// ```text
/// ┌───────────┬─────────┬────────┬─────────────┬────────┬────────┐
/// │   magic   │ version │ length │ pose_format │ action │ job_id │
/// │  u32      │  u8     │  u8    │  u8         │  u8    │  u16   │
/// ├───────────┴─────────┴────────┴─────────────┴────────┴────────┤
/// │ position i32×3 │ quaternion i32×4 │ data fields i32×4        │
/// └───────────────────────────────────────────────────────────────┘
/// ```
///
/// Position and quaternion are scaled fixed-point integers (micro-units).
///
/// # Examples
///
/// ```
/// use grirust_core::{Action, RequestMessage};
///
/// let request = RequestMessage::new(Action::Status, 0);
/// assert_eq!(request.to_bytes().len(), 54);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMessage {
    /// Requested action
    pub action: Action,

    /// Caller-chosen job identifier
    pub job_id: u16,

    /// Pose sent with the request; `None` encodes the identity pose
    pub pose: Option<Pose>,

    /// Action-specific payload integers
    pub data_fields: [i32; 4],
}

impl RequestMessage {
    /// Create a request with no pose and zeroed data fields
    pub fn new(action: Action, job_id: u16) -> Self {
        Self {
            action,
            job_id,
            pose: None,
            data_fields: [0; 4],
        }
    }

    /// Attach a pose to send with the request
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Set the four action-specific data fields
    pub fn with_data_fields(mut self, data_fields: [i32; 4]) -> Self {
        self.data_fields = data_fields;
        self
    }

    /// Pack the request into its 54-byte wire form
    ///
    /// The pose quaternion is normalized on a private copy before
    /// scaling; the request itself is left unchanged.
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(REQUEST_LENGTH);

        buf.put_u32_le(MAGIC);
        buf.put_u8(PROTOCOL_VERSION);
        buf.put_u8(REQUEST_LENGTH as u8);
        buf.put_u8(PoseFormat::QuaternionXyzw.into());
        buf.put_u8(self.action.into());
        buf.put_u16_le(self.job_id);

        for value in self.pose.unwrap_or_default().to_scaled() {
            buf.put_i32_le(value);
        }
        for value in self.data_fields {
            buf.put_i32_le(value);
        }

        debug_assert_eq!(buf.len(), REQUEST_LENGTH);
        buf
    }
}

impl fmt::Display for RequestMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request[{}](job={})", self.action, self.job_id)
    }
}

/// Decoded GRI protocol response
///
/// Responses mirror the request header and add a signed return code,
/// a result pose, and ten data fields. The first three data fields have
/// fixed meanings; see the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMessage {
    /// Echoed action; unknown codes fall back to [`Action::Status`]
    pub action: Action,

    /// Echoed job identifier
    pub job_id: u16,

    /// Signed return code (negative=error, positive=warning, zero=success)
    pub error_code: i16,

    /// Result pose
    pub pose: Pose,

    /// Action-specific payload integers
    pub data_fields: [i32; 10],
}

impl ResponseMessage {
    /// Decode an 80-byte response buffer
    ///
    /// Protocol-version and pose-format mismatches are logged but do not
    /// fail the decode; an unknown action code falls back to STATUS.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the buffer is not exactly 80 bytes
    /// - the magic does not match
    /// - the declared length field is not 80
    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        if payload.len() != RESPONSE_LENGTH {
            return Err(Error::ResponseLengthMismatch {
                expected: RESPONSE_LENGTH,
                actual: payload.len(),
            });
        }

        let mut buf = payload;

        let magic = buf.get_u32_le();
        if magic != MAGIC {
            return Err(Error::BadMagic { received: magic });
        }

        let version = buf.get_u8();
        if version != PROTOCOL_VERSION {
            warn!(
                received = version,
                expected = PROTOCOL_VERSION,
                "Protocol version mismatch in response"
            );
        }

        let declared = buf.get_u8();
        if usize::from(declared) != RESPONSE_LENGTH {
            return Err(Error::DeclaredLengthMismatch { declared });
        }

        let pose_format = buf.get_u8();
        if pose_format != u8::from(PoseFormat::QuaternionXyzw) {
            warn!(
                received = pose_format,
                expected = u8::from(PoseFormat::QuaternionXyzw),
                "Pose format mismatch in response"
            );
        }

        let action_raw = buf.get_u8();
        let job_id = buf.get_u16_le();
        let error_code = buf.get_i16_le();

        let mut scaled = [0i32; 7];
        for slot in &mut scaled {
            *slot = buf.get_i32_le();
        }
        let pose = Pose::from_scaled(scaled);

        let mut data_fields = [0i32; 10];
        for slot in &mut data_fields {
            *slot = buf.get_i32_le();
        }

        let action = Action::try_from(action_raw).unwrap_or_else(|_| {
            warn!(
                code = action_raw,
                "Unknown action code in response, defaulting to STATUS"
            );
            Action::Status
        });

        Ok(Self {
            action,
            job_id,
            error_code,
            pose,
            data_fields,
        })
    }

    /// Node/server return code (data field 0)
    pub fn node_return_code(&self) -> i32 {
        self.data_fields[0]
    }

    /// Remaining primary results (data field 1)
    ///
    /// For STATUS this field is the readiness flag, for GET_JOB_STATUS
    /// the job status code.
    pub fn remaining_primary(&self) -> i32 {
        self.data_fields[1]
    }

    /// Remaining related results (data field 2)
    pub fn remaining_related(&self) -> i32 {
        self.data_fields[2]
    }

    /// Check if the return code reports success
    pub fn is_ok(&self) -> bool {
        self.error_code == 0
    }

    /// Check if the return code is a hard error
    pub fn is_error(&self) -> bool {
        self.error_code < 0
    }

    /// Check if the return code is a soft warning
    pub fn is_warning(&self) -> bool {
        self.error_code > 0
    }
}

impl fmt::Display for ResponseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response[{}](job={}, error={})",
            self.action, self.job_id, self.error_code
        )
    }
}
