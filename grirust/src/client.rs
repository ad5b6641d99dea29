//! High-level GRI client

use tracing::{error, info};

use grirust_core::{
    constants, describe_error, describe_status, Action, JobStatus, Pose, RequestMessage,
    ResponseMessage,
};
use grirust_transport::{TcpTransport, Transport};
use grirust_types::ClientConfig;

use crate::error::{Error, Result};
use crate::report::{
    self, AsyncTriggerReport, HecReport, JobStatusReport, PoseReport, RelatedPoseReport,
    StatusReport, SyncJobReport,
};
use crate::robot::{FixedPoseSource, RobotPoseSource};

/// GRI protocol client
///
/// Drives one connection to a vision/guidance server: perception job
/// triggers, pose retrieval, and the hand-eye calibration sequence.
/// Every operation funnels through a single request/response exchange,
/// so exactly one request is in flight at a time.
///
/// # Examples
///
/// ```no_run
/// use grirust::GriClient;
///
/// #[tokio::main]
/// async fn main() {
///     let mut client = GriClient::new("192.168.2.1", 7100);
///     if client.connect().await {
///         let status = client.get_status().await;
///         println!("ready: {}", status.ready);
///         client.disconnect().await;
///     }
/// }
/// ```
pub struct GriClient {
    transport: Box<dyn Transport>,
    pose_source: Box<dyn RobotPoseSource>,
}

impl GriClient {
    /// Create a client for the given server address with default timeouts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(ClientConfig::new(host).with_port(port))
    }

    /// Create a client from a configuration record
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = TcpTransport::new(config.host, config.port)
            .with_connect_timeout(config.timeout)
            .with_io_timeout(config.timeout);

        Self {
            transport: Box::new(transport),
            pose_source: Box::new(FixedPoseSource::default()),
        }
    }

    /// Replace the robot pose provider used for job triggers
    pub fn with_pose_source(mut self, source: impl RobotPoseSource + 'static) -> Self {
        self.pose_source = Box::new(source);
        self
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Connect to the server
    ///
    /// Returns false on timeout or refusal; calling connect while
    /// already connected is a no-op returning true.
    pub async fn connect(&mut self) -> bool {
        if self.transport.is_connected() {
            info!("Already connected.");
            return true;
        }

        info!("Attempting to connect to {}...", self.transport.remote_addr());
        match self.transport.connect().await {
            Ok(()) => {
                info!("Successfully connected to server.");
                true
            }
            Err(e) => {
                error!("Connection failed: {}", e);
                false
            }
        }
    }

    /// Close the connection (idempotent)
    pub async fn disconnect(&mut self) {
        self.transport.disconnect().await;
    }

    /// Build, exchange, and decode one protocol transaction
    ///
    /// This is the choke point every action goes through. Transport
    /// failures and decode failures come back as distinct variants; a
    /// response carrying a non-zero return code is still `Ok`.
    pub async fn send_action(
        &mut self,
        action: Action,
        job_id: u16,
        pose: Option<&Pose>,
        data_fields: [i32; 4],
    ) -> Result<ResponseMessage> {
        let mut request = RequestMessage::new(action, job_id).with_data_fields(data_fields);
        if let Some(pose) = pose {
            // The request owns its copy; normalization during encoding
            // never touches the caller's pose.
            request = request.with_pose(*pose);
        }
        let request_bytes = request.to_bytes();

        let response_bytes = self
            .transport
            .exchange(&request_bytes, constants::RESPONSE_LENGTH)
            .await
            .map_err(|e| {
                error!("{}(job={}): Communication failed: {}", action.name(), job_id, e);
                Error::Transport(e)
            })?;

        let response = ResponseMessage::from_bytes(&response_bytes).map_err(|e| {
            error!("{}(job={}): Failed to decode response: {}", action.name(), job_id, e);
            Error::Protocol(e)
        })?;

        Ok(response)
    }

    /// Query server readiness (STATUS action)
    pub async fn get_status(&mut self) -> StatusReport {
        let response = self.send_action(Action::Status, 0, None, [0; 4]).await.ok();
        let error = report::error_text(response.as_ref());

        let mut ready = false;
        if let Some(r) = &response {
            if r.is_ok() {
                ready = r.data_fields[1] != 0;
                info!(
                    "get_status(): Ready={} (node_return_code={}).",
                    ready,
                    r.node_return_code()
                );
            } else {
                error!(
                    "get_status(): Server returned error: {} (Code: {})",
                    describe_error(r.error_code),
                    r.error_code
                );
            }
        }

        StatusReport { response, error, ready }
    }

    /// Trigger a vision job and wait for its first result
    ///
    /// Sends the robot's current pose (or the override) with the
    /// trigger. On success the report carries the first result pose plus
    /// the remaining primary/related counts.
    pub async fn trigger_job_sync(
        &mut self,
        job_id: u16,
        pose_override: Option<Pose>,
    ) -> SyncJobReport {
        let pose = pose_override.unwrap_or_else(|| self.pose_source.current_pose());
        let response = self
            .send_action(Action::TriggerJobSync, job_id, Some(&pose), [0; 4])
            .await
            .ok();
        let error = report::error_text(response.as_ref());

        let Some(r) = response else {
            return SyncJobReport {
                response: None,
                error,
                pose: None,
                remaining_primary: None,
                remaining_related: None,
            };
        };

        let remaining_primary = Some(r.remaining_primary());
        let remaining_related = Some(r.remaining_related());
        let pose = if r.is_ok() {
            info!(
                "trigger_job_sync(job={}): Success. Remaining Primary={}, Related={}.",
                job_id,
                r.remaining_primary(),
                r.remaining_related()
            );
            Some(r.pose)
        } else {
            error!(
                "trigger_job_sync(job={}): Server returned error: {} (Code: {})",
                job_id,
                describe_error(r.error_code),
                r.error_code
            );
            None
        };

        SyncJobReport {
            response: Some(r),
            error,
            pose,
            remaining_primary,
            remaining_related,
        }
    }

    /// Trigger a vision job without waiting for it to finish
    pub async fn trigger_job_async(
        &mut self,
        job_id: u16,
        pose_override: Option<Pose>,
    ) -> AsyncTriggerReport {
        let pose = pose_override.unwrap_or_else(|| self.pose_source.current_pose());
        let response = self
            .send_action(Action::TriggerJobAsync, job_id, Some(&pose), [0; 4])
            .await
            .ok();
        let error = report::error_text(response.as_ref());

        let acknowledged = response.as_ref().is_some_and(ResponseMessage::is_ok);
        match &response {
            Some(r) if r.is_ok() => {
                info!("trigger_job_async(job={}): Acknowledged by server.", job_id);
            }
            Some(r) => {
                error!(
                    "trigger_job_async(job={}): Server returned error on ack: {} (Code: {})",
                    job_id,
                    describe_error(r.error_code),
                    r.error_code
                );
            }
            None => {}
        }

        AsyncTriggerReport { response, error, acknowledged }
    }

    /// Query the status of a previously triggered asynchronous job
    ///
    /// A missing response or a server-side error reports
    /// [`JobStatus::Unknown`], which the poller treats as a reason to
    /// give up.
    pub async fn get_job_status(&mut self, job_id: u16) -> JobStatusReport {
        let response = self
            .send_action(Action::GetJobStatus, job_id, None, [0; 4])
            .await
            .ok();

        let Some(r) = response else {
            return JobStatusReport {
                response: None,
                error: Some("No response received".to_string()),
                status_code: i32::from(JobStatus::Unknown),
            };
        };

        if r.is_ok() {
            let status_code = r.data_fields[1];
            info!(
                "get_job_status(job={}): Status {} ({}).",
                job_id,
                status_code,
                describe_status(status_code)
            );
            JobStatusReport { response: Some(r), error: None, status_code }
        } else {
            error!(
                "get_job_status(job={}): Server returned error: {} (Code: {})",
                job_id,
                describe_error(r.error_code),
                r.error_code
            );
            let error = Some(describe_error(r.error_code));
            JobStatusReport {
                response: Some(r),
                error,
                status_code: i32::from(JobStatus::Unknown),
            }
        }
    }

    /// Fetch the next primary result pose for a job
    ///
    /// The NO_POSES_FOUND warning is the drained-queue signal, reported
    /// through [`PoseReport::exhausted`] rather than as a failure.
    pub async fn get_next_pose(&mut self, job_id: u16) -> PoseReport {
        let response = self
            .send_action(Action::GetNextPose, job_id, None, [0; 4])
            .await
            .ok();
        let error = report::error_text(response.as_ref());

        let Some(r) = response else {
            return PoseReport {
                response: None,
                error,
                pose: None,
                remaining_primary: None,
                remaining_related: None,
            };
        };

        let remaining_primary = Some(r.remaining_primary());
        let remaining_related = Some(r.remaining_related());
        let report = PoseReport {
            pose: r.is_ok().then_some(r.pose),
            response: Some(r),
            error,
            remaining_primary,
            remaining_related,
        };

        if report.success() {
            info!(
                "get_next_pose(job={}): Success. Remaining Primary={:?}, Related={:?}.",
                job_id, report.remaining_primary, report.remaining_related
            );
        } else if report.exhausted() {
            info!(
                "get_next_pose(job={}): No more primary poses. Remaining Primary={:?}, Related={:?}.",
                job_id, report.remaining_primary, report.remaining_related
            );
        } else if let Some(r) = &report.response {
            error!(
                "get_next_pose(job={}): Server returned error: {} (Code: {})",
                job_id,
                describe_error(r.error_code),
                r.error_code
            );
        }

        report
    }

    /// Fetch a pose related to the current primary result
    ///
    /// The NO_RELATED_POSES warning is the exhaustion signal for this
    /// action, reported through [`RelatedPoseReport::exhausted`].
    pub async fn get_related_pose(&mut self, job_id: u16) -> RelatedPoseReport {
        let response = self
            .send_action(Action::GetRelatedPose, job_id, None, [0; 4])
            .await
            .ok();
        let error = report::error_text(response.as_ref());

        let Some(r) = response else {
            return RelatedPoseReport {
                response: None,
                error,
                pose: None,
                remaining_related: None,
            };
        };

        let remaining_related = Some(r.remaining_related());
        let report = RelatedPoseReport {
            pose: r.is_ok().then_some(r.pose),
            response: Some(r),
            error,
            remaining_related,
        };

        if report.success() {
            info!(
                "get_related_pose(job={}): Success. Remaining Related={:?}.",
                job_id, report.remaining_related
            );
        } else if report.exhausted() {
            info!(
                "get_related_pose(job={}): No related poses available. Remaining Related={:?}.",
                job_id, report.remaining_related
            );
        } else if let Some(r) = &report.response {
            error!(
                "get_related_pose(job={}): Server returned error: {} (Code: {})",
                job_id,
                describe_error(r.error_code),
                r.error_code
            );
        }

        report
    }

    /// Initialize the hand-eye calibration pipeline on the server
    pub async fn hec_init(&mut self, pipeline_id: i32) -> HecReport {
        let response = self
            .send_action(Action::HecInit, 0, None, [pipeline_id, 0, 0, 0])
            .await
            .ok();
        let report = Self::hec_report(response);

        match &report.response {
            Some(r) if r.is_ok() => {
                info!("hec_init(pipeline={}): Initialization successful.", pipeline_id);
            }
            Some(r) => {
                error!(
                    "hec_init(pipeline={}): Server returned error: {} (Code: {})",
                    pipeline_id,
                    describe_error(r.error_code),
                    r.error_code
                );
            }
            None => {}
        }

        report
    }

    /// Record one calibration sample: the robot pose for a numbered slot
    ///
    /// Slots are 1-based.
    pub async fn hec_set_pose(&mut self, pipeline_id: i32, slot_id: i32, pose: &Pose) -> HecReport {
        let response = self
            .send_action(Action::HecSetPose, 0, Some(pose), [pipeline_id, slot_id, 0, 0])
            .await
            .ok();
        let report = Self::hec_report(response);

        match &report.response {
            Some(r) if r.is_ok() => {
                info!(
                    "hec_set_pose(pipeline={}, slot={}): Pose set successfully.",
                    pipeline_id, slot_id
                );
            }
            Some(r) => {
                error!(
                    "hec_set_pose(pipeline={}, slot={}): Server returned error: {} (Code: {})",
                    pipeline_id,
                    slot_id,
                    describe_error(r.error_code),
                    r.error_code
                );
            }
            None => {}
        }

        report
    }

    /// Run the calibration calculation over the recorded samples
    ///
    /// A non-zero returned pose is the computed hand-eye transform.
    pub async fn hec_calibrate(&mut self, pipeline_id: i32) -> HecReport {
        let response = self
            .send_action(Action::HecCalibrate, 0, None, [pipeline_id, 0, 0, 0])
            .await
            .ok();
        let report = Self::hec_report(response);

        match &report.response {
            Some(r) if r.is_ok() => {
                info!("hec_calibrate(pipeline={}): Calibration command acknowledged.", pipeline_id);
                let p = &r.pose;
                if p.x.abs() > 1e-9 || p.y.abs() > 1e-9 || p.z.abs() > 1e-9 {
                    info!("  -> Calibration pose returned: {}", p);
                }
            }
            Some(r) => {
                error!(
                    "hec_calibrate(pipeline={}): Server returned error: {} (Code: {})",
                    pipeline_id,
                    describe_error(r.error_code),
                    r.error_code
                );
            }
            None => {}
        }

        report
    }

    fn hec_report(response: Option<ResponseMessage>) -> HecReport {
        let error = report::error_text(response.as_ref());
        let acknowledged = response.as_ref().is_some_and(ResponseMessage::is_ok);
        HecReport { response, error, acknowledged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};
    use grirust_core::constants::{MAGIC, PROTOCOL_VERSION, REQUEST_LENGTH, RESPONSE_LENGTH};
    use grirust_core::ErrorCode;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn encode_response(
        action: Action,
        job_id: u16,
        error_code: i16,
        pose: Pose,
        data_fields: [i32; 10],
    ) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(RESPONSE_LENGTH);
        buf.put_u32_le(MAGIC);
        buf.put_u8(PROTOCOL_VERSION);
        buf.put_u8(RESPONSE_LENGTH as u8);
        buf.put_u8(2);
        buf.put_u8(action.into());
        buf.put_u16_le(job_id);
        buf.put_i16_le(error_code);
        for value in pose.to_scaled() {
            buf.put_i32_le(value);
        }
        for value in data_fields {
            buf.put_i32_le(value);
        }
        buf.to_vec()
    }

    fn status_data(fields: &[(usize, i32)]) -> [i32; 10] {
        let mut data = [0i32; 10];
        for &(index, value) in fields {
            data[index] = value;
        }
        data
    }

    /// Serve one connection, answering each full request with the next
    /// canned response, then hold the connection open.
    async fn serve_responses(responses: Vec<Vec<u8>>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            for response in responses {
                let mut request = vec![0u8; REQUEST_LENGTH];
                if stream.read_exact(&mut request).await.is_err() {
                    return;
                }
                if stream.write_all(&response).await.is_err() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        port
    }

    async fn connected_client(port: u16) -> GriClient {
        let mut client = GriClient::with_config(
            ClientConfig::new("127.0.0.1")
                .with_port(port)
                .with_timeout(Duration::from_secs(2)),
        );
        assert!(client.connect().await);
        client
    }

    #[tokio::test]
    async fn test_get_status_ready() {
        let response = encode_response(
            Action::Status,
            0,
            0,
            Pose::identity(),
            status_data(&[(1, 1)]),
        );
        let port = serve_responses(vec![response]).await;
        let mut client = connected_client(port).await;

        let status = client.get_status().await;
        assert!(status.success());
        assert!(status.ready);
        assert!(status.error.is_none());

        client.disconnect().await;
    }

    #[tokio::test]
    async fn test_get_status_not_ready_on_error() {
        let response = encode_response(
            Action::Status,
            0,
            ErrorCode::ApiNotReachable.code(),
            Pose::identity(),
            status_data(&[(1, 1)]),
        );
        let port = serve_responses(vec![response]).await;
        let mut client = connected_client(port).await;

        let status = client.get_status().await;
        assert!(!status.success());
        assert!(!status.ready);
        assert_eq!(status.error.as_deref(), Some("Cannot reach vision API"));
    }

    #[tokio::test]
    async fn test_trigger_job_sync_returns_pose_and_counts() {
        let result_pose = Pose::new(10.0, 20.0, 30.0, 0.0, 0.0, 0.0, 1.0);
        let response = encode_response(
            Action::TriggerJobSync,
            5,
            0,
            result_pose,
            status_data(&[(1, 2), (2, 1)]),
        );
        let port = serve_responses(vec![response]).await;
        let mut client = connected_client(port).await;

        let report = client
            .trigger_job_sync(5, Some(Pose::new(500.0, 100.0, 400.0, 0.0, 0.0, 0.0, 1.0)))
            .await;
        assert!(report.success());
        assert_eq!(report.remaining_primary, Some(2));
        assert_eq!(report.remaining_related, Some(1));
        let pose = report.pose.unwrap();
        assert!((pose.x - 10.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_get_next_pose_exhaustion_is_not_failure() {
        let response = encode_response(
            Action::GetNextPose,
            5,
            ErrorCode::NoPosesFound.code(),
            Pose::identity(),
            [0; 10],
        );
        let port = serve_responses(vec![response]).await;
        let mut client = connected_client(port).await;

        let report = client.get_next_pose(5).await;
        assert!(!report.success());
        assert!(report.exhausted());
        assert!(report.pose.is_none());
        // An exhaustion warning must not drop the connection
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn test_hard_error_is_not_exhaustion() {
        let response = encode_response(
            Action::GetNextPose,
            5,
            ErrorCode::JobDoesNotExist.code(),
            Pose::identity(),
            [0; 10],
        );
        let port = serve_responses(vec![response]).await;
        let mut client = connected_client(port).await;

        let report = client.get_next_pose(5).await;
        assert!(!report.success());
        assert!(!report.exhausted());
        assert_eq!(report.error.as_deref(), Some("Invalid job ID"));
    }

    #[tokio::test]
    async fn test_no_response_collapses_to_failure() {
        // Server closes immediately after the request
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; REQUEST_LENGTH];
            let _ = stream.read_exact(&mut request).await;
        });

        let mut client = connected_client(port).await;
        let status = client.get_status().await;
        assert!(!status.success());
        assert!(status.response.is_none());
        assert_eq!(status.error.as_deref(), Some("No response received"));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_connection() {
        // Structurally complete but wrong magic
        let mut bad = encode_response(Action::Status, 0, 0, Pose::identity(), [0; 10]);
        bad[0] ^= 0xFF;
        let port = serve_responses(vec![bad]).await;
        let mut client = connected_client(port).await;

        let status = client.get_status().await;
        assert!(!status.success());
        assert!(status.response.is_none());
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn test_get_job_status_maps_data_field() {
        let response = encode_response(
            Action::GetJobStatus,
            9,
            0,
            Pose::identity(),
            status_data(&[(1, i32::from(JobStatus::Running))]),
        );
        let port = serve_responses(vec![response]).await;
        let mut client = connected_client(port).await;

        let report = client.get_job_status(9).await;
        assert_eq!(report.status(), Some(JobStatus::Running));
        assert_eq!(report.status_label(), "RUNNING");
    }

    #[tokio::test]
    async fn test_get_job_status_unknown_without_response() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; REQUEST_LENGTH];
            let _ = stream.read_exact(&mut request).await;
        });

        let mut client = connected_client(port).await;
        let report = client.get_job_status(9).await;
        assert_eq!(report.status(), Some(JobStatus::Unknown));
        assert!(report.response.is_none());
    }

    #[tokio::test]
    async fn test_hec_sequence_payload_fields() {
        // Echo servers for init, one set-pose, calibrate
        let responses = vec![
            encode_response(Action::HecInit, 0, 0, Pose::identity(), [0; 10]),
            encode_response(Action::HecSetPose, 0, 0, Pose::identity(), [0; 10]),
            encode_response(
                Action::HecCalibrate,
                0,
                0,
                Pose::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0),
                [0; 10],
            ),
        ];
        let port = serve_responses(responses).await;
        let mut client = connected_client(port).await;

        assert!(client.hec_init(3).await.acknowledged);
        let sample = Pose::new(100.0, 0.0, 300.0, 0.0, 0.0, 0.0, 1.0);
        assert!(client.hec_set_pose(3, 1, &sample).await.acknowledged);
        let calibrate = client.hec_calibrate(3).await;
        assert!(calibrate.acknowledged);
        let transform = calibrate.response.unwrap().pose;
        assert!((transform.x - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_hec_failure_reports_description() {
        let response = encode_response(
            Action::HecCalibrate,
            0,
            ErrorCode::HecInsufficientDetection.code(),
            Pose::identity(),
            [0; 10],
        );
        let port = serve_responses(vec![response]).await;
        let mut client = connected_client(port).await;

        let report = client.hec_calibrate(0).await;
        assert!(!report.acknowledged);
        assert_eq!(
            report.error.as_deref(),
            Some("Calibration pattern not detected")
        );
    }

    #[tokio::test]
    async fn test_trigger_uses_pose_source_when_no_override() {
        // Capture the request bytes to check the encoded pose
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = tokio::sync::oneshot::channel::<Vec<u8>>();
        let response = encode_response(Action::TriggerJobAsync, 1, 0, Pose::identity(), [0; 10]);
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; REQUEST_LENGTH];
            stream.read_exact(&mut request).await.unwrap();
            stream.write_all(&response).await.unwrap();
            let _ = tx.send(request);
        });

        let mut client = GriClient::with_config(
            ClientConfig::new("127.0.0.1")
                .with_port(port)
                .with_timeout(Duration::from_secs(2)),
        )
        .with_pose_source(FixedPoseSource::new(Pose::new(
            7.0, 8.0, 9.0, 0.0, 0.0, 0.0, 1.0,
        )));
        assert!(client.connect().await);

        let report = client.trigger_job_async(1, None).await;
        assert!(report.acknowledged);

        let request = rx.await.unwrap();
        let x = i32::from_le_bytes(request[10..14].try_into().unwrap());
        assert_eq!(x, 7_000_000);
    }
}
