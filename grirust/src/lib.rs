//! # grirust
//!
//! Rust client for the Roboception Generic Robot Interface (GRI)
//! protocol: trigger perception jobs on a vision/guidance server,
//! retrieve computed poses, and run the hand-eye calibration sequence.
//!
//! ## Features
//!
//! - Type-safe wire protocol implementation
//! - Async/await API using Tokio
//! - Typed per-action result reports
//! - Bounded polling for asynchronous jobs
//!
//! ## Quick Start
//!
//! ```no_run
//! use grirust::GriClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut client = GriClient::new("192.168.2.1", 7100);
//!     if !client.connect().await {
//!         eprintln!("connection failed");
//!         return;
//!     }
//!
//!     let status = client.get_status().await;
//!     println!("server ready: {}", status.ready);
//!
//!     client.disconnect().await;
//! }
//! ```

pub mod client;
pub mod error;
pub mod poller;
pub mod report;
pub mod robot;

// Re-exports
pub use client::GriClient;
pub use error::{Error, Result};
pub use report::{
    AsyncTriggerReport, HecReport, JobStatusReport, PoseReport, RelatedPoseReport, StatusReport,
    SyncJobReport,
};
pub use robot::{FixedPoseSource, RobotPoseSource};

// Re-export protocol types
pub use grirust_core::{
    describe_error, describe_status, Action, ErrorCode, JobStatus, Pose, RequestMessage,
    ResponseMessage,
};
pub use grirust_types::ClientConfig;
