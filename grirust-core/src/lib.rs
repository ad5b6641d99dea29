//! # grirust-core
//!
//! Core protocol implementation for the Roboception Generic Robot
//! Interface (GRI).
//!
//! This crate provides the low-level protocol primitives:
//! - Request/response message layout and encoding/decoding
//! - Scaled fixed-point pose conversion and quaternion normalization
//! - Action, job status, and return code vocabularies
//! - Protocol constants

pub mod action;
pub mod codes;
pub mod constants;
pub mod error;
pub mod message;
pub mod pose;

pub use action::{describe_status, Action, JobStatus, PoseFormat};
pub use codes::{describe_error, ErrorCode};
pub use error::{Error, Result};
pub use message::{RequestMessage, ResponseMessage};
pub use pose::Pose;
