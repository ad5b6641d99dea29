//! Protocol constants

/// Message magic shared by requests and responses (`b"GRI\0"`, little-endian)
pub const MAGIC: u32 = u32::from_le_bytes(*b"GRI\0");

/// Protocol version implemented by this crate
pub const PROTOCOL_VERSION: u8 = 1;

/// Exact request message size in bytes
pub const REQUEST_LENGTH: usize = 54;

/// Exact response message size in bytes
pub const RESPONSE_LENGTH: usize = 80;

/// Fixed-point scale factor for pose components (micro-units)
pub const POSE_SCALE_FACTOR: f64 = 1_000_000.0;
