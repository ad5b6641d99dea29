//! Robot pose representation and scaled fixed-point conversion

use std::fmt;

use crate::constants::POSE_SCALE_FACTOR;

/// Convert a floating-point value to its 32-bit scaled wire representation
///
/// Values outside the representable range (about ±2147 in physical units)
/// saturate at the `i32` bounds.
pub fn float_to_scaled(value: f64) -> i32 {
    (value * POSE_SCALE_FACTOR).round() as i32
}

/// Convert a scaled wire value back to its floating-point form
pub fn scaled_to_float(value: i32) -> f64 {
    f64::from(value) / POSE_SCALE_FACTOR
}

/// Robot pose: position in millimeters, orientation as a unit quaternion
/// in XYZW order
///
/// Poses are plain values; they are copied across a send, never aliased,
/// so serializing one can never mutate the caller's copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub q4: f64,
}

impl Pose {
    /// Create a pose from explicit components
    pub fn new(x: f64, y: f64, z: f64, q1: f64, q2: f64, q3: f64, q4: f64) -> Self {
        Self { x, y, z, q1, q2, q3, q4 }
    }

    /// The origin pose with identity rotation
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0)
    }

    /// Return a copy with the quaternion normalized to unit length
    ///
    /// A zero-magnitude quaternion normalizes to the identity rotation.
    pub fn normalized(&self) -> Self {
        let magnitude =
            (self.q1 * self.q1 + self.q2 * self.q2 + self.q3 * self.q3 + self.q4 * self.q4).sqrt();

        if magnitude <= 0.0 {
            return Self::new(self.x, self.y, self.z, 0.0, 0.0, 0.0, 1.0);
        }

        Self::new(
            self.x,
            self.y,
            self.z,
            self.q1 / magnitude,
            self.q2 / magnitude,
            self.q3 / magnitude,
            self.q4 / magnitude,
        )
    }

    /// Scale the normalized pose components to protocol integers
    pub fn to_scaled(&self) -> [i32; 7] {
        let pose = self.normalized();
        [
            float_to_scaled(pose.x),
            float_to_scaled(pose.y),
            float_to_scaled(pose.z),
            float_to_scaled(pose.q1),
            float_to_scaled(pose.q2),
            float_to_scaled(pose.q3),
            float_to_scaled(pose.q4),
        ]
    }

    /// Reconstruct a pose from scaled protocol integers
    pub fn from_scaled(values: [i32; 7]) -> Self {
        Self::new(
            scaled_to_float(values[0]),
            scaled_to_float(values[1]),
            scaled_to_float(values[2]),
            scaled_to_float(values[3]),
            scaled_to_float(values[4]),
            scaled_to_float(values[5]),
            scaled_to_float(values[6]),
        )
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pose(x={:.2}, y={:.2}, z={:.2}, q1={:.4}, q2={:.4}, q3={:.4}, q4={:.4})",
            self.x, self.y, self.z, self.q1, self.q2, self.q3, self.q4
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_scaling_round_trip() {
        for value in [0.0, 1.0, -1.0, 123.456789, -2000.5, 0.000001] {
            let scaled = float_to_scaled(value);
            assert!((scaled_to_float(scaled) - value).abs() < 1e-6);
        }
    }

    #[test]
    fn test_scaling_rounds_to_nearest() {
        assert_eq!(float_to_scaled(0.0000014), 1);
        assert_eq!(float_to_scaled(0.0000016), 2);
        assert_eq!(float_to_scaled(-0.0000016), -2);
    }

    #[test]
    fn test_scaling_saturates() {
        assert_eq!(float_to_scaled(1e10), i32::MAX);
        assert_eq!(float_to_scaled(-1e10), i32::MIN);
    }

    #[test]
    fn test_identity() {
        let pose = Pose::identity();
        assert_eq!(pose, Pose::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0));
        assert_eq!(Pose::default(), pose);
    }

    #[test]
    fn test_normalized_unit_length() {
        let pose = Pose::new(1.0, 2.0, 3.0, 1.0, 1.0, 1.0, 1.0);
        let normalized = pose.normalized();
        let magnitude_sq = normalized.q1 * normalized.q1
            + normalized.q2 * normalized.q2
            + normalized.q3 * normalized.q3
            + normalized.q4 * normalized.q4;
        assert!((magnitude_sq - 1.0).abs() < 1e-9);
        assert_eq!(normalized.x, 1.0);
    }

    #[test]
    fn test_zero_quaternion_normalizes_to_identity() {
        let pose = Pose::new(5.0, 6.0, 7.0, 0.0, 0.0, 0.0, 0.0);
        let normalized = pose.normalized();
        assert_eq!(normalized.q1, 0.0);
        assert_eq!(normalized.q2, 0.0);
        assert_eq!(normalized.q3, 0.0);
        assert_eq!(normalized.q4, 1.0);
        assert_eq!(normalized.x, 5.0);
    }

    #[test]
    fn test_normalized_leaves_original_untouched() {
        let pose = Pose::new(0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0);
        let _ = pose.normalized();
        assert_eq!(pose.q1, 2.0);
    }

    #[test]
    fn test_to_scaled_normalizes() {
        let pose = Pose::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0);
        let scaled = pose.to_scaled();
        assert_eq!(scaled[6], 1_000_000);
    }

    #[test]
    fn test_from_scaled() {
        let pose = Pose::from_scaled([100_000_000, -50_000_000, 0, 0, 0, 0, 1_000_000]);
        assert_eq!(pose.x, 100.0);
        assert_eq!(pose.y, -50.0);
        assert_eq!(pose.q4, 1.0);
    }

    proptest! {
        #[test]
        fn prop_scaling_round_trip(value in -2000.0f64..2000.0) {
            let recovered = scaled_to_float(float_to_scaled(value));
            prop_assert!((recovered - value).abs() < 1e-6);
        }

        #[test]
        fn prop_encode_normalizes(
            q1 in -1.0f64..1.0,
            q2 in -1.0f64..1.0,
            q3 in -1.0f64..1.0,
            q4 in -1.0f64..1.0,
        ) {
            prop_assume!((q1 * q1 + q2 * q2 + q3 * q3 + q4 * q4).sqrt() > 1e-3);
            let scaled = Pose::new(0.0, 0.0, 0.0, q1, q2, q3, q4).to_scaled();
            let decoded = Pose::from_scaled(scaled);
            let magnitude_sq = decoded.q1 * decoded.q1
                + decoded.q2 * decoded.q2
                + decoded.q3 * decoded.q3
                + decoded.q4 * decoded.q4;
            prop_assert!((magnitude_sq - 1.0).abs() < 1e-5);
        }

        #[test]
        fn prop_pose_round_trip(
            x in -2000.0f64..2000.0,
            y in -2000.0f64..2000.0,
            z in -2000.0f64..2000.0,
        ) {
            let pose = Pose::new(x, y, z, 0.0, 0.0, 0.0, 1.0);
            let decoded = Pose::from_scaled(pose.to_scaled());
            prop_assert!((decoded.x - x).abs() < 1e-6);
            prop_assert!((decoded.y - y).abs() < 1e-6);
            prop_assert!((decoded.z - z).abs() < 1e-6);
        }
    }
}
