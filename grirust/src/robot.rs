//! Robot pose providers
//!
//! Job triggers send the robot's current pose along with the request so
//! the server can relate camera data to the robot frame. A controller
//! integration implements [`RobotPoseSource`] against its own state;
//! [`FixedPoseSource`] stands in when no live controller is attached.

use grirust_core::Pose;

/// Source of the robot's current pose, consulted for job triggers
/// without an explicit pose override
pub trait RobotPoseSource: Send + Sync {
    /// Current TCP position (millimeters) and orientation (quaternion)
    fn current_pose(&self) -> Pose;
}

/// Fixed pose provider for integrations without a live controller
#[derive(Debug, Clone)]
pub struct FixedPoseSource {
    pose: Pose,
}

impl FixedPoseSource {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }
}

impl Default for FixedPoseSource {
    fn default() -> Self {
        Self::new(Pose::new(100.0, 50.0, 200.0, 0.0, 0.0, 0.0, 1.0))
    }
}

impl RobotPoseSource for FixedPoseSource {
    fn current_pose(&self) -> Pose {
        self.pose
    }
}
