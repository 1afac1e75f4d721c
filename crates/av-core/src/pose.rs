//! Agent pose and local-frame steering math.
//!
//! # Frame conventions
//!
//! World space is right-handed with Y up; driving happens on the XZ ground
//! plane.  A pose's `heading` is the yaw angle in radians, with heading 0
//! facing +Z and increasing heading turning toward the pose's right vector:
//!
//! ```text
//! forward = ( sin h, 0, cos h )
//! right   = ( cos h, 0, -sin h )
//! ```
//!
//! In the local frame, `x` is the signed lateral offset (positive = right of
//! the agent) and `z` is the longitudinal offset (positive = ahead).  The
//! steering percentage fed to the control output is exactly the normalized
//! lateral component of the local-frame direction to the target.

use glam::Vec3;

/// Below this squared length a direction is considered degenerate and yields
/// zero steering instead of a NaN from normalization.
const DEGENERATE_LEN_SQ: f32 = 1e-8;

/// World position plus yaw heading.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec3,
    /// Yaw in radians; 0 faces +Z.
    pub heading: f32,
}

impl Pose {
    #[inline]
    pub fn new(position: Vec3, heading: f32) -> Self {
        Self { position, heading }
    }

    /// Unit vector the pose is facing along, on the ground plane.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    /// Unit vector to the pose's right, on the ground plane.
    #[inline]
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.heading.cos(), 0.0, -self.heading.sin())
    }

    /// Transform a world-space point into this pose's local frame.
    ///
    /// Returns `(lateral, vertical, longitudinal)`: `x` positive to the
    /// right, `z` positive ahead.
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        let d = point - self.position;
        Vec3::new(d.dot(self.right()), d.y, d.dot(self.forward()))
    }

    /// Normalized lateral fraction of the direction toward `point`, in
    /// `[-1, 1]`.  Positive means the point lies to the right.
    ///
    /// A degenerate (near-zero-length) direction returns 0.0 — never NaN.
    /// Steering values emitted to the control output must stay finite, so
    /// the guard lives here at the source.
    pub fn steer_fraction_to(&self, point: Vec3) -> f32 {
        let local = self.to_local(point);
        let len_sq = local.length_squared();
        if len_sq < DEGENERATE_LEN_SQ {
            return 0.0;
        }
        (local.x / len_sq.sqrt()).clamp(-1.0, 1.0)
    }

    /// Straight-line ground-plane distance to `point`.
    #[inline]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2}) @ {:.3} rad",
            self.position.x, self.position.y, self.position.z, self.heading
        )
    }
}
