/*!
Core math aliases and small value types shared by every controller component.

This module intentionally contains no algorithms. It defines the data exchanged between:
- the ground probe and physics queries
- the locomotion, lock-on and camera controllers
- the host engine (through the collaborator traits in `query`)

Conventions
- World is Y-up, units are meters and seconds.
- Angles crossing component boundaries are degrees (yaw/pitch), matching the tuning data.
- Yaw 0 faces +Z; positive yaw turns toward +X. A right-handed rotation of `yaw` about +Y
  maps +Z onto `(sin yaw, 0, cos yaw)`, so `Quat::from_axis_angle(&Vec3::y_axis(), yaw)`
  and the yaw helpers in `utils` agree.
*/

use nalgebra as na;

use crate::utils::yaw_from_xz;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Opaque handle to an entity owned by the host (lock-on targets, static props).
///
/// The controller never dereferences it; it only hands it back to the host through
/// `EntityPositions` and `CameraGroup`. A handle whose entity was destroyed simply stops
/// resolving, which is how the "weak reference" of the lock-on target is modeled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Pose of the rendering camera for the current frame.
///
/// Supplied by the host every tick. Locomotion reads `yaw_deg` to turn stick input into a
/// world direction; lock-on casts from `position` along `forward`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    /// Unit view direction.
    pub forward: Vec3,
    /// Heading of `forward` in degrees, normalized to [0, 360).
    pub yaw_deg: f32,
}

impl CameraView {
    /// Build a view from a position and a (not necessarily normalized) forward vector.
    ///
    /// A degenerate forward falls back to +Z so queries stay well defined.
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        let forward = forward.try_normalize(1.0e-6).unwrap_or_else(Vec3::z);
        let yaw_deg = yaw_from_xz(forward.x, forward.z)
            .map(|yaw| yaw.rem_euclid(360.0))
            .unwrap_or(0.0);
        Self {
            position,
            forward,
            yaw_deg,
        }
    }

    /// Build a view looking along `yaw_deg`/`pitch_deg` (positive pitch looks down).
    pub fn from_yaw_pitch(position: Vec3, yaw_deg: f32, pitch_deg: f32) -> Self {
        let (sy, cy) = yaw_deg.to_radians().sin_cos();
        let (sp, cp) = pitch_deg.to_radians().sin_cos();
        Self::new(position, Vec3::new(sy * cp, -sp, cy * cp))
    }
}
