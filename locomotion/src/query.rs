/*!
Host capabilities the controller drives.

The controller never talks to an engine directly. Each frame the host lends it these
collaborators (see `controller::Collaborators`); a Rapier-backed implementation of the
physics and mover traits lives in `rapier_world`.

Notes
- All queries ignore trigger/sensor volumes.
- Query misses are `None`/`false`, never errors.
*/

use crate::layers::LayerMask;
use crate::types::{EntityId, Vec3};

/// First entity hit by a shape cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeHit {
    pub entity: EntityId,
    /// Distance travelled along the cast direction before contact (meters).
    pub distance: f32,
}

/// Overlap and cast queries against the static world.
pub trait PhysicsQuery {
    /// Does a sphere at `center` overlap any collider on `layers`?
    fn sphere_check(&self, center: Vec3, radius: f32, layers: LayerMask) -> bool;

    /// Does an axis-aligned box at `center` overlap any collider on `layers`?
    fn box_check(&self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> bool;

    /// Sweep a sphere from `origin` along unit `direction` and return the first hit.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<ShapeHit>;
}

/// Resolves entity handles to world positions. Despawned entities resolve to `None`.
pub trait EntityPositions {
    fn position_of(&self, entity: EntityId) -> Option<Vec3>;
}

/// Collision-resolved character motion.
pub trait CharacterMover {
    /// Applies `displacement` over `dt`, sliding along whatever it hits.
    fn move_by(&mut self, displacement: Vec3, dt: f32);

    fn position(&self) -> Vec3;

    /// Velocity produced by the last `move_by`.
    fn velocity(&self) -> Vec3;
}

/// Camera framing group used while locked on.
pub trait CameraGroup {
    fn add_member(&mut self, target: EntityId, weight: f32, radius: f32);
    fn remove_member(&mut self, target: EntityId);
    /// Switch between the lock-on rig (`true`) and the base follow camera.
    fn set_lock_on_rig(&mut self, active: bool);
}

/// Visible weapon models.
pub trait WeaponRig {
    /// Show the drawn weapon in hand (`true`) or the sheathed one (`false`).
    fn set_weapon_drawn(&mut self, drawn: bool);
}
