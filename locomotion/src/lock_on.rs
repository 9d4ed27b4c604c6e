use log::info;

use crate::anim::{AnimParam, Animator};
use crate::query::{CameraGroup, EntityPositions, PhysicsQuery};
use crate::settings::LockOnSettings;
use crate::types::{CameraView, EntityId, Vec3};

/// Why a lock-on target was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseReason {
    /// Lock-on input pressed while locked.
    Toggled,
    /// Target moved beyond the maximum distance.
    OutOfRange,
    /// Target handle no longer resolves.
    Despawned,
    /// Character torn down.
    Teardown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockOnEvent {
    Acquired { target: EntityId },
    Switched { from: EntityId, to: EntityId },
    Released { target: EntityId, reason: ReleaseReason },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LockOnState {
    pub target: Option<EntityId>,
    pub max_distance: f32,
}

impl LockOnState {
    pub fn is_locked(&self) -> bool {
        self.target.is_some()
    }
}

/// Target selection and the camera/animation side effects of being locked on.
///
/// Every transition into or out of `Locked` goes through `attach`/`detach`, so camera-group
/// membership always mirrors `state.target`.
#[derive(Clone, Debug)]
pub struct LockOnController {
    settings: LockOnSettings,
    state: LockOnState,
}

impl LockOnController {
    pub fn new(settings: LockOnSettings) -> Self {
        let state = LockOnState {
            target: None,
            max_distance: settings.max_distance,
        };
        Self { settings, state }
    }

    pub fn state(&self) -> &LockOnState {
        &self.state
    }

    fn cast(&self, view: &CameraView, physics: &dyn PhysicsQuery) -> Option<EntityId> {
        physics
            .sphere_cast(
                view.position,
                self.settings.cast_radius,
                view.forward,
                self.settings.max_distance,
                self.settings.layers,
            )
            .map(|hit| hit.entity)
    }

    /// Lock-on input edge: release when locked, otherwise search along the camera view.
    pub fn toggle(
        &mut self,
        view: &CameraView,
        physics: &dyn PhysicsQuery,
        group: &mut dyn CameraGroup,
        anim: &mut Animator<'_>,
    ) -> Option<LockOnEvent> {
        if self.state.is_locked() {
            return self.release(ReleaseReason::Toggled, group, anim);
        }

        let target = self.cast(view, physics)?;
        self.attach(target, group, anim);
        info!("lock-on acquired {target:?}");
        Some(LockOnEvent::Acquired { target })
    }

    /// While locked, swap to whatever the view cast hits now. A miss keeps the target.
    pub fn reacquire(
        &mut self,
        view: &CameraView,
        physics: &dyn PhysicsQuery,
        group: &mut dyn CameraGroup,
    ) -> Option<LockOnEvent> {
        let current = self.state.target?;
        let hit = self.cast(view, physics)?;
        if hit == current {
            return None;
        }

        group.remove_member(current);
        group.add_member(hit, self.settings.member_weight, self.settings.member_radius);
        self.state.target = Some(hit);
        info!("lock-on switched {current:?} -> {hit:?}");
        Some(LockOnEvent::Switched {
            from: current,
            to: hit,
        })
    }

    /// Release a target that despawned or drifted past `max_distance` from `character`.
    pub fn enforce_range(
        &mut self,
        character: Vec3,
        entities: &dyn EntityPositions,
        group: &mut dyn CameraGroup,
        anim: &mut Animator<'_>,
    ) -> Option<LockOnEvent> {
        let target = self.state.target?;
        match entities.position_of(target) {
            None => self.release(ReleaseReason::Despawned, group, anim),
            Some(p) if (p - character).norm() > self.state.max_distance => {
                self.release(ReleaseReason::OutOfRange, group, anim)
            }
            Some(_) => None,
        }
    }

    /// Drop the current target, if any, and undo the lock-on side effects.
    pub fn release(
        &mut self,
        reason: ReleaseReason,
        group: &mut dyn CameraGroup,
        anim: &mut Animator<'_>,
    ) -> Option<LockOnEvent> {
        let target = self.state.target.take()?;
        group.remove_member(target);
        group.set_lock_on_rig(false);
        anim.flag(AnimParam::LockOn, false);
        info!("lock-on released {target:?} ({reason:?})");
        Some(LockOnEvent::Released { target, reason })
    }

    fn attach(&mut self, target: EntityId, group: &mut dyn CameraGroup, anim: &mut Animator<'_>) {
        self.state.target = Some(target);
        group.add_member(target, self.settings.member_weight, self.settings.member_radius);
        group.set_lock_on_rig(true);
        anim.flag(AnimParam::LockOn, true);
    }
}
