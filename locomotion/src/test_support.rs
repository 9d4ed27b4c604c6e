//! In-memory collaborators for unit tests: a flat world with spherical targets, a mover that
//! only knows about the floor, and recorders for every host-facing side effect.

use std::collections::HashMap;

use crate::anim::{AnimHandle, AnimationSink};
use crate::controller::Collaborators;
use crate::layers::{Layer, LayerMask};
use crate::query::{CameraGroup, CharacterMover, EntityPositions, PhysicsQuery, ShapeHit, WeaponRig};
use crate::types::{EntityId, Vec3};

/// Infinite ground plane plus a set of lock-on target spheres.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeWorld {
    floor_y: Option<f32>,
    targets: Vec<(EntityId, Vec3, f32)>,
}

impl FakeWorld {
    pub(crate) fn flat(floor_y: f32) -> Self {
        Self {
            floor_y: Some(floor_y),
            targets: Vec::new(),
        }
    }

    pub(crate) fn add_target(&mut self, id: EntityId, center: Vec3, radius: f32) {
        self.targets.retain(|(t, _, _)| *t != id);
        self.targets.push((id, center, radius));
    }

    pub(crate) fn remove_target(&mut self, id: EntityId) {
        self.targets.retain(|(t, _, _)| *t != id);
    }

    pub(crate) fn target_position(&self, id: EntityId) -> Option<Vec3> {
        self.targets
            .iter()
            .find(|(t, _, _)| *t == id)
            .map(|(_, c, _)| *c)
    }

    fn floor_below(&self, bottom: f32, layers: LayerMask) -> bool {
        layers.contains(Layer::Ground) && self.floor_y.is_some_and(|floor| bottom <= floor)
    }
}

impl PhysicsQuery for FakeWorld {
    fn sphere_check(&self, center: Vec3, radius: f32, layers: LayerMask) -> bool {
        if self.floor_below(center.y - radius, layers) {
            return true;
        }
        layers.contains(Layer::LockOnTarget)
            && self
                .targets
                .iter()
                .any(|(_, c, r)| (c - center).norm() <= r + radius)
    }

    fn box_check(&self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> bool {
        self.floor_below(center.y - half_extents.y, layers)
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<ShapeHit> {
        if !layers.contains(Layer::LockOnTarget) {
            return None;
        }
        self.targets
            .iter()
            .filter_map(|(id, c, r)| {
                let reach = r + radius;
                let oc = c - origin;
                let distance = if oc.norm() <= reach {
                    0.0
                } else {
                    let proj = oc.dot(&direction);
                    let miss_sq = oc.norm_squared() - proj * proj;
                    if miss_sq > reach * reach {
                        return None;
                    }
                    proj - (reach * reach - miss_sq).sqrt()
                };
                (0.0..=max_distance).contains(&distance).then_some(ShapeHit {
                    entity: *id,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl EntityPositions for FakeWorld {
    fn position_of(&self, entity: EntityId) -> Option<Vec3> {
        self.target_position(entity)
    }
}

/// Mover without walls: applies displacements verbatim and optionally rests on a floor.
#[derive(Clone, Debug, Default)]
pub(crate) struct KinematicMover {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Floor height and the distance from the character origin down to its feet.
    pub floor: Option<(f32, f32)>,
}

impl KinematicMover {
    pub(crate) fn on_floor(floor_y: f32, half_height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, floor_y + half_height, 0.0),
            velocity: Vec3::zeros(),
            floor: Some((floor_y, half_height)),
        }
    }
}

impl CharacterMover for KinematicMover {
    fn move_by(&mut self, displacement: Vec3, dt: f32) {
        let start = self.position;
        let mut next = start + displacement;
        if let Some((floor_y, half_height)) = self.floor {
            next.y = next.y.max(floor_y + half_height);
        }
        self.position = next;
        if dt > 0.0 {
            self.velocity = (next - start) / dt;
        }
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

/// Records parameter writes by name.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingAnimator {
    pub resolved: Vec<String>,
    names: HashMap<AnimHandle, String>,
    floats: HashMap<String, f32>,
    bools: HashMap<String, bool>,
    triggers: HashMap<String, usize>,
    layer_weights: Vec<(i32, f32)>,
}

impl RecordingAnimator {
    fn name_of(&self, handle: AnimHandle) -> String {
        self.names
            .get(&handle)
            .cloned()
            .unwrap_or_else(|| format!("#{}", handle.0))
    }

    pub(crate) fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    pub(crate) fn flag(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    pub(crate) fn trigger_count(&self, name: &str) -> usize {
        self.triggers.get(name).copied().unwrap_or(0)
    }

    pub(crate) fn last_layer_weight(&self, layer: i32) -> Option<f32> {
        self.layer_weights
            .iter()
            .rev()
            .find(|(l, _)| *l == layer)
            .map(|(_, w)| *w)
    }
}

impl AnimationSink for RecordingAnimator {
    fn resolve(&mut self, name: &str) -> AnimHandle {
        let handle = AnimHandle::from_name(name);
        self.resolved.push(name.to_string());
        self.names.insert(handle, name.to_string());
        handle
    }

    fn set_float(&mut self, param: AnimHandle, value: f32) {
        let name = self.name_of(param);
        self.floats.insert(name, value);
    }

    fn set_bool(&mut self, param: AnimHandle, value: bool) {
        let name = self.name_of(param);
        self.bools.insert(name, value);
    }

    fn set_trigger(&mut self, param: AnimHandle) {
        let name = self.name_of(param);
        *self.triggers.entry(name).or_default() += 1;
    }

    fn set_layer_weight(&mut self, layer: i32, weight: f32) {
        self.layer_weights.push((layer, weight));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum GroupCall {
    Add(EntityId, f32, f32),
    Remove(EntityId),
    Rig(bool),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingCameraGroup {
    pub calls: Vec<GroupCall>,
}

impl RecordingCameraGroup {
    /// Current membership, replayed from the call log.
    pub(crate) fn members(&self) -> Vec<EntityId> {
        let mut members = Vec::new();
        for call in &self.calls {
            match *call {
                GroupCall::Add(id, _, _) => members.push(id),
                GroupCall::Remove(id) => members.retain(|m| *m != id),
                GroupCall::Rig(_) => {}
            }
        }
        members
    }

    pub(crate) fn remove_count(&self, id: EntityId) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == GroupCall::Remove(id))
            .count()
    }
}

impl CameraGroup for RecordingCameraGroup {
    fn add_member(&mut self, target: EntityId, weight: f32, radius: f32) {
        self.calls.push(GroupCall::Add(target, weight, radius));
    }

    fn remove_member(&mut self, target: EntityId) {
        self.calls.push(GroupCall::Remove(target));
    }

    fn set_lock_on_rig(&mut self, active: bool) {
        self.calls.push(GroupCall::Rig(active));
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingWeapon {
    pub drawn: Option<bool>,
}

impl WeaponRig for RecordingWeapon {
    fn set_weapon_drawn(&mut self, drawn: bool) {
        self.drawn = Some(drawn);
    }
}

/// Every collaborator a controller needs, for scenario tests.
#[derive(Debug, Default)]
pub(crate) struct Harness {
    pub world: FakeWorld,
    pub mover: KinematicMover,
    pub animator: RecordingAnimator,
    pub group: RecordingCameraGroup,
    pub weapon: RecordingWeapon,
}

impl Harness {
    /// A two-meter character standing at the origin of a flat floor at y = 0.
    pub(crate) fn standing() -> Self {
        Self {
            world: FakeWorld::flat(0.0),
            mover: KinematicMover::on_floor(0.0, 1.0),
            ..Self::default()
        }
    }

    pub(crate) fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            physics: &self.world,
            entities: &self.world,
            mover: &mut self.mover,
            animator: &mut self.animator,
            camera_group: &mut self.group,
            weapon: &mut self.weapon,
        }
    }
}
