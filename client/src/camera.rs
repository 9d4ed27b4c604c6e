//! Third-person follow camera.
//!
//! The controller decides the orbit rotation in its late phase; this module turns that
//! rotation into a camera pose behind the pivot. While locked on, the lock-on rig pulls the
//! camera back and frames the pivot together with the framing members.

use bevy::prelude::*;
use locomotion::{
    CameraGroup, CameraView, Collaborators, EntityId, EntityPositions, FrameInput,
    RapierCharacter,
};

use crate::animation::AnimatorState;
use crate::convert::{quat_to_bevy, to_bevy, to_na};
use crate::input::PlayerInput;
use crate::player::PlayerCharacter;
use crate::settings::ControllerConfig;
use crate::weapon::WeaponVisuals;
use crate::world::StaticWorld;

const FOLLOW_DISTANCE: f32 = 4.0;
const LOCK_ON_DISTANCE: f32 = 5.5;
const CAMERA_DECAY_RATE: f32 = 44.0;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<LockOnFraming>();
    app.add_systems(Startup, add_camera);
    app.add_systems(PostUpdate, place_camera);
}

#[derive(Component)]
pub struct FollowCamera;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramingMember {
    pub target: EntityId,
    pub weight: f32,
    pub radius: f32,
}

/// Target group framed by the lock-on rig.
#[derive(Resource, Debug, Default)]
pub struct LockOnFraming {
    members: Vec<FramingMember>,
    rig_active: bool,
}

impl LockOnFraming {
    pub fn members(&self) -> &[FramingMember] {
        &self.members
    }

    pub fn rig_active(&self) -> bool {
        self.rig_active
    }

    /// Weighted centre of the pivot (weight 1) and every member that still resolves.
    pub fn focus(&self, pivot: Vec3, entities: &dyn EntityPositions) -> Vec3 {
        let mut sum = pivot;
        let mut total = 1.0;
        for member in &self.members {
            if let Some(position) = entities.position_of(member.target) {
                sum += to_bevy(&position) * member.weight;
                total += member.weight;
            }
        }
        sum / total
    }
}

impl CameraGroup for LockOnFraming {
    fn add_member(&mut self, target: EntityId, weight: f32, radius: f32) {
        let member = FramingMember {
            target,
            weight,
            radius,
        };
        match self.members.iter_mut().find(|m| m.target == target) {
            Some(existing) => *existing = member,
            None => self.members.push(member),
        }
    }

    fn remove_member(&mut self, target: EntityId) {
        self.members.retain(|m| m.target != target);
    }

    fn set_lock_on_rig(&mut self, active: bool) {
        self.rig_active = active;
    }
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Follow Camera"),
        FollowCamera,
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::from_xyz(0.0, 2.0, -FOLLOW_DISTANCE).looking_at(Vec3::Y, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                200.0,
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
    ));
}

/// Camera phase: runs after the player has moved for the frame.
fn place_camera(
    time: Res<Time>,
    input: Res<PlayerInput>,
    config: Res<ControllerConfig>,
    world: Res<StaticWorld>,
    mut framing: ResMut<LockOnFraming>,
    mut camera: Single<&mut Transform, (With<FollowCamera>, Without<PlayerCharacter>)>,
    mut players: Query<(&mut PlayerCharacter, &mut AnimatorState, &mut WeaponVisuals)>,
) {
    let Ok((mut player, mut animator, mut weapon)) = players.single_mut() else {
        return;
    };
    let PlayerCharacter { controller, body } = &mut *player;
    let position = body.position;
    let dt = time.delta_secs();

    let frame = FrameInput {
        sample: input.sample,
        dt,
        camera: CameraView::new(to_na(camera.translation), to_na(*camera.forward())),
    };
    let rotation = {
        let mut mover = RapierCharacter::new(&world.0, body);
        let c = Collaborators {
            physics: &world.0,
            entities: &world.0,
            mover: &mut mover,
            animator: &mut *animator,
            camera_group: &mut *framing,
            weapon: &mut *weapon,
        };
        quat_to_bevy(&controller.late_update(&frame, &c))
    };

    let pivot = to_bevy(&position) + Vec3::Y * config.0.camera.target_offset_y;
    let distance = if framing.rig_active() {
        LOCK_ON_DISTANCE
    } else {
        FOLLOW_DISTANCE
    };
    let desired = pivot - rotation * Vec3::Z * distance;
    camera
        .translation
        .smooth_nudge(&desired, CAMERA_DECAY_RATE, dt);

    let focus = framing.focus(pivot, &world.0);
    camera.look_at(focus, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct Positions(HashMap<EntityId, locomotion::Vec3>);

    impl EntityPositions for Positions {
        fn position_of(&self, entity: EntityId) -> Option<locomotion::Vec3> {
            self.0.get(&entity).copied()
        }
    }

    #[test]
    fn members_are_unique_per_target() {
        let mut framing = LockOnFraming::default();
        framing.add_member(EntityId(1), 1.0, 0.5);
        framing.add_member(EntityId(1), 2.0, 0.5);
        framing.add_member(EntityId(2), 1.0, 0.5);
        assert_eq!(framing.members().len(), 2);
        assert_eq!(framing.members()[0].weight, 2.0);

        framing.remove_member(EntityId(1));
        framing.remove_member(EntityId(9));
        assert_eq!(framing.members().len(), 1);
        assert_eq!(framing.members()[0].target, EntityId(2));
    }

    #[test]
    fn focus_is_weighted_between_pivot_and_target() {
        let mut framing = LockOnFraming::default();
        framing.set_lock_on_rig(true);
        framing.add_member(EntityId(1), 1.0, 0.5);
        framing.add_member(EntityId(2), 1.0, 0.5);
        let positions = Positions(HashMap::from([(
            EntityId(1),
            locomotion::Vec3::new(0.0, 0.0, 10.0),
        )]));

        // Member 2 no longer resolves and is left out.
        let focus = framing.focus(Vec3::ZERO, &positions);
        assert!((focus - Vec3::new(0.0, 0.0, 5.0)).length() < 1.0e-5);
        assert!(framing.rig_active());
    }
}
