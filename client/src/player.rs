use bevy::prelude::*;
use locomotion::{
    CameraView, ColliderShape, Collaborators, ConfigurationError, ControllerEvent,
    ControllerSettings, FrameInput, KinematicBody, PlayerController, RapierCharacter,
    RapierQueryWorld,
};

use crate::animation::{AnimationTimeline, AnimatorState};
use crate::camera::{FollowCamera, LockOnFraming};
use crate::convert::{quat_to_bevy, to_bevy, to_na};
use crate::input::{self, PlayerInput};
use crate::settings::ControllerConfig;
use crate::weapon::{HandWeapon, SheathedWeapon, WeaponVisuals};
use crate::world::StaticWorld;

const SPAWN_POINT: Vec3 = Vec3::new(0.0, 3.0, 0.0);
const CAPSULE_RADIUS: f32 = 0.3;
const CAPSULE_HEIGHT: f32 = 1.8;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(PostStartup, spawn_player);
    app.add_systems(Update, drive_player.after(input::sample_input));
}

/// The controlled character: its controller and the capsule it moves.
#[derive(Component)]
pub struct PlayerCharacter {
    pub controller: PlayerController,
    pub body: KinematicBody,
}

fn character_collider() -> ColliderShape {
    ColliderShape::CharacterCapsule {
        radius: CAPSULE_RADIUS,
        height: CAPSULE_HEIGHT,
    }
}

fn start_controller(
    settings: &ControllerSettings,
    world: &RapierQueryWorld,
    body: &mut KinematicBody,
    animator: &mut AnimatorState,
    framing: &mut LockOnFraming,
    weapon: &mut WeaponVisuals,
) -> Result<PlayerController, ConfigurationError> {
    let mut mover = RapierCharacter::new(world, body);
    let mut c = Collaborators {
        physics: world,
        entities: world,
        mover: &mut mover,
        animator,
        camera_group: framing,
        weapon,
    };
    PlayerController::spawn(settings.clone(), Some(&character_collider()), &mut c)
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<ControllerConfig>,
    world: Res<StaticWorld>,
    mut framing: ResMut<LockOnFraming>,
) {
    let mut body = KinematicBody::capsule(to_na(SPAWN_POINT), CAPSULE_RADIUS, CAPSULE_HEIGHT);
    let mut animator = AnimatorState::default();
    let mut weapon = WeaponVisuals::default();
    let controller = match start_controller(
        &config.0,
        &world.0,
        &mut body,
        &mut animator,
        &mut framing,
        &mut weapon,
    ) {
        Ok(controller) => controller,
        Err(err) => {
            error!("player not spawned: {err}");
            return;
        }
    };
    info!("player spawned at {SPAWN_POINT}");

    let half_length = CAPSULE_HEIGHT * 0.5 - CAPSULE_RADIUS;
    commands
        .spawn((
            Name::new("Player"),
            Mesh3d(meshes.add(Mesh::from(Capsule3d {
                radius: CAPSULE_RADIUS,
                half_length,
            }))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::linear_rgb(0.2, 0.9, 0.8),
                ..default()
            })),
            Transform::from_translation(SPAWN_POINT),
            PlayerCharacter { controller, body },
            animator,
            AnimationTimeline::default(),
            weapon,
        ))
        .with_children(|parent| {
            // Eyes mark the front (+Z).
            let eye_mesh = meshes.add(Mesh::from(Sphere { radius: 0.08 }));
            let eye_mat = materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 1.0, 1.0),
                ..default()
            });
            for (name, x) in [("LeftEye", -0.12), ("RightEye", 0.12)] {
                parent.spawn((
                    Name::new(name),
                    Mesh3d(eye_mesh.clone()),
                    MeshMaterial3d(eye_mat.clone()),
                    Transform::from_xyz(x, half_length, CAPSULE_RADIUS),
                ));
            }

            let blade = meshes.add(Cuboid::new(0.06, 0.06, 0.9));
            let steel = materials.add(StandardMaterial {
                base_color: Color::srgb(0.75, 0.75, 0.8),
                metallic: 0.8,
                ..default()
            });
            parent.spawn((
                Name::new("HandWeapon"),
                HandWeapon,
                Mesh3d(blade.clone()),
                MeshMaterial3d(steel.clone()),
                Transform::from_xyz(CAPSULE_RADIUS + 0.1, 0.0, 0.45),
                Visibility::Hidden,
            ));
            parent.spawn((
                Name::new("SheathedWeapon"),
                SheathedWeapon,
                Mesh3d(blade),
                MeshMaterial3d(steel),
                Transform::from_xyz(0.0, 0.2, -CAPSULE_RADIUS - 0.05)
                    .with_rotation(Quat::from_rotation_x(70f32.to_radians())),
                Visibility::Inherited,
            ));
        });
}

fn log_events(events: &[ControllerEvent]) {
    for event in events {
        match event {
            ControllerEvent::LockOn(ev) => info!("lock-on: {ev:?}"),
            ControllerEvent::Equip(ev) => info!("weapon: {ev:?}"),
            other => debug!("{other:?}"),
        }
    }
}

/// Update phase plus the animation callbacks that fell due this frame.
fn drive_player(
    time: Res<Time>,
    input: Res<PlayerInput>,
    config: Res<ControllerConfig>,
    world: Res<StaticWorld>,
    mut framing: ResMut<LockOnFraming>,
    camera: Single<&Transform, (With<FollowCamera>, Without<PlayerCharacter>)>,
    mut players: Query<(
        &mut PlayerCharacter,
        &mut AnimatorState,
        &mut AnimationTimeline,
        &mut WeaponVisuals,
        &mut Transform,
    )>,
) {
    let dt = time.delta_secs();
    let frame = FrameInput {
        sample: input.sample,
        dt,
        camera: CameraView::new(to_na(camera.translation), to_na(*camera.forward())),
    };

    for (mut player, mut animator, mut timeline, mut weapon, mut transform) in &mut players {
        let PlayerCharacter { controller, body } = &mut *player;

        if input.respawn {
            {
                let mut mover = RapierCharacter::new(&world.0, body);
                let mut c = Collaborators {
                    physics: &world.0,
                    entities: &world.0,
                    mover: &mut mover,
                    animator: &mut *animator,
                    camera_group: &mut *framing,
                    weapon: &mut *weapon,
                };
                controller.teardown(&mut c);
            }
            log_events(controller.events());

            *body = KinematicBody::capsule(to_na(SPAWN_POINT), CAPSULE_RADIUS, CAPSULE_HEIGHT);
            match start_controller(
                &config.0,
                &world.0,
                body,
                &mut animator,
                &mut framing,
                &mut weapon,
            ) {
                Ok(fresh) => {
                    *controller = fresh;
                    *timeline = AnimationTimeline::default();
                    info!("player respawned");
                }
                Err(err) => error!("respawn failed: {err}"),
            }
        }

        let report = {
            let mut mover = RapierCharacter::new(&world.0, body);
            let mut c = Collaborators {
                physics: &world.0,
                entities: &world.0,
                mover: &mut mover,
                animator: &mut *animator,
                camera_group: &mut *framing,
                weapon: &mut *weapon,
            };
            controller.update(&frame, &mut c)
        };
        log_events(controller.events());

        timeline.observe(&mut animator);
        let due = timeline.advance(dt);
        if !due.is_empty() {
            let seen = controller.events().len();
            let mut mover = RapierCharacter::new(&world.0, body);
            let mut c = Collaborators {
                physics: &world.0,
                entities: &world.0,
                mover: &mut mover,
                animator: &mut *animator,
                camera_group: &mut *framing,
                weapon: &mut *weapon,
            };
            for event in due {
                controller.handle_animation_event(event, &mut c);
            }
            log_events(&controller.events()[seen..]);
        }

        transform.translation = to_bevy(&report.position);
        transform.rotation = quat_to_bevy(&report.orientation);
    }
}
