//! Sandbox level: one list of static definitions feeds both the rendered meshes and the
//! Rapier query world the controller collides against.

use bevy::prelude::*;
use locomotion::{ColliderShapeDef, EntityId, Layer, RapierQueryWorld, WorldStaticDef};
use nalgebra as na;

use crate::convert::{quat_to_bevy, to_bevy};

/// Static collision world shared by every controller in the sandbox.
#[derive(Resource)]
pub struct StaticWorld(pub RapierQueryWorld);

/// Marks the rendered mesh of a lock-on dummy.
#[derive(Component, Debug)]
pub struct LockOnDummy(pub EntityId);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
}

fn def(id: u32, layer: Layer, translation: [f32; 3], shape: ColliderShapeDef) -> WorldStaticDef {
    WorldStaticDef {
        id,
        entity: EntityId(id as u64),
        layer,
        sensor: false,
        translation: na::Vector3::new(translation[0], translation[1], translation[2]),
        rotation: na::UnitQuaternion::identity(),
        shape,
    }
}

/// Floor, a ramp, a few props, a trigger volume and a ring of lock-on dummies.
pub fn level_statics() -> Vec<WorldStaticDef> {
    let mut statics = vec![
        def(
            1,
            Layer::Ground,
            [0.0, 0.0, 0.0],
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        ),
        def(
            3,
            Layer::Prop,
            [5.0, 0.5, 0.0],
            ColliderShapeDef::Cuboid {
                half_extents: na::Vector3::new(0.5, 0.5, 0.5),
            },
        ),
        def(
            4,
            Layer::Prop,
            [-6.0, 1.5, 4.0],
            ColliderShapeDef::CylinderY {
                radius: 0.6,
                half_height: 1.5,
            },
        ),
        def(
            5,
            Layer::Default,
            [0.0, 2.0, -12.0],
            ColliderShapeDef::Cuboid {
                half_extents: na::Vector3::new(8.0, 2.0, 0.5),
            },
        ),
    ];

    let mut ramp = def(
        2,
        Layer::Ground,
        [-4.0, 0.4, -4.0],
        ColliderShapeDef::Cuboid {
            half_extents: na::Vector3::new(2.0, 0.25, 3.0),
        },
    );
    ramp.rotation = na::UnitQuaternion::from_axis_angle(&na::Vector3::x_axis(), 12f32.to_radians());
    statics.push(ramp);

    // Sensors never count as ground or as lock-on targets.
    let mut trigger = def(
        6,
        Layer::Ground,
        [6.0, 1.0, 6.0],
        ColliderShapeDef::Cuboid {
            half_extents: na::Vector3::new(1.5, 1.0, 1.5),
        },
    );
    trigger.sensor = true;
    statics.push(trigger);

    for (i, angle) in [0.0_f32, 50.0, 130.0, 200.0, 290.0].into_iter().enumerate() {
        let distance = 8.0 + 3.0 * i as f32;
        let (sin, cos) = angle.to_radians().sin_cos();
        statics.push(def(
            100 + i as u32,
            Layer::LockOnTarget,
            [sin * distance, 1.0, cos * distance],
            ColliderShapeDef::CapsuleY {
                radius: 0.4,
                half_height: 0.5,
            },
        ));
    }

    statics
}

fn mesh_for(shape: &ColliderShapeDef) -> Mesh {
    match shape {
        ColliderShapeDef::Plane { .. } => Plane3d::default().mesh().size(60., 60.).build(),
        ColliderShapeDef::Cuboid { half_extents } => {
            Cuboid::new(half_extents.x * 2.0, half_extents.y * 2.0, half_extents.z * 2.0).into()
        }
        ColliderShapeDef::Sphere { radius } => Sphere::new(*radius).into(),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => Capsule3d::new(*radius, *half_height * 2.0).into(),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => Cylinder::new(*radius, *half_height * 2.0).into(),
    }
}

fn color_for(def: &WorldStaticDef) -> Color {
    if def.sensor {
        return Color::srgba(0.3, 0.6, 1.0, 0.25);
    }
    match def.layer {
        Layer::Ground => Color::linear_rgb(0.2, 0.3, 0.25),
        Layer::LockOnTarget => Color::linear_rgb(0.9, 0.2, 0.2),
        Layer::Prop => Color::srgb_u8(124, 144, 255),
        Layer::Default | Layer::Player => Color::linear_rgb(0.5, 0.5, 0.5),
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let statics = level_statics();

    for def in &statics {
        let color = color_for(def);
        let mut entity = commands.spawn((
            Name::new(format!("Static {}", def.id)),
            Mesh3d(meshes.add(mesh_for(&def.shape))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                alpha_mode: if def.sensor {
                    AlphaMode::Blend
                } else {
                    AlphaMode::Opaque
                },
                perceptual_roughness: 1.0,
                metallic: 0.0,
                ..default()
            })),
            Transform {
                translation: to_bevy(&def.translation),
                rotation: quat_to_bevy(&def.rotation),
                ..default()
            },
        ));
        if def.layer == Layer::LockOnTarget {
            entity.insert(LockOnDummy(def.entity));
        }
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let world = RapierQueryWorld::build(statics);
    info!("static world ready: {} colliders", world.collider_count());
    commands.insert_resource(StaticWorld(world));
}
