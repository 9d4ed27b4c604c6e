//! Debug tooling for native dev builds.
//!
//! Logs frame diagnostics and draws the controller's hidden state: the ground probe, the
//! facing direction and the current lock-on target.

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin,
    SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use locomotion::EntityPositions;

use crate::camera::LockOnFraming;
use crate::convert::to_bevy;
use crate::player::PlayerCharacter;
use crate::world::{LockOnDummy, StaticWorld};

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        LogDiagnosticsPlugin::default(),
    ));

    app.add_systems(PostUpdate, (draw_ground_probe, draw_facing, draw_lock_on));
}

fn draw_ground_probe(mut gizmos: Gizmos, players: Query<&PlayerCharacter>) {
    for player in &players {
        let center = player.controller.ground_probe().probe_center(player.body.position);
        let color = if player.controller.ground_state().is_grounded {
            Color::srgb(0.2, 1.0, 0.2)
        } else {
            Color::srgb(1.0, 0.3, 0.2)
        };
        gizmos.sphere(Isometry3d::from_translation(to_bevy(&center)), 0.1, color);
    }
}

fn draw_facing(mut gizmos: Gizmos, players: Query<&GlobalTransform, With<PlayerCharacter>>) {
    for gt in &players {
        let (_, rot, start) = gt.to_scale_rotation_translation();

        let mut dir = rot * Vec3::Z;
        if !dir.is_finite() || dir.length_squared() <= 1.0e-8 {
            dir = Vec3::Z;
        }

        let end = start + dir.normalize() * 1.5;
        gizmos.arrow(start, end, Color::srgb(1.0, 1.0, 0.2));
    }
}

fn draw_lock_on(
    mut gizmos: Gizmos,
    world: Res<StaticWorld>,
    framing: Res<LockOnFraming>,
    players: Query<&PlayerCharacter>,
    dummies: Query<(&LockOnDummy, &GlobalTransform)>,
) {
    let flat = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
    for player in &players {
        let Some(target) = player.controller.lock_on_state().target else {
            continue;
        };
        let Some(position) = world.0.position_of(target) else {
            continue;
        };
        gizmos.line(
            to_bevy(&player.body.position),
            to_bevy(&position),
            Color::srgb(1.0, 0.4, 0.1),
        );
    }

    // Framing members, drawn at their radius.
    for member in framing.members() {
        for (dummy, gt) in &dummies {
            if dummy.0 == member.target {
                let feet = gt.translation().with_y(0.02);
                gizmos.circle(
                    Isometry3d::new(feet, flat),
                    member.radius,
                    Color::srgb(1.0, 0.4, 0.1),
                );
            }
        }
    }
}
