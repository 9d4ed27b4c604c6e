use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use leafwing_input_manager::prelude::*;
use locomotion::InputSample;

use crate::convert::to_na2;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    #[actionlike(DualAxis)]
    Move,
    #[actionlike(DualAxis)]
    Look,
    Jump,
    Sprint,
    Walk,
    LockOn,
    Attack,
    Unarm,
    Respawn,
    ToggleCursor,
}

/// This frame's input, mapped for the controller.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct PlayerInput {
    pub sample: InputSample,
    pub respawn: bool,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let input_map = InputMap::<InputAction>::default()
        .with_dual_axis(InputAction::Move, VirtualDPad::wasd())
        .with_dual_axis(InputAction::Look, MouseMove::default())
        .with(InputAction::Jump, KeyCode::Space)
        .with(InputAction::Sprint, KeyCode::ShiftLeft)
        .with(InputAction::Walk, KeyCode::ControlLeft)
        .with(InputAction::LockOn, KeyCode::KeyQ)
        .with(InputAction::LockOn, MouseButton::Middle)
        .with(InputAction::Attack, MouseButton::Left)
        .with(InputAction::Unarm, KeyCode::KeyX)
        .with(InputAction::Respawn, KeyCode::KeyR)
        .with(InputAction::ToggleCursor, KeyCode::Escape);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());

    app.init_resource::<PlayerInput>();
    // Mouse look owns the pointer from the moment the player exists.
    app.add_systems(PostStartup, lock_cursor);
    app.add_systems(Update, (toggle_cursor, sample_input).chain());
}

fn set_cursor_locked(cursor: &mut CursorOptions, locked: bool) {
    if locked {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    } else {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}

fn is_cursor_locked(cursor: &CursorOptions) -> bool {
    cursor.grab_mode == CursorGrabMode::Locked
}

fn lock_cursor(mut cursor: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    if let Ok(mut cursor) = cursor.single_mut() {
        set_cursor_locked(&mut cursor, true);
    }
}

/// Escape releases the pointer; pressing it again takes it back.
fn toggle_cursor(
    actions: Res<ActionState<InputAction>>,
    mut cursor: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    if !actions.just_pressed(&InputAction::ToggleCursor) {
        return;
    }
    if let Ok(mut cursor) = cursor.single_mut() {
        let locked = !is_cursor_locked(&cursor);
        set_cursor_locked(&mut cursor, locked);
        info!("cursor {}", if locked { "locked" } else { "released" });
    }
}

pub(crate) fn sample_input(
    actions: Res<ActionState<InputAction>>,
    cursor: Query<&CursorOptions, With<PrimaryWindow>>,
    mut input: ResMut<PlayerInput>,
) {
    // A free pointer is for the desktop, not the camera.
    let look = if cursor.single().is_ok_and(is_cursor_locked) {
        actions.axis_pair(&InputAction::Look)
    } else {
        Vec2::ZERO
    };
    input.sample = InputSample {
        move_axis: to_na2(actions.clamped_axis_pair(&InputAction::Move)),
        // Mouse up reports positive y; positive pitch looks down.
        look_axis: to_na2(Vec2::new(look.x, -look.y)),
        jump_pressed: actions.pressed(&InputAction::Jump),
        sprint_held: actions.pressed(&InputAction::Sprint),
        walk_held: actions.pressed(&InputAction::Walk),
        lock_on_pressed: actions.just_pressed(&InputAction::LockOn),
        attack_pressed: actions.just_pressed(&InputAction::Attack),
        unarm_pressed: actions.just_pressed(&InputAction::Unarm),
        pointer_look: true,
    };
    input.respawn = actions.just_pressed(&InputAction::Respawn);
}
