/*!
Per-component tuning for a player character.

Every struct defaults to the values in [`crate::constants`]. With the `serde` feature the
structs (de)serialize with `#[serde(default)]`, so a data file only needs the fields it
overrides.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- `ControllerSettings::validate` runs once at spawn; components assume validated input.
*/

use crate::constants::*;
use crate::error::ConfigurationError;
use crate::layers::{Layer, LayerMask};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LocomotionSettings {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub sprint_speed: f32,
    pub rotation_smooth_time: f32,
    pub acceleration_rate: f32,
    pub deceleration_rate: f32,
    /// Band around the target speed inside which speed snaps to target.
    pub speed_deadzone: f32,
    pub airborne_speed_scale: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED_MPS,
            run_speed: RUN_SPEED_MPS,
            sprint_speed: SPRINT_SPEED_MPS,
            rotation_smooth_time: ROTATION_SMOOTH_TIME_S,
            acceleration_rate: ACCELERATION_RATE,
            deceleration_rate: DECELERATION_RATE,
            speed_deadzone: SPEED_DEADZONE_MPS,
            airborne_speed_scale: AIRBORNE_SPEED_SCALE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GravitySettings {
    /// Vertical acceleration, negative is down.
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub grounded_velocity: f32,
    pub jump_height: f32,
    pub jump_timeout: f32,
    pub fall_timeout: f32,
}

impl Default for GravitySettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_MPS2,
            terminal_velocity: TERMINAL_VELOCITY_MPS,
            grounded_velocity: GROUNDED_VERTICAL_VELOCITY_MPS,
            jump_height: JUMP_HEIGHT_M,
            jump_timeout: JUMP_TIMEOUT_S,
            fall_timeout: FALL_TIMEOUT_S,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GroundSettings {
    /// Layers the ground probe treats as walkable.
    pub ground_layers: LayerMask,
}

impl Default for GroundSettings {
    fn default() -> Self {
        Self {
            ground_layers: LayerMask::from_layers(&[Layer::Default, Layer::Ground, Layer::Prop]),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CameraSettings {
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    /// Highest pitch (looking down).
    pub top_clamp: f32,
    /// Lowest pitch (looking up).
    pub bottom_clamp: f32,
    /// Constant pitch added to the final orientation, e.g. to fine tune a locked camera.
    pub angle_override: f32,
    /// Ignores free-look input when set.
    pub lock_camera_position: bool,
    /// Height of the follow pivot above the character origin.
    pub target_offset_y: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            yaw_speed: CAMERA_YAW_SPEED,
            pitch_speed: CAMERA_PITCH_SPEED,
            top_clamp: CAMERA_TOP_CLAMP_DEG,
            bottom_clamp: CAMERA_BOTTOM_CLAMP_DEG,
            angle_override: 0.0,
            lock_camera_position: false,
            target_offset_y: CAMERA_TARGET_OFFSET_Y_M,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LockOnSettings {
    pub max_distance: f32,
    pub cast_radius: f32,
    pub rotate_speed: f32,
    /// Layers a lock-on cast may hit.
    pub layers: LayerMask,
    pub member_weight: f32,
    pub member_radius: f32,
}

impl Default for LockOnSettings {
    fn default() -> Self {
        Self {
            max_distance: LOCK_ON_MAX_DISTANCE_M,
            cast_radius: LOCK_ON_CAST_RADIUS_M,
            rotate_speed: LOCK_ON_ROTATE_SPEED,
            layers: LayerMask::from_layers(&[Layer::LockOnTarget]),
            member_weight: LOCK_ON_MEMBER_WEIGHT,
            member_radius: LOCK_ON_MEMBER_RADIUS_M,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EquipSettings {
    pub equip_duration: f32,
    pub layer_blend_idle: f32,
    pub layer_blend_moving: f32,
    pub weapon_layer: i32,
}

impl Default for EquipSettings {
    fn default() -> Self {
        Self {
            equip_duration: EQUIP_DURATION_S,
            layer_blend_idle: LAYER_BLEND_IDLE_S,
            layer_blend_moving: LAYER_BLEND_MOVING_S,
            weapon_layer: WEAPON_ANIM_LAYER,
        }
    }
}

/// All tuning for one character.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ControllerSettings {
    pub locomotion: LocomotionSettings,
    pub gravity: GravitySettings,
    pub ground: GroundSettings,
    pub camera: CameraSettings,
    pub lock_on: LockOnSettings,
    pub equip: EquipSettings,
}

fn finite(name: &'static str, value: f32) -> Result<f32, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::InvalidSetting { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<f32, ConfigurationError> {
    if finite(name, value)? > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::InvalidSetting { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<f32, ConfigurationError> {
    if finite(name, value)? >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::InvalidSetting { name, value })
    }
}

impl ControllerSettings {
    /// Rejects settings the controllers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let l = &self.locomotion;
        positive("locomotion.walk_speed", l.walk_speed)?;
        positive("locomotion.run_speed", l.run_speed)?;
        positive("locomotion.sprint_speed", l.sprint_speed)?;
        positive("locomotion.rotation_smooth_time", l.rotation_smooth_time)?;
        positive("locomotion.acceleration_rate", l.acceleration_rate)?;
        positive("locomotion.deceleration_rate", l.deceleration_rate)?;
        non_negative("locomotion.speed_deadzone", l.speed_deadzone)?;
        non_negative("locomotion.airborne_speed_scale", l.airborne_speed_scale)?;

        let g = &self.gravity;
        if finite("gravity.gravity", g.gravity)? >= 0.0 {
            return Err(ConfigurationError::InvalidSetting {
                name: "gravity.gravity",
                value: g.gravity,
            });
        }
        positive("gravity.terminal_velocity", g.terminal_velocity)?;
        finite("gravity.grounded_velocity", g.grounded_velocity)?;
        non_negative("gravity.jump_height", g.jump_height)?;
        non_negative("gravity.jump_timeout", g.jump_timeout)?;
        non_negative("gravity.fall_timeout", g.fall_timeout)?;

        let c = &self.camera;
        finite("camera.yaw_speed", c.yaw_speed)?;
        finite("camera.pitch_speed", c.pitch_speed)?;
        finite("camera.angle_override", c.angle_override)?;
        finite("camera.target_offset_y", c.target_offset_y)?;
        if finite("camera.bottom_clamp", c.bottom_clamp)? > finite("camera.top_clamp", c.top_clamp)? {
            return Err(ConfigurationError::InvalidSetting {
                name: "camera.bottom_clamp",
                value: c.bottom_clamp,
            });
        }

        let o = &self.lock_on;
        positive("lock_on.max_distance", o.max_distance)?;
        positive("lock_on.cast_radius", o.cast_radius)?;
        positive("lock_on.rotate_speed", o.rotate_speed)?;
        non_negative("lock_on.member_weight", o.member_weight)?;
        non_negative("lock_on.member_radius", o.member_radius)?;

        let e = &self.equip;
        positive("equip.equip_duration", e.equip_duration)?;
        positive("equip.layer_blend_idle", e.layer_blend_idle)?;
        positive("equip.layer_blend_moving", e.layer_blend_moving)?;

        Ok(())
    }
}
