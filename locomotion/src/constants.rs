//! Tuning defaults for every controller component.
//!
//! These feed the `Default` impls in [`crate::settings`]. Hosts that need different tuning
//! should override the settings structs rather than these values.

// --- Locomotion ---

/// Ground speed while walk is held (m/s).
pub const WALK_SPEED_MPS: f32 = 2.0;

/// Default ground speed with movement input and no modifier (m/s).
pub const RUN_SPEED_MPS: f32 = 5.335;

/// Ground speed while sprint is held (m/s).
pub const SPRINT_SPEED_MPS: f32 = 7.888;

/// Time for facing to catch up with its target yaw (seconds).
pub const ROTATION_SMOOTH_TIME_S: f32 = 0.12;

/// Exponential-lerp rate used while speeding up.
pub const ACCELERATION_RATE: f32 = 10.0;

/// Exponential-lerp rate used while slowing down.
pub const DECELERATION_RATE: f32 = 5.0;

/// Band around the target speed inside which the speed snaps to target (m/s).
pub const SPEED_DEADZONE_MPS: f32 = 0.1;

/// Target speed multiplier while airborne.
pub const AIRBORNE_SPEED_SCALE: f32 = 0.5;

/// Animation blend values below this snap to exactly zero.
pub const ANIM_BLEND_EPSILON: f32 = 0.01;

/// Blend-tree motion scalars per move state.
pub const WALK_MOTION_SCALAR: f32 = 0.33;
pub const RUN_MOTION_SCALAR: f32 = 0.66;
pub const SPRINT_MOTION_SCALAR: f32 = 1.0;

/// Squared planar length below which a move axis or direction counts as zero.
///
/// Shared by gait selection and heading extraction so the two always agree.
pub const DIRECTION_EPS_SQ: f32 = 1.0e-10;

// --- Gravity / ground ---

/// Vertical acceleration (m/s^2). Negative is down.
pub const GRAVITY_MPS2: f32 = -15.0;

/// Magnitude cap for vertical velocity (m/s).
pub const TERMINAL_VELOCITY_MPS: f32 = 53.0;

/// Vertical velocity held while grounded so the next probe still touches the ground.
pub const GROUNDED_VERTICAL_VELOCITY_MPS: f32 = -2.0;

/// Apex height of a jump (meters).
pub const JUMP_HEIGHT_M: f32 = 1.2;

/// Cooldown after landing before another jump may start (seconds).
pub const JUMP_TIMEOUT_S: f32 = 0.5;

/// Airborne grace period before free fall is reported (seconds).
pub const FALL_TIMEOUT_S: f32 = 0.15;

/// Half thickness (Y) of the flattened box used by box ground probes (meters).
pub const BOX_PROBE_HALF_THICKNESS_M: f32 = 0.1;

// --- Camera ---

/// Highest pitch the camera may reach (degrees, positive looks down).
pub const CAMERA_TOP_CLAMP_DEG: f32 = 70.0;

/// Lowest pitch the camera may reach (degrees).
pub const CAMERA_BOTTOM_CLAMP_DEG: f32 = -20.0;

/// Squared look-axis magnitude below which free-look input is ignored.
pub const LOOK_THRESHOLD_SQ: f32 = 0.01;

pub const CAMERA_YAW_SPEED: f32 = 1.0;
pub const CAMERA_PITCH_SPEED: f32 = 1.0;

/// Height of the camera follow pivot above the character origin (meters).
pub const CAMERA_TARGET_OFFSET_Y_M: f32 = 0.6;

// --- Lock-on ---

/// Distance at which a lock-on target is released (meters).
pub const LOCK_ON_MAX_DISTANCE_M: f32 = 20.0;

/// Radius of the lock-on sphere cast (meters).
pub const LOCK_ON_CAST_RADIUS_M: f32 = 3.0;

/// Angular interpolation rate of the camera toward a locked target.
pub const LOCK_ON_ROTATE_SPEED: f32 = 3.0;

/// Camera-group framing weight and radius for a locked target.
pub const LOCK_ON_MEMBER_WEIGHT: f32 = 0.9;
pub const LOCK_ON_MEMBER_RADIUS_M: f32 = 1.0;

// --- Weapon equip ---

/// Length of an equip or unarm transition (seconds).
pub const EQUIP_DURATION_S: f32 = 0.5;

/// Weapon layer blend time when the character is idle (seconds).
pub const LAYER_BLEND_IDLE_S: f32 = 0.5;

/// Weapon layer blend time when the character is moving (seconds).
pub const LAYER_BLEND_MOVING_S: f32 = 0.1;

/// Animation layer driven by the weapon blend.
pub const WEAPON_ANIM_LAYER: i32 = 1;
