pub mod anim;
pub mod blend;
pub mod camera;
pub mod collider_tag;
pub mod constants;
pub mod controller;
pub mod equip;
pub mod error;
pub mod gravity;
pub mod ground;
pub mod input;
pub mod layers;
pub mod lock_on;
pub mod movement;
pub mod query;
pub mod rapier_world;
pub mod settings;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use anim::{AnimHandle, AnimParam, AnimParams, AnimationSink, Animator};
pub use camera::{CameraRigController, CameraState, orbit_rotation};
pub use collider_tag::{ColliderTag, pack_collider_tag, try_unpack_layer, unpack_entity};
pub use controller::{
    AnimationEvent, Collaborators, ControllerEvent, FrameInput, PlayerController, TickReport,
};
pub use equip::{EquipEvent, EquipState, Transition, WeaponEquipStateMachine};
pub use error::ConfigurationError;
pub use gravity::{GravityIntegrator, GravityStep, GroundState};
pub use ground::{ColliderShape, GroundProbe};
pub use input::InputSample;
pub use layers::{Layer, LayerBit, LayerMask};
pub use lock_on::{LockOnController, LockOnEvent, LockOnState, ReleaseReason};
pub use movement::{
    Facing, LocomotionContext, LocomotionController, LocomotionStep, MotionState, MoveState,
};
pub use query::{CameraGroup, CharacterMover, EntityPositions, PhysicsQuery, ShapeHit, WeaponRig};
pub use rapier_world::{
    ColliderShapeDef, KinematicBody, RapierCharacter, RapierQueryWorld, WorldStaticDef, rapier3d,
};
pub use settings::{
    CameraSettings, ControllerSettings, EquipSettings, GravitySettings, GroundSettings,
    LocomotionSettings, LockOnSettings,
};
pub use types::{CameraView, EntityId, Quat, Vec2, Vec3};
pub use utils::{delta_angle, lerp_angle, smooth_damp, smooth_damp_angle, yaw_from_xz};
