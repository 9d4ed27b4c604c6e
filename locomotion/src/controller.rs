//! Per-character façade tying the components into one update loop.
//!
//! A host owns one [`PlayerController`] per character and calls, every frame:
//! 1. [`PlayerController::update`] after input is sampled,
//! 2. [`PlayerController::late_update`] once the mover's transform is final,
//! 3. [`PlayerController::handle_animation_event`] whenever the animation system reaches an
//!    authored keyframe (may happen between the two phases).
//!
//! Collaborators are lent per call, so the controller never holds references into the host.

use log::error;

use crate::anim::{AnimParam, AnimParams, Animator, AnimationSink};
use crate::camera::{CameraRigController, CameraState};
use crate::equip::{EquipEvent, EquipState, WeaponEquipStateMachine};
use crate::error::ConfigurationError;
use crate::gravity::{GravityIntegrator, GroundState};
use crate::ground::{ColliderShape, GroundProbe};
use crate::input::InputSample;
use crate::lock_on::{LockOnController, LockOnEvent, LockOnState, ReleaseReason};
use crate::movement::{Facing, LocomotionContext, LocomotionController, MotionState, MoveState};
use crate::query::{CameraGroup, CharacterMover, EntityPositions, PhysicsQuery, WeaponRig};
use crate::settings::ControllerSettings;
use crate::types::{CameraView, EntityId, Quat, Vec3};
use crate::utils::yaw_rotation;

/// Host capabilities lent to the controller for one call.
pub struct Collaborators<'a> {
    pub physics: &'a dyn PhysicsQuery,
    pub entities: &'a dyn EntityPositions,
    pub mover: &'a mut dyn CharacterMover,
    pub animator: &'a mut dyn AnimationSink,
    pub camera_group: &'a mut dyn CameraGroup,
    pub weapon: &'a mut dyn WeaponRig,
}

/// Everything sampled for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub sample: InputSample,
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Rendering camera as of the start of the frame.
    pub camera: CameraView,
}

/// Authored animation keyframes that call back into the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    Landing,
    JumpImpulse,
    EquipPoseReached,
    UnarmPoseReached,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControllerEvent {
    Landed,
    JumpRequested,
    Jumped { vertical_velocity: f32 },
    LockOn(LockOnEvent),
    Equip(EquipEvent),
}

/// Summary of one update phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub grounded: bool,
    pub move_state: MoveState,
    pub facing: Facing,
    pub displacement: Vec3,
    pub position: Vec3,
    pub orientation: Quat,
    pub lock_on_target: Option<EntityId>,
    pub armed: bool,
}

pub struct PlayerController {
    probe: GroundProbe,
    gravity: GravityIntegrator,
    locomotion: LocomotionController,
    lock_on: LockOnController,
    camera: CameraRigController,
    equip: WeaponEquipStateMachine,
    params: AnimParams,
    events: Vec<ControllerEvent>,
}

impl PlayerController {
    /// Build a character at the mover's current position, facing +Z.
    ///
    /// Validates `settings`, derives the ground probe from `collider`, resolves the animation
    /// parameter handles and presents the sheathed weapon.
    pub fn spawn(
        settings: ControllerSettings,
        collider: Option<&ColliderShape>,
        c: &mut Collaborators<'_>,
    ) -> Result<Self, ConfigurationError> {
        if let Err(err) = settings.validate() {
            error!("rejecting controller settings: {err}");
            return Err(err);
        }
        let probe = GroundProbe::from_collider(collider, settings.ground.ground_layers)?;

        let ControllerSettings {
            locomotion,
            gravity,
            camera,
            lock_on,
            equip,
            ..
        } = settings;

        let params = AnimParams::resolve(&mut *c.animator);
        let position = c.mover.position();
        let controller = Self {
            probe,
            gravity: GravityIntegrator::new(gravity),
            locomotion: LocomotionController::new(locomotion, position, 0.0),
            camera: CameraRigController::new(camera, lock_on.rotate_speed, 0.0),
            lock_on: LockOnController::new(lock_on),
            equip: WeaponEquipStateMachine::new(equip),
            params,
            events: Vec::with_capacity(8),
        };

        let mut anim = Animator::new(&mut *c.animator, &controller.params);
        controller.equip.present_initial(&mut *c.weapon, &mut anim);
        anim.flag(AnimParam::LockOn, false);

        Ok(controller)
    }

    /// Update phase: requests, ground and gravity, locomotion, lock-on upkeep, equip timers.
    pub fn update(&mut self, frame: &FrameInput, c: &mut Collaborators<'_>) -> TickReport {
        self.events.clear();
        let input = &frame.sample;
        let dt = frame.dt;
        let mut anim = Animator::new(&mut *c.animator, &self.params);

        // 0) Edge-triggered requests.
        if input.lock_on_pressed {
            if let Some(ev) =
                self.lock_on
                    .toggle(&frame.camera, c.physics, &mut *c.camera_group, &mut anim)
            {
                self.events.push(ControllerEvent::LockOn(ev));
            }
        }
        if input.attack_pressed && self.equip.request_equip(&mut anim) {
            self.events.push(ControllerEvent::Equip(EquipEvent::EquipStarted));
        }
        if input.unarm_pressed && self.equip.request_unarm(&mut anim) {
            self.events.push(ControllerEvent::Equip(EquipEvent::UnarmStarted));
        }

        // 1) Ground probe and vertical integration.
        let grounded = self.probe.is_grounded(c.physics, c.mover.position());
        let g = self.gravity.step(grounded, input.jump_pressed, dt, &mut anim);
        if g.landed {
            self.events.push(ControllerEvent::Landed);
        }
        if g.jump_requested {
            self.events.push(ControllerEvent::JumpRequested);
        }

        // 2) Locomotion. Face the camera only while locked on with the weapon in hand.
        let ctx = LocomotionContext {
            grounded,
            vertical_velocity: self.gravity.state().vertical_velocity,
            camera_yaw: frame.camera.yaw_deg,
            strafe: self.lock_on.state().is_locked() && self.equip.is_armed(),
            dt,
        };
        let step = self.locomotion.step(input, ctx, &mut *c.mover, &mut anim);
        let position = self.locomotion.state().position;

        // 3) Lock-on upkeep. Range runs last so the target is in range at tick end.
        if let Some(ev) = self
            .lock_on
            .reacquire(&frame.camera, c.physics, &mut *c.camera_group)
        {
            self.events.push(ControllerEvent::LockOn(ev));
        }
        if let Some(ev) =
            self.lock_on
                .enforce_range(position, c.entities, &mut *c.camera_group, &mut anim)
        {
            self.events.push(ControllerEvent::LockOn(ev));
        }

        // 4) Equip timers and layer blend.
        if let Some(ev) = self.equip.tick(dt, &mut anim) {
            self.events.push(ControllerEvent::Equip(ev));
        }

        TickReport {
            grounded,
            move_state: step.move_state,
            facing: step.facing,
            displacement: step.displacement,
            position,
            orientation: self.orientation(),
            lock_on_target: self.lock_on.state().target,
            armed: self.equip.is_armed(),
        }
    }

    /// Camera phase: returns the follow-target rotation for this frame.
    pub fn late_update(&mut self, frame: &FrameInput, c: &Collaborators<'_>) -> Quat {
        let pivot = self.camera.pivot(c.mover.position());
        let target = self
            .lock_on
            .state()
            .target
            .and_then(|t| c.entities.position_of(t));
        self.camera.late_update(&frame.sample, pivot, target, frame.dt)
    }

    pub fn handle_animation_event(&mut self, event: AnimationEvent, c: &mut Collaborators<'_>) {
        let mut anim = Animator::new(&mut *c.animator, &self.params);
        let idle = self.locomotion.state().move_state == MoveState::Idle;
        match event {
            AnimationEvent::Landing => anim.flag(AnimParam::Landing, true),
            AnimationEvent::JumpImpulse => {
                self.gravity.apply_jump_impulse();
                self.events.push(ControllerEvent::Jumped {
                    vertical_velocity: self.gravity.state().vertical_velocity,
                });
            }
            AnimationEvent::EquipPoseReached => {
                if let Some(ev) = self.equip.on_equip_pose(idle, &mut *c.weapon, &mut anim) {
                    self.events.push(ControllerEvent::Equip(ev));
                }
            }
            AnimationEvent::UnarmPoseReached => {
                if let Some(ev) = self.equip.on_unarm_pose(idle, &mut *c.weapon, &mut anim) {
                    self.events.push(ControllerEvent::Equip(ev));
                }
            }
        }
    }

    /// Release anything the controller registered with the host.
    pub fn teardown(&mut self, c: &mut Collaborators<'_>) {
        let mut anim = Animator::new(&mut *c.animator, &self.params);
        if let Some(ev) =
            self.lock_on
                .release(ReleaseReason::Teardown, &mut *c.camera_group, &mut anim)
        {
            self.events.push(ControllerEvent::LockOn(ev));
        }
    }

    /// Events raised since the start of the last update, including animation callbacks.
    pub fn events(&self) -> &[ControllerEvent] {
        &self.events
    }

    pub fn ground_state(&self) -> &GroundState {
        self.gravity.state()
    }

    pub fn motion_state(&self) -> &MotionState {
        self.locomotion.state()
    }

    pub fn lock_on_state(&self) -> &LockOnState {
        self.lock_on.state()
    }

    pub fn equip_state(&self) -> &EquipState {
        self.equip.state()
    }

    pub fn camera_state(&self) -> &CameraState {
        self.camera.state()
    }

    pub fn ground_probe(&self) -> &GroundProbe {
        &self.probe
    }

    pub fn orientation(&self) -> Quat {
        yaw_rotation(self.locomotion.state().orientation_yaw)
    }
}
