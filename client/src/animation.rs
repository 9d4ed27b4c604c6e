//! Stand-in for an animation system.
//!
//! [`AnimatorState`] records the parameters the controller writes. [`AnimationTimeline`]
//! watches those parameters and, after fixed delays, produces the keyframe callbacks a real
//! animation clip would fire (jump take-off, weapon hand-off, landing).

use std::collections::HashMap;

use bevy::prelude::*;
use locomotion::{AnimHandle, AnimParam, AnimationEvent, AnimationSink};

/// Seconds from the jump flag rising to the take-off frame.
const JUMP_IMPULSE_DELAY_S: f32 = 0.1;
/// Seconds from the equip/unarm trigger to the hand-off frame.
const WEAPON_POSE_DELAY_S: f32 = 0.25;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<AnimatorState>();
}

#[derive(Component, Reflect, Debug, Default)]
#[reflect(Component)]
pub struct AnimatorState {
    #[reflect(ignore)]
    names: HashMap<AnimHandle, String>,
    floats: HashMap<String, f32>,
    bools: HashMap<String, bool>,
    /// Triggers set since the timeline last looked.
    #[reflect(ignore)]
    fired: Vec<AnimHandle>,
    layer_weights: HashMap<i32, f32>,
}

impl AnimatorState {
    fn name(&self, handle: AnimHandle) -> &str {
        self.names.get(&handle).map(String::as_str).unwrap_or("?")
    }

    pub fn flag(&self, param: AnimParam) -> bool {
        self.bools.get(param.name()).copied().unwrap_or(false)
    }

    fn take_fired(&mut self) -> Vec<String> {
        let fired = std::mem::take(&mut self.fired);
        fired.into_iter().map(|h| self.name(h).to_string()).collect()
    }
}

impl AnimationSink for AnimatorState {
    fn resolve(&mut self, name: &str) -> AnimHandle {
        let handle = AnimHandle::from_name(name);
        self.names.insert(handle, name.to_string());
        handle
    }

    fn set_float(&mut self, param: AnimHandle, value: f32) {
        let name = self.name(param).to_string();
        self.floats.insert(name, value);
    }

    fn set_bool(&mut self, param: AnimHandle, value: bool) {
        let name = self.name(param).to_string();
        self.bools.insert(name, value);
    }

    fn set_trigger(&mut self, param: AnimHandle) {
        self.fired.push(param);
    }

    fn set_layer_weight(&mut self, layer: i32, weight: f32) {
        self.layer_weights.insert(layer, weight);
    }
}

/// Keyframe callbacks scheduled from parameter changes.
#[derive(Component, Debug, Default)]
pub struct AnimationTimeline {
    pending: Vec<(Timer, AnimationEvent)>,
    was_jumping: bool,
    was_grounded: bool,
}

impl AnimationTimeline {
    fn schedule(&mut self, delay: f32, event: AnimationEvent) {
        self.pending
            .push((Timer::from_seconds(delay, TimerMode::Once), event));
    }

    /// Look at what the controller wrote this frame and schedule the matching callbacks.
    pub fn observe(&mut self, animator: &mut AnimatorState) {
        for name in animator.take_fired() {
            if name == AnimParam::Equip.name() {
                self.schedule(WEAPON_POSE_DELAY_S, AnimationEvent::EquipPoseReached);
            } else if name == AnimParam::Unarm.name() {
                self.schedule(WEAPON_POSE_DELAY_S, AnimationEvent::UnarmPoseReached);
            }
        }

        let jumping = animator.flag(AnimParam::Jump);
        if jumping && !self.was_jumping {
            self.schedule(JUMP_IMPULSE_DELAY_S, AnimationEvent::JumpImpulse);
        }
        self.was_jumping = jumping;

        let grounded = animator.flag(AnimParam::IsGround);
        if grounded && !self.was_grounded {
            self.schedule(0.0, AnimationEvent::Landing);
        }
        self.was_grounded = grounded;
    }

    /// Advance the timers and return the callbacks that are due, oldest first.
    pub fn advance(&mut self, dt: f32) -> Vec<AnimationEvent> {
        let delta = std::time::Duration::from_secs_f32(dt.max(0.0));
        let mut due = Vec::new();
        self.pending.retain_mut(|(timer, event)| {
            timer.tick(delta);
            if timer.is_finished() {
                due.push(*event);
                false
            } else {
                true
            }
        });
        due
    }
}
