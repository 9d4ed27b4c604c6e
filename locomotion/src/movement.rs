use crate::anim::{AnimParam, Animator};
use crate::constants::{
    ANIM_BLEND_EPSILON, RUN_MOTION_SCALAR, SPRINT_MOTION_SCALAR, WALK_MOTION_SCALAR,
};
use crate::input::InputSample;
use crate::query::CharacterMover;
use crate::settings::LocomotionSettings;
use crate::types::Vec3;
use crate::utils::{forward_from_yaw, lerp, round_millis, smooth_damp_angle, yaw_from_xz};

/// Gait chosen from this tick's input alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveState {
    #[default]
    Idle,
    Walk,
    Run,
    Sprint,
}

impl MoveState {
    /// Idle without move input; otherwise walk beats sprint, and run is the default.
    pub fn classify(input: &InputSample) -> Self {
        if !input.has_move() {
            MoveState::Idle
        } else if input.walk_held {
            MoveState::Walk
        } else if input.sprint_held {
            MoveState::Sprint
        } else {
            MoveState::Run
        }
    }

    /// Configured ground speed for this gait. Idle reports the run speed; the caller zeroes
    /// the target when there is no move input.
    pub fn speed(self, settings: &LocomotionSettings) -> f32 {
        match self {
            MoveState::Walk => settings.walk_speed,
            MoveState::Sprint => settings.sprint_speed,
            MoveState::Idle | MoveState::Run => settings.run_speed,
        }
    }

    /// Blend-tree scalar driving the `Speed` animation parameter.
    pub fn motion_scalar(self) -> f32 {
        match self {
            MoveState::Idle => 0.0,
            MoveState::Walk => WALK_MOTION_SCALAR,
            MoveState::Run => RUN_MOTION_SCALAR,
            MoveState::Sprint => SPRINT_MOTION_SCALAR,
        }
    }
}

/// Horizontal motion of a character. Yaw values are degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionState {
    pub position: Vec3,
    /// Facing, normalized to [0, 360).
    pub orientation_yaw: f32,
    pub current_speed: f32,
    pub anim_blend_speed: f32,
    pub anim_blend_input_x: f32,
    pub anim_blend_input_y: f32,
    /// Heading of the last move input in world space; the direction of travel.
    pub target_rotation: f32,
    /// Angular rate carried by the facing smoother.
    pub rotation_velocity: f32,
    pub move_state: MoveState,
}

impl MotionState {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        let yaw = yaw.rem_euclid(360.0);
        Self {
            position,
            orientation_yaw: yaw,
            current_speed: 0.0,
            anim_blend_speed: 0.0,
            anim_blend_input_x: 0.0,
            anim_blend_input_y: 0.0,
            target_rotation: yaw,
            rotation_velocity: 0.0,
            move_state: MoveState::Idle,
        }
    }
}

/// Which heading the character turned toward this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    /// No move input; facing unchanged.
    Hold,
    MoveDirection,
    Camera,
}

/// Per-tick context the controller gathers from the other components.
#[derive(Clone, Copy, Debug)]
pub struct LocomotionContext {
    pub grounded: bool,
    pub vertical_velocity: f32,
    /// Yaw of the rendering camera (degrees).
    pub camera_yaw: f32,
    /// Locked on with the weapon drawn: face the camera instead of the move direction.
    pub strafe: bool,
    pub dt: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionStep {
    pub move_state: MoveState,
    pub displacement: Vec3,
    pub facing: Facing,
}

#[derive(Clone, Debug)]
pub struct LocomotionController {
    settings: LocomotionSettings,
    state: MotionState,
}

impl LocomotionController {
    pub fn new(settings: LocomotionSettings, position: Vec3, yaw: f32) -> Self {
        Self {
            settings,
            state: MotionState::new(position, yaw),
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Run one tick of locomotion and push the displacement through `mover`.
    pub fn step(
        &mut self,
        input: &InputSample,
        ctx: LocomotionContext,
        mover: &mut dyn CharacterMover,
        anim: &mut Animator<'_>,
    ) -> LocomotionStep {
        let s = &self.settings;
        let dt = ctx.dt;
        let move_state = MoveState::classify(input);
        self.state.move_state = move_state;

        // 0) Target speed for this gait, reduced in the air, zero without input.
        let mut target_speed = move_state.speed(s);
        if !ctx.grounded {
            target_speed *= s.airborne_speed_scale;
        }
        if !input.has_move() {
            target_speed = 0.0;
        }

        // 1) Smooth from the collision-resolved speed the mover reports.
        let velocity = mover.velocity();
        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z).norm();
        self.state.current_speed = if horizontal < target_speed - s.speed_deadzone {
            round_millis(lerp(horizontal, target_speed, dt * s.acceleration_rate))
        } else if horizontal > target_speed + s.speed_deadzone {
            round_millis(lerp(horizontal, target_speed, dt * s.deceleration_rate))
        } else {
            target_speed
        };

        // 2) Travel along the last committed heading, plus vertical velocity.
        let direction = forward_from_yaw(self.state.target_rotation);
        let displacement = (direction * self.state.current_speed
            + Vec3::new(0.0, ctx.vertical_velocity, 0.0))
            * dt;
        mover.move_by(displacement, dt);
        self.state.position = mover.position();

        // 3) Animation blend parameters.
        self.update_anim_blend(input, move_state, dt, anim);

        // 4) Facing. Updates the heading used by the next tick's displacement.
        let facing = self.update_rotation(input, move_state, ctx);

        LocomotionStep {
            move_state,
            displacement,
            facing,
        }
    }

    fn update_anim_blend(
        &mut self,
        input: &InputSample,
        move_state: MoveState,
        dt: f32,
        anim: &mut Animator<'_>,
    ) {
        let s = &self.settings;
        let st = &mut self.state;
        let target_motion = move_state.motion_scalar();

        let rate = if st.anim_blend_speed <= target_motion {
            s.acceleration_rate
        } else {
            s.deceleration_rate
        };
        st.anim_blend_speed = lerp(st.anim_blend_speed, target_motion, dt * rate);
        if st.anim_blend_speed < ANIM_BLEND_EPSILON {
            st.anim_blend_speed = 0.0;
        }

        let step_axis = |current: f32, axis: f32| {
            let v = lerp(current, axis.round_ties_even(), dt * s.acceleration_rate);
            if v.abs() < ANIM_BLEND_EPSILON { 0.0 } else { v }
        };
        st.anim_blend_input_x = step_axis(st.anim_blend_input_x, input.move_axis.x);
        st.anim_blend_input_y = step_axis(st.anim_blend_input_y, input.move_axis.y);

        anim.float(AnimParam::Speed, st.anim_blend_speed);
        anim.float(AnimParam::InputX, st.anim_blend_input_x);
        anim.float(AnimParam::InputY, st.anim_blend_input_y);
    }

    fn update_rotation(
        &mut self,
        input: &InputSample,
        move_state: MoveState,
        ctx: LocomotionContext,
    ) -> Facing {
        if !input.has_move() {
            return Facing::Hold;
        }
        let Some(input_yaw) = yaw_from_xz(input.move_axis.x, input.move_axis.y) else {
            return Facing::Hold;
        };

        let st = &mut self.state;
        st.target_rotation = (input_yaw + ctx.camera_yaw).rem_euclid(360.0);

        let (facing, desired) = if ctx.strafe && move_state != MoveState::Sprint {
            (Facing::Camera, ctx.camera_yaw)
        } else {
            (Facing::MoveDirection, st.target_rotation)
        };

        let yaw = smooth_damp_angle(
            st.orientation_yaw,
            desired,
            &mut st.rotation_velocity,
            self.settings.rotation_smooth_time,
            ctx.dt,
        );
        st.orientation_yaw = yaw.rem_euclid(360.0);
        facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::AnimParams;
    use crate::test_support::{KinematicMover, RecordingAnimator};
    use crate::types::Vec2;
    use crate::utils::delta_angle;

    const DT: f32 = 1.0 / 60.0;

    fn ctx(strafe: bool, camera_yaw: f32) -> LocomotionContext {
        LocomotionContext {
            grounded: true,
            vertical_velocity: 0.0,
            camera_yaw,
            strafe,
            dt: DT,
        }
    }

    fn forward_input() -> InputSample {
        InputSample {
            move_axis: Vec2::new(0.0, 1.0),
            ..InputSample::default()
        }
    }

    struct Rig {
        loco: LocomotionController,
        mover: KinematicMover,
        sink: RecordingAnimator,
        params: AnimParams,
    }

    impl Rig {
        fn new(yaw: f32) -> Self {
            let mut sink = RecordingAnimator::default();
            let params = AnimParams::resolve(&mut sink);
            Self {
                loco: LocomotionController::new(LocomotionSettings::default(), Vec3::zeros(), yaw),
                mover: KinematicMover::default(),
                sink,
                params,
            }
        }

        fn tick(&mut self, input: &InputSample, ctx: LocomotionContext) -> LocomotionStep {
            let mut anim = Animator::new(&mut self.sink, &self.params);
            self.loco.step(input, ctx, &mut self.mover, &mut anim)
        }
    }

    #[test]
    fn classify_prefers_walk_over_sprint() {
        let mut input = forward_input();
        assert_eq!(MoveState::classify(&input), MoveState::Run);
        input.sprint_held = true;
        assert_eq!(MoveState::classify(&input), MoveState::Sprint);
        input.walk_held = true;
        assert_eq!(MoveState::classify(&input), MoveState::Walk);
        input.move_axis = Vec2::zeros();
        assert_eq!(MoveState::classify(&input), MoveState::Idle);
    }

    #[test]
    fn run_speed_converges_within_a_second() {
        let mut rig = Rig::new(0.0);
        let input = forward_input();
        for _ in 0..60 {
            rig.tick(&input, ctx(false, 0.0));
        }
        let st = rig.loco.state();
        assert!((st.current_speed - 5.335).abs() <= 0.1);
        assert!((st.anim_blend_speed - 0.66).abs() < 0.01);
        assert_eq!(rig.sink.float("Speed"), Some(st.anim_blend_speed));
        // Travelled forward along +Z.
        assert!(st.position.z > 2.0);
        assert!(st.position.x.abs() < 1.0e-4);
    }

    fn converge(walk: bool, sprint: bool) -> Rig {
        let mut rig = Rig::new(0.0);
        let input = InputSample {
            walk_held: walk,
            sprint_held: sprint,
            ..forward_input()
        };
        for _ in 0..120 {
            rig.tick(&input, ctx(false, 0.0));
        }
        rig
    }

    fn assert_gait(rig: &Rig, state: MoveState, speed: f32, blend: f32) {
        let st = rig.loco.state();
        assert_eq!(st.move_state, state);
        assert_eq!(st.current_speed, speed);
        assert!((rig.mover.velocity().norm() - speed).abs() < 1.0e-3);
        assert!((st.anim_blend_speed - blend).abs() < 1.0e-3);
        assert_eq!(rig.sink.float("Speed"), Some(st.anim_blend_speed));
    }

    #[test]
    fn walk_converges_to_walk_speed() {
        let rig = converge(true, false);
        assert_gait(&rig, MoveState::Walk, 2.0, 0.33);
    }

    #[test]
    fn sprint_converges_to_sprint_speed() {
        let rig = converge(false, true);
        assert_gait(&rig, MoveState::Sprint, 7.888, 1.0);
    }

    #[test]
    fn walk_and_sprint_together_walks() {
        let rig = converge(true, true);
        assert_gait(&rig, MoveState::Walk, 2.0, 0.33);
    }

    #[test]
    fn speed_decays_to_zero_without_input() {
        let mut rig = Rig::new(0.0);
        let input = forward_input();
        for _ in 0..60 {
            rig.tick(&input, ctx(false, 0.0));
        }

        let idle = InputSample::default();
        for _ in 0..180 {
            let step = rig.tick(&idle, ctx(false, 0.0));
            assert_eq!(step.facing, Facing::Hold);
        }
        let st = rig.loco.state();
        assert!(st.current_speed.abs() < 0.01);
        assert_eq!(st.anim_blend_speed, 0.0);
        assert_eq!(st.anim_blend_input_y, 0.0);
    }

    #[test]
    fn airborne_halves_target_speed() {
        let mut rig = Rig::new(0.0);
        let input = forward_input();
        let mut c = ctx(false, 0.0);
        c.grounded = false;
        for _ in 0..120 {
            rig.tick(&input, c);
        }
        assert!((rig.loco.state().current_speed - 5.335 * 0.5).abs() <= 0.1);
    }

    #[test]
    fn facing_follows_camera_relative_input() {
        let mut rig = Rig::new(0.0);
        // Camera looking along +X; forward input should head along +X.
        let input = forward_input();
        for _ in 0..120 {
            rig.tick(&input, ctx(false, 90.0));
        }
        let st = rig.loco.state();
        assert!((st.target_rotation - 90.0).abs() < 1.0e-3);
        assert!(delta_angle(st.orientation_yaw, 90.0).abs() < 0.5);
        assert!(st.position.x > 1.0);
    }

    #[test]
    fn strafing_faces_camera_unless_sprinting() {
        let mut rig = Rig::new(0.0);
        let strafe_right = InputSample {
            move_axis: Vec2::new(1.0, 0.0),
            ..InputSample::default()
        };
        let mut last = Facing::Hold;
        for _ in 0..120 {
            last = rig.tick(&strafe_right, ctx(true, 30.0)).facing;
        }
        assert_eq!(last, Facing::Camera);
        let st = *rig.loco.state();
        assert!(delta_angle(st.orientation_yaw, 30.0).abs() < 0.5);
        // Still travelling to the camera's right.
        assert!((st.target_rotation - 120.0).abs() < 1.0e-3);

        let sprint_right = InputSample {
            sprint_held: true,
            ..strafe_right
        };
        for _ in 0..120 {
            last = rig.tick(&sprint_right, ctx(true, 30.0)).facing;
        }
        assert_eq!(last, Facing::MoveDirection);
        assert!(delta_angle(rig.loco.state().orientation_yaw, 120.0).abs() < 0.5);
    }

    #[test]
    fn faint_input_still_turns_the_character() {
        let mut rig = Rig::new(0.0);
        let faint = InputSample {
            move_axis: Vec2::new(1.0e-4, 0.0),
            ..InputSample::default()
        };
        let step = rig.tick(&faint, ctx(false, 0.0));
        assert_eq!(step.move_state, MoveState::Run);
        assert_eq!(step.facing, Facing::MoveDirection);
        assert!((rig.loco.state().target_rotation - 90.0).abs() < 1.0e-3);
    }

    #[test]
    fn input_blend_targets_rounded_axes() {
        let mut rig = Rig::new(0.0);
        let input = InputSample {
            move_axis: Vec2::new(0.4, 0.6),
            ..InputSample::default()
        };
        for _ in 0..120 {
            rig.tick(&input, ctx(false, 0.0));
        }
        let st = rig.loco.state();
        // 0.4 rounds to 0, 0.6 rounds to 1.
        assert_eq!(st.anim_blend_input_x, 0.0);
        assert!((st.anim_blend_input_y - 1.0).abs() < 1.0e-3);
    }

    #[test]
    fn vertical_velocity_is_part_of_the_displacement() {
        let mut rig = Rig::new(0.0);
        let mut c = ctx(false, 0.0);
        c.vertical_velocity = -6.0;
        let step = rig.tick(&InputSample::default(), c);
        assert!((step.displacement.y - (-6.0 * DT)).abs() < 1.0e-6);
    }
}
