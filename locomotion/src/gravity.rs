use crate::anim::{AnimParam, Animator};
use crate::settings::GravitySettings;

/// Vertical state of a character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundState {
    pub is_grounded: bool,
    /// Meters per second, positive is up.
    pub vertical_velocity: f32,
    /// Airborne grace time left before free fall.
    pub fall_timer: f32,
    /// Cooldown left before a jump may start.
    pub jump_timer: f32,
}

/// What a gravity step decided, for the controller and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GravityStep {
    pub grounded: bool,
    /// Grounded this tick after being airborne the previous one.
    pub landed: bool,
    /// Jump input accepted; the impulse itself arrives with the animation callback.
    pub jump_requested: bool,
    pub free_fall: bool,
}

/// Integrates vertical velocity and runs the jump/fall timers.
#[derive(Clone, Debug)]
pub struct GravityIntegrator {
    settings: GravitySettings,
    state: GroundState,
}

impl GravityIntegrator {
    pub fn new(settings: GravitySettings) -> Self {
        let state = GroundState {
            is_grounded: true,
            vertical_velocity: 0.0,
            fall_timer: settings.fall_timeout,
            jump_timer: 0.0,
        };
        Self { settings, state }
    }

    pub fn state(&self) -> &GroundState {
        &self.state
    }

    /// Advance one tick given this tick's probe result.
    pub fn step(
        &mut self,
        grounded: bool,
        jump_pressed: bool,
        dt: f32,
        anim: &mut Animator<'_>,
    ) -> GravityStep {
        let s = &self.settings;
        let st = &mut self.state;
        let mut out = GravityStep {
            grounded,
            landed: grounded && !st.is_grounded,
            ..GravityStep::default()
        };
        st.is_grounded = grounded;

        if grounded {
            st.fall_timer = s.fall_timeout;

            anim.flag(AnimParam::Jump, false);
            anim.flag(AnimParam::Landing, true);
            anim.flag(AnimParam::FreeFall, false);

            if st.vertical_velocity < 0.0 {
                st.vertical_velocity = s.grounded_velocity;
            }

            if jump_pressed && st.jump_timer <= 0.0 {
                anim.flag(AnimParam::Jump, true);
                out.jump_requested = true;
            }

            if st.jump_timer >= 0.0 {
                st.jump_timer -= dt;
            }
        } else {
            st.jump_timer = s.jump_timeout;

            if st.fall_timer >= 0.0 {
                st.fall_timer -= dt;
            } else {
                out.free_fall = true;
                anim.flag(AnimParam::FreeFall, true);
                anim.flag(AnimParam::Landing, false);
            }
        }

        anim.flag(AnimParam::IsGround, grounded);

        if st.vertical_velocity < s.terminal_velocity {
            st.vertical_velocity += s.gravity * dt;
        }
        st.vertical_velocity = st
            .vertical_velocity
            .clamp(-s.terminal_velocity, s.terminal_velocity);

        out
    }

    /// Launch velocity reaching `jump_height` under `gravity`, capped at terminal velocity.
    pub fn jump_velocity(&self) -> f32 {
        let s = &self.settings;
        (s.jump_height * -2.0 * s.gravity)
            .sqrt()
            .min(s.terminal_velocity)
    }

    /// Set vertical velocity to the jump launch velocity.
    pub fn apply_jump_impulse(&mut self) {
        self.state.vertical_velocity = self.jump_velocity();
    }
}
