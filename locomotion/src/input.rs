use crate::constants::DIRECTION_EPS_SQ;
use crate::types::Vec2;

/// One tick of already-mapped player input.
///
/// Axes are normalized by the host. The `*_pressed` fields are edges (true on the tick the
/// button went down); the `*_held` fields are levels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSample {
    /// Planar movement, x = strafe right, y = forward, in [-1, 1]².
    pub move_axis: Vec2,
    /// Camera look, x = yaw, y = pitch.
    pub look_axis: Vec2,
    pub jump_pressed: bool,
    pub sprint_held: bool,
    pub walk_held: bool,
    pub lock_on_pressed: bool,
    pub attack_pressed: bool,
    pub unarm_pressed: bool,
    /// Look axis is a per-frame pointer delta, already independent of frame time.
    pub pointer_look: bool,
}

impl InputSample {
    pub fn has_move(&self) -> bool {
        self.move_axis.norm_squared() >= DIRECTION_EPS_SQ
    }
}
