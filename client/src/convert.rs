//! Conversions between Bevy's glam types and the controller's nalgebra types.
//!
//! Both sides use the same axes (Y up, right-handed), so these are plain component copies.

use bevy::prelude::{Quat, Vec2, Vec3};

pub fn to_na(v: Vec3) -> locomotion::Vec3 {
    locomotion::Vec3::new(v.x, v.y, v.z)
}

pub fn to_na2(v: Vec2) -> locomotion::Vec2 {
    locomotion::Vec2::new(v.x, v.y)
}

pub fn to_bevy(v: &locomotion::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn quat_to_bevy(q: &locomotion::Quat) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_rotation_matches_bevy() {
        let yaw = 35.0_f32;
        let ours = locomotion::utils::yaw_rotation(yaw);
        let theirs = Quat::from_rotation_y(yaw.to_radians());
        let a = quat_to_bevy(&ours) * Vec3::Z;
        let b = theirs * Vec3::Z;
        assert!((a - b).length() < 1.0e-5);
        assert_eq!(to_bevy(&to_na(a)), a);
    }
}
