//! Scalar and angle helpers shared by the controllers.
//!
//! All angles are degrees. The angle helpers treat headings as circular (359 and -1 are the
//! same direction) while keeping the raw accumulated value, so a camera yaw can keep winding
//! past 360 without snapping.

use crate::constants::DIRECTION_EPS_SQ;
use crate::types::{Quat, Vec3};

/// Linear interpolation with `t` clamped to [0, 1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Loops `t` into `[0, length)`.
pub fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Shortest signed difference from `current` to `target`, in (-180, 180].
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// [`lerp`] along the shortest arc between two headings.
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    a + delta_angle(a, b) * t.clamp(0.0, 1.0)
}

/// Critically damped approach of `current` toward `target` over roughly `smooth_time`.
///
/// `velocity` carries the rate of change between calls and must be owned by the caller
/// for the lifetime of the smoothing. The result never overshoots `target`.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1.0e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Overshoot: pin to the target and report the residual rate.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}

/// [`smooth_damp`] for headings: approaches `target` along the shortest arc.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Folds an angle outside ±360 back by one period, then clamps it to `[min, max]`.
pub fn clamp_angle(mut angle: f32, min: f32, max: f32) -> f32 {
    if angle < -360.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle.clamp(min, max)
}

/// Rounds to three decimals, ties to even.
pub fn round_millis(v: f32) -> f32 {
    (v * 1000.0).round_ties_even() / 1000.0
}

/// Heading (degrees) of a planar direction, or `None` when the direction is too short.
///
/// Yaw 0 faces +Z, yaw 90 faces +X.
pub fn yaw_from_xz(x: f32, z: f32) -> Option<f32> {
    if x * x + z * z >= DIRECTION_EPS_SQ {
        return Some(x.atan2(z).to_degrees());
    }

    None
}

/// Unit planar direction for a heading in degrees.
pub fn forward_from_yaw(yaw_deg: f32) -> Vec3 {
    let (s, c) = yaw_deg.to_radians().sin_cos();
    Vec3::new(s, 0.0, c)
}

/// Rotation about +Y for a heading in degrees.
pub fn yaw_rotation(yaw_deg: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), yaw_deg.to_radians())
}
