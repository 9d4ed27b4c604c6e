use crate::constants::LOOK_THRESHOLD_SQ;
use crate::input::InputSample;
use crate::settings::CameraSettings;
use crate::types::{Quat, Vec3};
use crate::utils::{clamp_angle, lerp_angle};

/// Orbit angles of the follow camera, in degrees. Positive pitch looks down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub yaw: f32,
    pub pitch: f32,
    pub last_applied_rotation: Quat,
}

/// Yaw/pitch of the camera follow target, updated in the late phase.
#[derive(Clone, Debug)]
pub struct CameraRigController {
    settings: CameraSettings,
    lock_on_rotate_speed: f32,
    state: CameraState,
}

/// Rotation for the given angles: yaw about +Y, then pitch about the local +X.
pub fn orbit_rotation(yaw_deg: f32, pitch_deg: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), yaw_deg.to_radians())
        * Quat::from_axis_angle(&Vec3::x_axis(), pitch_deg.to_radians())
}

impl CameraRigController {
    pub fn new(settings: CameraSettings, lock_on_rotate_speed: f32, yaw: f32) -> Self {
        let state = CameraState {
            yaw,
            pitch: 0.0,
            last_applied_rotation: orbit_rotation(yaw, settings.angle_override),
        };
        Self {
            settings,
            lock_on_rotate_speed,
            state,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Follow pivot for a character standing at `position`.
    pub fn pivot(&self, position: Vec3) -> Vec3 {
        position + Vec3::new(0.0, self.settings.target_offset_y, 0.0)
    }

    /// Advance the orbit angles and return the follow-target rotation.
    ///
    /// With a lock-on `target`, the angles turn toward it and look input is ignored for the
    /// tick. Without one, look input accumulates unless the camera position is locked.
    pub fn late_update(
        &mut self,
        input: &InputSample,
        pivot: Vec3,
        target: Option<Vec3>,
        dt: f32,
    ) -> Quat {
        let s = &self.settings;
        let st = &mut self.state;

        match target {
            Some(target) => {
                let to_target = target - pivot;
                let dist = to_target.norm();
                if dist > f32::EPSILON {
                    let target_yaw = to_target.x.atan2(to_target.z).to_degrees();
                    let target_pitch = (to_target.y / dist).clamp(-1.0, 1.0).asin().to_degrees();
                    let t = dt * self.lock_on_rotate_speed;
                    st.yaw = lerp_angle(st.yaw, target_yaw, t);
                    // Rising toward the target is a negative (upward) camera pitch.
                    st.pitch = lerp_angle(st.pitch, -target_pitch, t);
                }
            }
            None => {
                let look = input.look_axis;
                if look.norm_squared() >= LOOK_THRESHOLD_SQ && !s.lock_camera_position {
                    let multiplier = if input.pointer_look { 1.0 } else { dt };
                    st.yaw += look.x * multiplier * s.yaw_speed;
                    st.pitch += look.y * multiplier * s.pitch_speed;
                }
            }
        }

        st.yaw = clamp_angle(st.yaw, f32::MIN, f32::MAX);
        st.pitch = clamp_angle(st.pitch, s.bottom_clamp, s.top_clamp);

        st.last_applied_rotation = orbit_rotation(st.yaw, st.pitch + s.angle_override);
        st.last_applied_rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec2;
    use crate::utils::delta_angle;

    const DT: f32 = 1.0 / 60.0;

    fn rig() -> CameraRigController {
        CameraRigController::new(CameraSettings::default(), 3.0, 0.0)
    }

    fn look(x: f32, y: f32, pointer: bool) -> InputSample {
        InputSample {
            look_axis: Vec2::new(x, y),
            pointer_look: pointer,
            ..InputSample::default()
        }
    }

    #[test]
    fn pointer_look_skips_dt() {
        let mut cam = rig();
        cam.late_update(&look(10.0, 5.0, true), Vec3::zeros(), None, DT);
        assert_eq!(cam.state().yaw, 10.0);
        assert_eq!(cam.state().pitch, 5.0);

        let mut cam = rig();
        cam.late_update(&look(60.0, 0.0, false), Vec3::zeros(), None, DT);
        assert!((cam.state().yaw - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn small_look_input_is_ignored() {
        let mut cam = rig();
        cam.late_update(&look(0.05, 0.05, true), Vec3::zeros(), None, DT);
        assert_eq!(cam.state().yaw, 0.0);
        assert_eq!(cam.state().pitch, 0.0);
    }

    #[test]
    fn locked_camera_position_ignores_look() {
        let mut settings = CameraSettings::default();
        settings.lock_camera_position = true;
        let mut cam = CameraRigController::new(settings, 3.0, 0.0);
        cam.late_update(&look(10.0, 10.0, true), Vec3::zeros(), None, DT);
        assert_eq!(cam.state().yaw, 0.0);
    }

    #[test]
    fn pitch_is_clamped_and_yaw_folds() {
        let mut cam = rig();
        cam.late_update(&look(370.0, 200.0, true), Vec3::zeros(), None, DT);
        assert!((cam.state().yaw - 10.0).abs() < 1.0e-4);
        assert_eq!(cam.state().pitch, 70.0);

        cam.late_update(&look(0.0, -500.0, true), Vec3::zeros(), None, DT);
        assert_eq!(cam.state().pitch, -20.0);
    }

    #[test]
    fn lock_on_overrides_look_input() {
        let mut cam = rig();
        let target = Some(Vec3::new(10.0, 0.0, 0.0));
        for _ in 0..300 {
            cam.late_update(&look(100.0, 0.0, true), Vec3::zeros(), target, DT);
        }
        assert!(delta_angle(cam.state().yaw, 90.0).abs() < 0.5);
        assert!(cam.state().pitch.abs() < 0.5);
    }

    #[test]
    fn lock_on_target_below_pitches_down() {
        let mut cam = rig();
        let target = Some(Vec3::new(0.0, -5.0, 5.0));
        for _ in 0..300 {
            cam.late_update(&InputSample::default(), Vec3::zeros(), target, DT);
        }
        assert!((cam.state().pitch - 45.0).abs() < 0.5);
        let forward = cam.state().last_applied_rotation * Vec3::z();
        assert!(forward.y < -0.6);
    }

    #[test]
    fn rotation_includes_angle_override() {
        let mut settings = CameraSettings::default();
        settings.angle_override = 10.0;
        let mut cam = CameraRigController::new(settings, 3.0, 0.0);
        let rot = cam.late_update(&InputSample::default(), Vec3::zeros(), None, DT);
        let expected = orbit_rotation(0.0, 10.0);
        assert!(rot.angle_to(&expected) < 1.0e-5);
    }
}
