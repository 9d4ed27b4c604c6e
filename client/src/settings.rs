//! Controller tuning loaded from a RON file at startup.
//!
//! The file only needs the fields it overrides; everything else keeps the library defaults.
//! A missing or malformed file is not fatal: the sandbox logs a warning and runs on defaults.

use bevy::prelude::*;
use locomotion::ControllerSettings;

/// Relative to the working directory, which `cargo run -p client` sets to the crate root.
pub const SETTINGS_PATH: &str = "assets/controller.ron";

#[derive(Resource, Clone, Debug, Default)]
pub struct ControllerConfig(pub ControllerSettings);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ControllerConfig(load_settings(SETTINGS_PATH)));
}

pub fn parse_settings(text: &str) -> Result<ControllerSettings, ron::error::SpannedError> {
    ron::from_str(text)
}

pub fn load_settings(path: &str) -> ControllerSettings {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("could not read {path}: {err}, using default controller settings");
            return ControllerSettings::default();
        }
    };

    match parse_settings(&text) {
        Ok(settings) => {
            info!("loaded controller settings from {path}");
            settings
        }
        Err(err) => {
            warn!("could not parse {path}: {err}, using default controller settings");
            ControllerSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = parse_settings("(camera: (yaw_speed: 0.2, lock_camera_position: true))")
            .expect("valid ron");
        assert_eq!(settings.camera.yaw_speed, 0.2);
        assert!(settings.camera.lock_camera_position);
        assert_eq!(settings.locomotion, ControllerSettings::default().locomotion);
        assert_eq!(settings.gravity, ControllerSettings::default().gravity);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse_settings("(camera: (yaw_speed: \"fast\"))").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_settings("does/not/exist.ron");
        assert_eq!(settings, ControllerSettings::default());
    }

    #[test]
    fn shipped_file_parses_and_validates() {
        let text = include_str!("../assets/controller.ron");
        let settings = parse_settings(text).expect("shipped settings parse");
        assert!(settings.validate().is_ok());
    }
}
