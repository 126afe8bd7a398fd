// Tunable constants of the calibration tool.
//
// Everything here has a fixed default; there are no config files or CLI flags.
// Mode step sizes and bounds live on `BrightnessMode` instead.

use std::time::Duration;

use crate::color::ScRgb;

/// Initial delay before a held input starts auto-repeating.
pub const DEFAULT_REPEAT_DELAY: Duration = Duration::from_millis(1500);

/// Cadence of auto-repeat once it has started.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(200);

/// Left-stick deflection that counts as a digital press, out of the raw
/// signed 16-bit range (-32768..=32767).
pub const DEFAULT_STICK_THRESHOLD: i16 = 16000;

/// Luminance of the fixed reference swatch (10000 nits → 125.0 scRGB).
pub const DEFAULT_REFERENCE_WHITE_NITS: f32 = 10000.0;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    /// Starting value of the `MaxWhite` mode.
    pub initial_max_white_nits: f32,
    /// Starting value of the `MinBlack` mode.
    pub initial_min_black_nits: f32,
    pub reference_white_nits: f32,
    pub repeat_delay: Duration,
    pub repeat_interval: Duration,
    pub stick_threshold: i16,
    /// XInput user index of the controller that is polled.
    pub gamepad_index: u32,
    pub font_family: String,
    pub font_size: f32,
    pub text_color: ScRgb,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            initial_max_white_nits: 800.0,
            initial_min_black_nits: 0.1,
            reference_white_nits: DEFAULT_REFERENCE_WHITE_NITS,
            repeat_delay: DEFAULT_REPEAT_DELAY,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
            stick_threshold: DEFAULT_STICK_THRESHOLD,
            gamepad_index: 0,
            font_family: "Arial".to_string(),
            font_size: 24.0,
            // dark blue
            text_color: ScRgb::new(0.0, 0.0, 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = CalibrationConfig::default();
        assert_eq!(config.repeat_delay.as_millis(), 1500);
        assert_eq!(config.repeat_interval.as_millis(), 200);
        assert!(config.repeat_interval < config.repeat_delay);
    }

    #[test]
    fn test_default_initial_values_are_in_range() {
        let config = CalibrationConfig::default();
        assert!((0.0..=10000.0).contains(&config.initial_max_white_nits));
        assert!((0.0..=1.0).contains(&config.initial_min_black_nits));
    }
}
