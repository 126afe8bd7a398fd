// Calibration state: active mode and the stored luminance of each mode.
//
// Each mode owns its own value. Toggling only switches which value is active;
// the other one is kept bit-for-bit.

use tracing::{debug, info};

use crate::color::{encode_nits, ScRgb};
use crate::config::CalibrationConfig;

/// Which luminance sub-range is being calibrated.
///
/// - `MaxWhite`: peak white, 0..=10000 nits in steps of 10, reference swatch shown.
/// - `MinBlack`: black floor, 0..=1 nit in steps of 0.01, reference swatch hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrightnessMode {
    #[default]
    MaxWhite,
    MinBlack,
}

/// Per-mode constants, looked up from the mode tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePolicy {
    /// Increment applied by one step.
    pub step: f32,
    /// Upper bound (inclusive). The lower bound is always 0.
    pub max: f32,
    /// Whether the fixed reference-white swatch is drawn.
    pub shows_reference: bool,
    /// Decimal places used when the value is displayed.
    pub decimals: usize,
}

const MAX_WHITE_POLICY: ModePolicy = ModePolicy {
    step: 10.0,
    max: 10000.0,
    shows_reference: true,
    decimals: 0,
};

const MIN_BLACK_POLICY: ModePolicy = ModePolicy {
    step: 0.01,
    max: 1.0,
    shows_reference: false,
    decimals: 2,
};

impl BrightnessMode {
    pub const fn policy(self) -> ModePolicy {
        match self {
            Self::MaxWhite => MAX_WHITE_POLICY,
            Self::MinBlack => MIN_BLACK_POLICY,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::MaxWhite => Self::MinBlack,
            Self::MinBlack => Self::MaxWhite,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MaxWhite => "max-white",
            Self::MinBlack => "min-black",
        }
    }
}

/// Raw calibration values. Only mutated through [`BrightnessController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessState {
    pub mode: BrightnessMode,
    pub max_white_nits: f32,
    pub min_black_nits: f32,
}

impl Default for BrightnessState {
    fn default() -> Self {
        let config = CalibrationConfig::default();
        Self {
            mode: BrightnessMode::MaxWhite,
            max_white_nits: config.initial_max_white_nits,
            min_black_nits: config.initial_min_black_nits,
        }
    }
}

/// Direction of a single brightness step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Down,
    Up,
}

impl StepDirection {
    fn sign(self) -> f32 {
        match self {
            Self::Down => -1.0,
            Self::Up => 1.0,
        }
    }
}

/// Owns the calibration state and the colour derived from it.
#[derive(Debug, Clone)]
pub struct BrightnessController {
    state: BrightnessState,
    /// Cached scRGB colour of the active value, refreshed on every change.
    color: ScRgb,
}

impl Default for BrightnessController {
    fn default() -> Self {
        Self::new(BrightnessState::default())
    }
}

impl BrightnessController {
    /// Create a controller from an initial state.
    ///
    /// Out-of-range values are clamped into their mode's range so the
    /// controller invariant holds from the start.
    pub fn new(state: BrightnessState) -> Self {
        let state = BrightnessState {
            mode: state.mode,
            max_white_nits: clamp_to(BrightnessMode::MaxWhite, state.max_white_nits),
            min_black_nits: clamp_to(BrightnessMode::MinBlack, state.min_black_nits),
        };
        let mut ctl = Self {
            state,
            color: ScRgb::BLACK,
        };
        ctl.refresh_color();
        ctl
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(BrightnessState {
            mode: BrightnessMode::MaxWhite,
            max_white_nits: config.initial_max_white_nits,
            min_black_nits: config.initial_min_black_nits,
        })
    }

    pub fn mode(&self) -> BrightnessMode {
        self.state.mode
    }

    pub fn state(&self) -> BrightnessState {
        self.state
    }

    /// Stored value of the active mode.
    pub fn current_nits(&self) -> f32 {
        match self.state.mode {
            BrightnessMode::MaxWhite => self.state.max_white_nits,
            BrightnessMode::MinBlack => self.state.min_black_nits,
        }
    }

    /// scRGB colour of the active value.
    pub fn display_color(&self) -> ScRgb {
        self.color
    }

    /// Move the active value by one step of the active mode, saturating at
    /// `[0, max]`. `sign` is interpreted by its sign only; zero is a no-op.
    pub fn apply_delta(&mut self, sign: i32) {
        match sign.signum() {
            1 => self.step(StepDirection::Up),
            -1 => self.step(StepDirection::Down),
            _ => {}
        }
    }

    pub fn step(&mut self, direction: StepDirection) {
        let mode = self.state.mode;
        let next = clamp_to(
            mode,
            self.current_nits() + direction.sign() * mode.policy().step,
        );
        match mode {
            BrightnessMode::MaxWhite => self.state.max_white_nits = next,
            BrightnessMode::MinBlack => self.state.min_black_nits = next,
        }
        self.refresh_color();
        debug!(mode = mode.name(), nits = next, "brightness changed");
    }

    /// Switch to the other mode. Neither stored value changes.
    pub fn toggle_mode(&mut self) {
        self.state.mode = self.state.mode.toggled();
        self.refresh_color();
        info!(
            mode = self.state.mode.name(),
            nits = self.current_nits(),
            "calibration mode switched"
        );
    }

    fn refresh_color(&mut self) {
        self.color = encode_nits(self.current_nits());
    }
}

fn clamp_to(mode: BrightnessMode, nits: f32) -> f32 {
    // NaN collapses to 0 rather than escaping the range.
    if nits.is_nan() {
        return 0.0;
    }
    nits.clamp(0.0, mode.policy().max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_defaults() {
        let ctl = BrightnessController::default();
        assert_eq!(ctl.mode(), BrightnessMode::MaxWhite);
        assert_eq!(ctl.current_nits(), 800.0);
        assert_eq!(ctl.state().min_black_nits, 0.1);
        assert_eq!(ctl.display_color(), ScRgb::gray(10.0));
    }

    #[test]
    fn test_policy_lookup() {
        assert_eq!(BrightnessMode::MaxWhite.policy().step, 10.0);
        assert_eq!(BrightnessMode::MaxWhite.policy().max, 10000.0);
        assert!(BrightnessMode::MaxWhite.policy().shows_reference);
        assert_eq!(BrightnessMode::MinBlack.policy().step, 0.01);
        assert_eq!(BrightnessMode::MinBlack.policy().max, 1.0);
        assert!(!BrightnessMode::MinBlack.policy().shows_reference);
    }

    #[test]
    fn test_step_up_and_down_max_white() {
        let mut ctl = BrightnessController::default();
        ctl.apply_delta(1);
        assert_eq!(ctl.current_nits(), 810.0);
        ctl.apply_delta(-1);
        ctl.apply_delta(-1);
        assert_eq!(ctl.current_nits(), 790.0);
        assert_eq!(ctl.display_color(), ScRgb::gray(790.0 / 80.0));
    }

    #[test]
    fn test_zero_sign_is_noop() {
        let mut ctl = BrightnessController::default();
        ctl.apply_delta(0);
        assert_eq!(ctl.current_nits(), 800.0);
    }

    #[test]
    fn test_max_white_saturates_at_both_ends() {
        let mut ctl = BrightnessController::default();
        for _ in 0..2000 {
            ctl.apply_delta(1);
        }
        assert_eq!(ctl.current_nits(), 10000.0);

        for _ in 0..3000 {
            ctl.apply_delta(-1);
            assert!(ctl.current_nits() >= 0.0);
        }
        assert_eq!(ctl.current_nits(), 0.0);
    }

    #[test]
    fn test_min_black_steps_and_clamps() {
        let mut ctl = BrightnessController::default();
        ctl.toggle_mode();
        assert!(approx(ctl.current_nits(), 0.1));

        ctl.apply_delta(-1);
        assert!(approx(ctl.current_nits(), 0.09));

        for _ in 0..50 {
            ctl.apply_delta(-1);
        }
        assert_eq!(ctl.current_nits(), 0.0);

        for _ in 0..500 {
            ctl.apply_delta(1);
            assert!(ctl.current_nits() <= 1.0);
        }
        assert_eq!(ctl.current_nits(), 1.0);
    }

    #[test]
    fn test_sub_step_value_decrements_to_zero() {
        let mut ctl = BrightnessController::new(BrightnessState {
            mode: BrightnessMode::MinBlack,
            max_white_nits: 800.0,
            min_black_nits: 0.005,
        });
        ctl.apply_delta(-1);
        assert_eq!(ctl.current_nits(), 0.0);
        assert!(ctl.current_nits().is_sign_positive());
    }

    #[test]
    fn test_toggle_preserves_inactive_value() {
        let mut ctl = BrightnessController::default();
        ctl.apply_delta(1);
        ctl.toggle_mode();
        assert!(approx(ctl.current_nits(), 0.1));
        assert_eq!(ctl.display_color(), encode_nits(ctl.current_nits()));

        ctl.toggle_mode();
        assert_eq!(ctl.current_nits(), 810.0);
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let mut ctl = BrightnessController::new(BrightnessState {
            mode: BrightnessMode::MinBlack,
            max_white_nits: 1234.5,
            min_black_nits: 0.0734,
        });
        let before = ctl.state();
        let color_before = ctl.display_color();

        ctl.toggle_mode();
        ctl.toggle_mode();

        assert_eq!(ctl.state(), before);
        assert_eq!(ctl.display_color(), color_before);
    }

    #[test]
    fn test_new_clamps_out_of_range_state() {
        let ctl = BrightnessController::new(BrightnessState {
            mode: BrightnessMode::MaxWhite,
            max_white_nits: 20000.0,
            min_black_nits: -3.0,
        });
        assert_eq!(ctl.current_nits(), 10000.0);
        assert_eq!(ctl.state().min_black_nits, 0.0);
    }
}
