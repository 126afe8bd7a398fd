// Gamepad → action mapping.
//
// `GamepadState` is a plain snapshot using XInput's bit layout so the mapping
// can be tested without a controller. `XInputGamepad` (Windows) fills it
// from the live device.

use super::{Action, ActionSignals};
use crate::config::DEFAULT_STICK_THRESHOLD;

/// D-pad left (XINPUT_GAMEPAD_DPAD_LEFT).
pub const BUTTON_DPAD_LEFT: u16 = 0x0004;
/// D-pad right (XINPUT_GAMEPAD_DPAD_RIGHT).
pub const BUTTON_DPAD_RIGHT: u16 = 0x0008;
/// Face button A (XINPUT_GAMEPAD_A): toggle mode.
pub const BUTTON_A: u16 = 0x1000;
/// Face button B (XINPUT_GAMEPAD_B): quit.
pub const BUTTON_B: u16 = 0x2000;

/// One sample of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GamepadState {
    /// Digital button bitmask.
    pub buttons: u16,
    /// Left stick X axis, raw signed range.
    pub thumb_lx: i16,
}

impl GamepadState {
    fn has(&self, mask: u16) -> bool {
        self.buttons & mask != 0
    }

    /// Map this sample to action signals.
    ///
    /// The stick counts as pressed only strictly beyond `threshold` in
    /// either direction.
    pub fn signals(&self, threshold: i16) -> ActionSignals {
        let threshold = threshold.saturating_abs();
        let mut signals = ActionSignals::default();

        if self.has(BUTTON_DPAD_LEFT) || self.thumb_lx < -threshold {
            signals.press(Action::Decrease);
        }
        if self.has(BUTTON_DPAD_RIGHT) || self.thumb_lx > threshold {
            signals.press(Action::Increase);
        }
        if self.has(BUTTON_A) {
            signals.press(Action::ToggleMode);
        }
        if self.has(BUTTON_B) {
            signals.press(Action::Quit);
        }
        signals
    }
}

/// Analog-to-digital mapping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadMapping {
    pub stick_threshold: i16,
}

impl Default for GamepadMapping {
    fn default() -> Self {
        Self {
            stick_threshold: DEFAULT_STICK_THRESHOLD,
        }
    }
}

impl GamepadMapping {
    pub fn map(&self, state: &GamepadState) -> ActionSignals {
        state.signals(self.stick_threshold)
    }
}

#[cfg(windows)]
pub use xinput::XInputGamepad;

#[cfg(windows)]
mod xinput {
    use std::time::{Duration, Instant};

    use tracing::info;
    use windows::Win32::Foundation::ERROR_SUCCESS;
    use windows::Win32::UI::Input::XboxController::{XInputGetState, XINPUT_STATE};

    use super::{GamepadMapping, GamepadState};
    use crate::input::{ActionSignals, InputSource};

    /// Polling an empty XInput slot stalls for a noticeable time, so a
    /// disconnected controller is only re-probed at this period.
    const RECONNECT_PROBE_PERIOD: Duration = Duration::from_secs(1);

    /// XInput controller polled once per frame.
    ///
    /// A missing controller is not an error; it simply contributes no signals.
    pub struct XInputGamepad {
        user_index: u32,
        mapping: GamepadMapping,
        connected: bool,
        last_probe: Option<Instant>,
    }

    impl XInputGamepad {
        pub fn new(user_index: u32, mapping: GamepadMapping) -> Self {
            Self {
                user_index,
                mapping,
                connected: false,
                last_probe: None,
            }
        }

        fn read_state(&self) -> Option<GamepadState> {
            let mut state = XINPUT_STATE::default();
            // SAFETY: XInputGetState writes into the caller-provided XINPUT_STATE.
            let ret = unsafe { XInputGetState(self.user_index, &mut state) };
            if ret != ERROR_SUCCESS.0 {
                return None;
            }
            Some(GamepadState {
                buttons: state.Gamepad.wButtons.0,
                thumb_lx: state.Gamepad.sThumbLX,
            })
        }
    }

    impl InputSource for XInputGamepad {
        fn name(&self) -> &str {
            "xinput"
        }

        fn sample(&mut self, signals: &mut ActionSignals) {
            if !self.connected {
                let now = Instant::now();
                let due = self
                    .last_probe
                    .map_or(true, |t| now.saturating_duration_since(t) >= RECONNECT_PROBE_PERIOD);
                if !due {
                    return;
                }
                self.last_probe = Some(now);
            }

            match self.read_state() {
                Some(pad) => {
                    if !self.connected {
                        info!(index = self.user_index, "gamepad connected");
                        self.connected = true;
                    }
                    signals.merge(self.mapping.map(&pad));
                }
                None => {
                    if self.connected {
                        info!(index = self.user_index, "gamepad disconnected");
                        self.connected = false;
                        self.last_probe = Some(Instant::now());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_pad_has_no_signals() {
        assert_eq!(
            GamepadState::default().signals(DEFAULT_STICK_THRESHOLD),
            ActionSignals::default()
        );
    }

    #[test]
    fn test_dpad_maps_to_steps() {
        let pad = GamepadState {
            buttons: BUTTON_DPAD_LEFT,
            thumb_lx: 0,
        };
        let s = pad.signals(DEFAULT_STICK_THRESHOLD);
        assert!(s.decrease && !s.increase);

        let pad = GamepadState {
            buttons: BUTTON_DPAD_RIGHT,
            thumb_lx: 0,
        };
        let s = pad.signals(DEFAULT_STICK_THRESHOLD);
        assert!(s.increase && !s.decrease);
    }

    #[test]
    fn test_stick_threshold_is_exclusive() {
        let mapping = GamepadMapping::default();
        let at = |lx: i16| {
            mapping.map(&GamepadState {
                buttons: 0,
                thumb_lx: lx,
            })
        };

        assert!(!at(16000).increase);
        assert!(at(16001).increase);
        assert!(!at(-16000).decrease);
        assert!(at(-16001).decrease);
        assert!(at(i16::MIN).decrease);
        assert!(at(i16::MAX).increase);
    }

    #[test]
    fn test_face_buttons() {
        let pad = GamepadState {
            buttons: BUTTON_A | BUTTON_B,
            thumb_lx: 0,
        };
        let s = pad.signals(DEFAULT_STICK_THRESHOLD);
        assert!(s.toggle_mode);
        assert!(s.quit);
    }
}
