// Input: physical sources → logical action signals → discrete press/repeat events.
//
// Every frame each `InputSource` ORs its current state into one `ActionSignals`
// value. The detectors below only ever see those logical booleans, so adding a
// new device does not touch the timing logic.

pub mod gamepad;
#[cfg(windows)]
pub mod keyboard;

use std::time::{Duration, Instant};

use crate::config::{CalibrationConfig, DEFAULT_REPEAT_DELAY, DEFAULT_REPEAT_INTERVAL};

/// Logical operator actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Decrease,
    Increase,
    ToggleMode,
    Quit,
}

/// Held state of every logical action for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionSignals {
    pub decrease: bool,
    pub increase: bool,
    pub toggle_mode: bool,
    pub quit: bool,
}

impl ActionSignals {
    /// Mark `action` as held. Never clears a signal set by another source.
    pub fn press(&mut self, action: Action) {
        *self.slot(action) = true;
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Decrease => self.decrease,
            Action::Increase => self.increase,
            Action::ToggleMode => self.toggle_mode,
            Action::Quit => self.quit,
        }
    }

    /// Logical OR of two signal sets.
    pub fn merge(&mut self, other: ActionSignals) {
        self.decrease |= other.decrease;
        self.increase |= other.increase;
        self.toggle_mode |= other.toggle_mode;
        self.quit |= other.quit;
    }

    fn slot(&mut self, action: Action) -> &mut bool {
        match action {
            Action::Decrease => &mut self.decrease,
            Action::Increase => &mut self.increase,
            Action::ToggleMode => &mut self.toggle_mode,
            Action::Quit => &mut self.quit,
        }
    }
}

/// A physical device feeding logical action signals.
pub trait InputSource {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// OR the device's current state into `signals`.
    ///
    /// Sources must only set signals, never clear them.
    fn sample(&mut self, signals: &mut ActionSignals);
}

/// All registered input sources, polled together once per frame.
#[derive(Default)]
pub struct InputSources {
    sources: Vec<Box<dyn InputSource>>,
}

impl InputSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: Box<dyn InputSource>) {
        tracing::debug!(source = source.name(), "input source registered");
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sample every source and return the merged signals.
    pub fn poll(&mut self) -> ActionSignals {
        let mut signals = ActionSignals::default();
        for source in &mut self.sources {
            source.sample(&mut signals);
        }
        signals
    }
}

// ---------------------------------------------------------------------------
// Press / auto-repeat detection
// ---------------------------------------------------------------------------

/// Auto-repeat timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTiming {
    /// Hold time after the press before repeating starts.
    pub delay: Duration,
    /// Time between consecutive repeats.
    pub interval: Duration,
}

impl Default for RepeatTiming {
    fn default() -> Self {
        Self {
            delay: DEFAULT_REPEAT_DELAY,
            interval: DEFAULT_REPEAT_INTERVAL,
        }
    }
}

impl From<&CalibrationConfig> for RepeatTiming {
    fn from(config: &CalibrationConfig) -> Self {
        Self {
            delay: config.repeat_delay,
            interval: config.repeat_interval,
        }
    }
}

/// Timer state of one repeating input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputTimerState {
    #[default]
    Released,
    /// Held, still inside the initial delay.
    PressedInitial { pressed_at: Instant },
    /// Held past the delay. `last_repeat` is the time of the last emission
    /// (or the end of the delay before the first repeat).
    PressedRepeating {
        pressed_at: Instant,
        last_repeat: Instant,
    },
}

impl InputTimerState {
    pub fn is_held(&self) -> bool {
        !matches!(self, Self::Released)
    }
}

/// Press-edge detector with timed auto-repeat.
///
/// Emits once on the press edge, nothing during the initial delay, then once
/// per interval until release. The first repeat fires one interval after the
/// delay ends, so a hold of `T` yields `floor((T - delay) / interval)` repeats.
#[derive(Debug, Clone)]
pub struct RepeatDetector {
    timing: RepeatTiming,
    state: InputTimerState,
}

impl RepeatDetector {
    pub fn new(timing: RepeatTiming) -> Self {
        Self {
            timing,
            state: InputTimerState::Released,
        }
    }

    pub fn state(&self) -> InputTimerState {
        self.state
    }

    /// Feed this frame's signal. Returns `true` when a command should fire.
    pub fn update(&mut self, held: bool, now: Instant) -> bool {
        if !held {
            self.state = InputTimerState::Released;
            return false;
        }

        match self.state {
            InputTimerState::Released => {
                self.state = InputTimerState::PressedInitial { pressed_at: now };
                true
            }
            InputTimerState::PressedInitial { pressed_at } => {
                let repeat_start = pressed_at + self.timing.delay;
                if now < repeat_start {
                    return false;
                }
                self.state = InputTimerState::PressedRepeating {
                    pressed_at,
                    last_repeat: repeat_start,
                };
                // A long frame may already cover the first interval.
                self.try_repeat(now)
            }
            InputTimerState::PressedRepeating { .. } => self.try_repeat(now),
        }
    }

    fn try_repeat(&mut self, now: Instant) -> bool {
        let InputTimerState::PressedRepeating {
            pressed_at,
            last_repeat,
        } = self.state
        else {
            return false;
        };

        if now.saturating_duration_since(last_repeat) < self.timing.interval {
            return false;
        }
        self.state = InputTimerState::PressedRepeating {
            pressed_at,
            last_repeat: now,
        };
        true
    }
}

/// One-shot press-edge detector (no repeat).
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    was_held: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only on the frame the signal goes from released to held.
    pub fn update(&mut self, held: bool) -> bool {
        let edge = held && !self.was_held;
        self.was_held = held;
        edge
    }
}
