// Per-frame orchestration.
//
// One frame = poll inputs → detect edges/repeats → apply commands → layout →
// draw → present. Everything runs on the caller's thread; the renderer's
// present call (vsync) is the only blocking point.

use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::brightness::{BrightnessController, BrightnessMode, BrightnessState, StepDirection};
use crate::color::{encode_nits, ScRgb};
use crate::config::CalibrationConfig;
use crate::input::{ActionSignals, EdgeDetector, InputSources, RepeatDetector, RepeatTiming};
use crate::layout::{compute_layout, format_nits, PatternGeometry, ScreenSize};

/// Discrete command produced by the input detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCommand {
    Decrease,
    Increase,
    ToggleMode,
    Quit,
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternFrame {
    pub geometry: PatternGeometry,
    pub mode: BrightnessMode,
    /// Colour of the reference swatch (drawn only if `geometry.outer` is set).
    pub reference_color: ScRgb,
    /// Colour of the adjustable square.
    pub target_color: ScRgb,
    /// `<value> nits`
    pub label: String,
}

/// Drawing backend for the pattern.
pub trait PatternRenderer {
    /// Record the frame into the back buffer.
    fn draw(&mut self, frame: &PatternFrame) -> Result<()>;

    /// Present the back buffer. Expected to block until the next refresh.
    fn present(&mut self) -> Result<()>;
}

/// What the main loop should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Owns the calibration state and input timers; advances one frame at a time.
pub struct FrameDriver {
    controller: BrightnessController,
    decrease: RepeatDetector,
    increase: RepeatDetector,
    toggle: EdgeDetector,
    quit: EdgeDetector,
    screen: ScreenSize,
    reference_color: ScRgb,
    frames: u64,
}

impl FrameDriver {
    pub fn new(config: &CalibrationConfig, screen: ScreenSize) -> Self {
        Self::with_controller(BrightnessController::from_config(config), config, screen)
    }

    pub fn with_controller(
        controller: BrightnessController,
        config: &CalibrationConfig,
        screen: ScreenSize,
    ) -> Self {
        let timing = RepeatTiming::from(config);
        Self {
            controller,
            decrease: RepeatDetector::new(timing),
            increase: RepeatDetector::new(timing),
            toggle: EdgeDetector::new(),
            quit: EdgeDetector::new(),
            screen,
            reference_color: encode_nits(config.reference_white_nits),
            frames: 0,
        }
    }

    pub fn controller(&self) -> &BrightnessController {
        &self.controller
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run the detectors on this frame's signals.
    ///
    /// Several commands can fire in the same frame; they are returned in
    /// application order (Decrease, Increase, ToggleMode, Quit).
    pub fn detect(&mut self, signals: ActionSignals, now: Instant) -> Vec<FrameCommand> {
        let mut commands = Vec::with_capacity(4);
        if self.decrease.update(signals.decrease, now) {
            commands.push(FrameCommand::Decrease);
        }
        if self.increase.update(signals.increase, now) {
            commands.push(FrameCommand::Increase);
        }
        if self.toggle.update(signals.toggle_mode) {
            commands.push(FrameCommand::ToggleMode);
        }
        if self.quit.update(signals.quit) {
            commands.push(FrameCommand::Quit);
        }
        commands
    }

    /// Apply commands to the controller. Returns `Quit` if one was present.
    pub fn apply(&mut self, commands: &[FrameCommand]) -> FrameOutcome {
        let mut outcome = FrameOutcome::Continue;
        for command in commands {
            match command {
                FrameCommand::Decrease => self.controller.step(StepDirection::Down),
                FrameCommand::Increase => self.controller.step(StepDirection::Up),
                FrameCommand::ToggleMode => self.controller.toggle_mode(),
                FrameCommand::Quit => outcome = FrameOutcome::Quit,
            }
        }
        outcome
    }

    /// Build the renderer input for the current state.
    pub fn pattern(&self) -> PatternFrame {
        let mode = self.controller.mode();
        PatternFrame {
            geometry: compute_layout(self.screen, mode),
            mode,
            reference_color: self.reference_color,
            target_color: self.controller.display_color(),
            label: format_nits(self.controller.current_nits(), mode),
        }
    }

    /// Advance one frame with already-sampled signals.
    ///
    /// On `Quit` the frame is not drawn.
    pub fn step<R: PatternRenderer>(
        &mut self,
        signals: ActionSignals,
        now: Instant,
        renderer: &mut R,
    ) -> Result<FrameOutcome> {
        let commands = self.detect(signals, now);
        if self.apply(&commands) == FrameOutcome::Quit {
            self.log_result();
            return Ok(FrameOutcome::Quit);
        }

        let frame = self.pattern();
        renderer.draw(&frame)?;
        renderer.present()?;
        self.frames += 1;
        Ok(FrameOutcome::Continue)
    }

    /// Poll all input sources, then advance one frame.
    pub fn run_frame<R: PatternRenderer>(
        &mut self,
        sources: &mut InputSources,
        now: Instant,
        renderer: &mut R,
    ) -> Result<FrameOutcome> {
        let signals = sources.poll();
        self.step(signals, now, renderer)
    }

    /// Final calibration values, for the operator to read off.
    pub fn result(&self) -> BrightnessState {
        self.controller.state()
    }

    fn log_result(&self) {
        let state = self.result();
        info!(
            max_white = %format_nits(state.max_white_nits, BrightnessMode::MaxWhite),
            min_black = %format_nits(state.min_black_nits, BrightnessMode::MinBlack),
            frames = self.frames,
            "calibration finished"
        );
    }
}
