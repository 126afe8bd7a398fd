// Integration test: operator scenarios driven through FrameDriver
//
// Input comes from a scripted source, frames are stepped on a simulated
// monotonic timeline (10ms per frame), and a recording renderer captures
// every drawn pattern.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use hdrcalib::brightness::{BrightnessController, BrightnessMode, BrightnessState};
use hdrcalib::color::ScRgb;
use hdrcalib::config::CalibrationConfig;
use hdrcalib::frame::{FrameDriver, FrameOutcome, PatternFrame, PatternRenderer};
use hdrcalib::input::{Action, ActionSignals, InputSource, InputSources};
use hdrcalib::layout::ScreenSize;

const FRAME: Duration = Duration::from_millis(10);

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<PatternFrame>,
}

impl RecordingRenderer {
    fn last(&self) -> &PatternFrame {
        self.frames.last().expect("no frame drawn")
    }
}

impl PatternRenderer for RecordingRenderer {
    fn draw(&mut self, frame: &PatternFrame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Input source whose held actions are set by the test between frames.
#[derive(Clone, Default)]
struct ScriptedSource {
    held: Rc<RefCell<ActionSignals>>,
}

impl ScriptedSource {
    fn hold(&self, action: Action) {
        self.held.borrow_mut().press(action);
    }

    fn release_all(&self) {
        *self.held.borrow_mut() = ActionSignals::default();
    }
}

impl InputSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn sample(&mut self, signals: &mut ActionSignals) {
        signals.merge(*self.held.borrow());
    }
}

struct Harness {
    driver: FrameDriver,
    sources: InputSources,
    keyboard: ScriptedSource,
    gamepad: ScriptedSource,
    renderer: RecordingRenderer,
    now: Instant,
}

impl Harness {
    fn new() -> Self {
        Self::with_driver(FrameDriver::new(
            &CalibrationConfig::default(),
            ScreenSize::new(1920, 1080),
        ))
    }

    fn with_driver(driver: FrameDriver) -> Self {
        let keyboard = ScriptedSource::default();
        let gamepad = ScriptedSource::default();
        let mut sources = InputSources::new();
        sources.push(Box::new(keyboard.clone()));
        sources.push(Box::new(gamepad.clone()));
        Self {
            driver,
            sources,
            keyboard,
            gamepad,
            renderer: RecordingRenderer::default(),
            now: Instant::now(),
        }
    }

    fn frame(&mut self) -> FrameOutcome {
        let outcome = self
            .driver
            .run_frame(&mut self.sources, self.now, &mut self.renderer)
            .expect("frame failed");
        self.now += FRAME;
        outcome
    }

    /// Run frames covering `duration` (inclusive of both ends).
    fn run_for(&mut self, duration: Duration) {
        let frames = duration.as_millis() / FRAME.as_millis() + 1;
        for _ in 0..frames {
            assert_eq!(self.frame(), FrameOutcome::Continue);
        }
    }

    fn tap(&mut self, action: Action) {
        self.keyboard.hold(action);
        self.run_for(Duration::from_millis(100));
        self.keyboard.release_all();
        self.frame();
    }

    fn nits(&self) -> f32 {
        self.driver.controller().current_nits()
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn test_tap_increase_once() {
    let mut h = Harness::new();
    h.tap(Action::Increase);
    assert_eq!(h.nits(), 810.0);
    assert_eq!(h.renderer.last().label, "810 nits");
    assert_eq!(h.renderer.last().target_color, ScRgb::gray(810.0 / 80.0));
}

#[test]
fn test_tap_then_hold_reaches_840() {
    let mut h = Harness::new();
    h.tap(Action::Increase);
    assert_eq!(h.nits(), 810.0);

    // initial press + two repeats (at 1700ms and 1900ms)
    h.keyboard.hold(Action::Increase);
    h.run_for(Duration::from_millis(1900));
    h.keyboard.release_all();
    h.frame();
    assert_eq!(h.nits(), 840.0);
}

#[test]
fn test_hold_2000ms_fires_three_commands() {
    let mut h = Harness::new();
    h.gamepad.hold(Action::Decrease);
    h.run_for(Duration::from_millis(2000));
    assert_eq!(h.nits(), 770.0);
}

#[test]
fn test_keyboard_and_gamepad_together_count_once() {
    let mut h = Harness::new();
    h.keyboard.hold(Action::Increase);
    h.gamepad.hold(Action::Increase);
    h.run_for(Duration::from_millis(500));
    assert_eq!(h.nits(), 810.0);
}

#[test]
fn test_toggle_shows_stored_values() {
    let mut h = Harness::new();
    h.tap(Action::ToggleMode);
    assert_eq!(h.driver.controller().mode(), BrightnessMode::MinBlack);
    assert!(approx(h.nits(), 0.1));
    assert_eq!(h.renderer.last().label, "0.10 nits");
    assert!(h.renderer.last().geometry.outer.is_none());

    h.tap(Action::ToggleMode);
    assert_eq!(h.nits(), 800.0);
    assert_eq!(h.renderer.last().label, "800 nits");
    assert!(h.renderer.last().geometry.outer.is_some());
}

#[test]
fn test_min_black_decrease_and_clamp() {
    let mut h = Harness::new();
    h.tap(Action::ToggleMode);
    h.tap(Action::Decrease);
    assert!(approx(h.nits(), 0.09));
    assert_eq!(h.renderer.last().label, "0.09 nits");

    // hold long enough to run far past zero
    h.keyboard.hold(Action::Decrease);
    h.run_for(Duration::from_secs(5));
    h.keyboard.release_all();
    h.frame();
    assert_eq!(h.nits(), 0.0);
    assert_eq!(h.renderer.last().label, "0.00 nits");
}

#[test]
fn test_min_black_sub_step_value_clamps_to_zero() {
    let config = CalibrationConfig::default();
    let controller = BrightnessController::new(BrightnessState {
        mode: BrightnessMode::MinBlack,
        max_white_nits: 800.0,
        min_black_nits: 0.005,
    });
    let mut h = Harness::with_driver(FrameDriver::with_controller(
        controller,
        &config,
        ScreenSize::new(1920, 1080),
    ));
    h.tap(Action::Decrease);
    assert_eq!(h.nits(), 0.0);
}

#[test]
fn test_inner_square_stays_put_across_toggle() {
    let mut h = Harness::new();
    h.frame();
    let before = h.renderer.last().geometry.inner;
    h.tap(Action::ToggleMode);
    assert_eq!(h.renderer.last().geometry.inner, before);
}

#[test]
fn test_quit_ends_loop() {
    let mut h = Harness::new();
    h.tap(Action::Increase);
    let drawn = h.renderer.frames.len();

    h.gamepad.hold(Action::Quit);
    assert_eq!(h.frame(), FrameOutcome::Quit);
    assert_eq!(h.renderer.frames.len(), drawn);
    assert_eq!(h.driver.result().max_white_nits, 810.0);
}
