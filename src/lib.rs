//! # hdrcalib
//!
//! Full-screen HDR calibration pattern for Windows.
//!
//! A small square is drawn at an adjustable luminance (in nits) inside a fixed
//! reference-white swatch. The operator nudges the value with the keyboard or a
//! gamepad until the square visually matches the reference, then reads the
//! value off the screen. Two ranges are calibrated independently: the peak
//! white level (`MaxWhite`, 0 to 10000 nits) and the black floor
//! (`MinBlack`, 0 to 1 nit).
//!
//! ## Rust usage
//!
//! The calibration core is platform independent and can be driven without a
//! window:
//!
//! ```
//! use hdrcalib::brightness::{BrightnessController, BrightnessMode};
//!
//! let mut ctl = BrightnessController::default();
//! ctl.apply_delta(1);
//! assert_eq!(ctl.current_nits(), 810.0);
//!
//! ctl.toggle_mode();
//! assert_eq!(ctl.mode(), BrightnessMode::MinBlack);
//! ```

pub mod brightness;
pub mod color;
pub mod config;
pub mod frame;
pub mod input;
pub mod layout;
pub mod logging;

#[cfg(windows)]
pub mod d3d11;
#[cfg(windows)]
pub mod display;
#[cfg(windows)]
pub mod render;
#[cfg(windows)]
pub mod window;
