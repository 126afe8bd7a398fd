// Test pattern geometry.
//
// Outer square: side = screen height / 6, centred on screen.
// Inner square: half the outer side, centred in the outer square.
// Text band: below the outer square, separated by the outer/inner gap.
//
// The inner square is placed relative to the outer square even when the outer
// square is hidden, so the target does not move when the mode changes.

use crate::brightness::BrightnessMode;

/// Height of the text band in display units.
pub const TEXT_BAND_HEIGHT: f32 = 40.0;

/// Outer square side as a fraction of screen height.
const OUTER_SIDE_DIVISOR: f32 = 6.0;

/// Axis-aligned rectangle, edges in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// Screen size in display units (physical pixels with DPI awareness on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Result of the layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternGeometry {
    /// Reference swatch; `None` when the mode hides it.
    pub outer: Option<Rect>,
    /// Adjustable calibration target.
    pub inner: Rect,
    /// Band for the `<value> nits` label.
    pub text: Rect,
}

/// Compute the pattern geometry for a screen and mode.
pub fn compute_layout(screen: ScreenSize, mode: BrightnessMode) -> PatternGeometry {
    let screen_w = screen.width as f32;
    let screen_h = screen.height as f32;

    let outer_side = screen_h / OUTER_SIDE_DIVISOR;
    let outer = Rect::from_origin_size(
        (screen_w - outer_side) / 2.0,
        (screen_h - outer_side) / 2.0,
        outer_side,
        outer_side,
    );

    let inner_side = outer_side / 2.0;
    let gap = (outer_side - inner_side) / 2.0;
    let inner = Rect::from_origin_size(
        outer.left + gap,
        outer.top + gap,
        inner_side,
        inner_side,
    );

    let text = Rect::from_origin_size(
        outer.left,
        outer.bottom + gap,
        outer_side,
        TEXT_BAND_HEIGHT,
    );

    PatternGeometry {
        outer: mode.policy().shows_reference.then_some(outer),
        inner,
        text,
    }
}

/// Label for the current value: `"<value> nits"` with the mode's precision
/// (`810 nits`, `0.09 nits`).
pub fn format_nits(nits: f32, mode: BrightnessMode) -> String {
    let decimals = mode.policy().decimals;
    // Avoid "-0" / "-0.00" for values that round to zero from below.
    let nits = if nits == 0.0 { 0.0 } else { nits };
    format!("{:.*} nits", decimals, nits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FHD: ScreenSize = ScreenSize {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn test_outer_square_centered() {
        let g = compute_layout(FHD, BrightnessMode::MaxWhite);
        let outer = g.outer.expect("outer square shown in MaxWhite");
        assert_eq!(outer.width(), 180.0);
        assert_eq!(outer.height(), 180.0);
        assert_eq!(outer.center(), (960.0, 540.0));
        assert_eq!(outer.left, 870.0);
        assert_eq!(outer.top, 450.0);
    }

    #[test]
    fn test_inner_square_half_size_and_centered() {
        let g = compute_layout(FHD, BrightnessMode::MaxWhite);
        assert_eq!(g.inner.width(), 90.0);
        assert_eq!(g.inner.height(), 90.0);
        assert_eq!(g.inner.center(), (960.0, 540.0));
    }

    #[test]
    fn test_text_band_below_outer_with_same_gap() {
        let g = compute_layout(FHD, BrightnessMode::MaxWhite);
        let outer = g.outer.unwrap();
        let gap = g.inner.top - outer.top;
        assert_eq!(gap, 45.0);
        assert_eq!(g.text.top, outer.bottom + gap);
        assert_eq!(g.text.height(), TEXT_BAND_HEIGHT);
        assert_eq!(g.text.left, outer.left);
        assert_eq!(g.text.width(), outer.width());
    }

    #[test]
    fn test_min_black_hides_outer_only() {
        let white = compute_layout(FHD, BrightnessMode::MaxWhite);
        let black = compute_layout(FHD, BrightnessMode::MinBlack);
        assert!(black.outer.is_none());
        assert_eq!(white.inner, black.inner);
        assert_eq!(white.text, black.text);
    }

    #[test]
    fn test_layout_is_deterministic() {
        for mode in [BrightnessMode::MaxWhite, BrightnessMode::MinBlack] {
            for screen in [FHD, ScreenSize::new(3840, 2160), ScreenSize::new(1366, 768)] {
                let a = compute_layout(screen, mode);
                let b = compute_layout(screen, mode);
                assert_eq!(a, b);
                assert_eq!(a.inner.left.to_bits(), b.inner.left.to_bits());
                assert_eq!(a.text.bottom.to_bits(), b.text.bottom.to_bits());
            }
        }
    }

    #[test]
    fn test_zero_screen_is_degenerate_not_panicking() {
        let g = compute_layout(ScreenSize::default(), BrightnessMode::MaxWhite);
        assert_eq!(g.inner.width(), 0.0);
    }

    #[test]
    fn test_format_max_white_integer() {
        assert_eq!(format_nits(800.0, BrightnessMode::MaxWhite), "800 nits");
        assert_eq!(format_nits(10000.0, BrightnessMode::MaxWhite), "10000 nits");
        assert_eq!(format_nits(0.0, BrightnessMode::MaxWhite), "0 nits");
    }

    #[test]
    fn test_format_min_black_two_decimals() {
        assert_eq!(format_nits(0.1, BrightnessMode::MinBlack), "0.10 nits");
        assert_eq!(format_nits(1.0, BrightnessMode::MinBlack), "1.00 nits");
        assert_eq!(format_nits(0.0, BrightnessMode::MinBlack), "0.00 nits");
        // accumulated float error is rounded, not truncated
        let drifted = 0.1f32 - 0.01 - 0.01;
        assert_eq!(format_nits(drifted, BrightnessMode::MinBlack), "0.08 nits");
    }

    #[test]
    fn test_format_negative_zero() {
        assert_eq!(format_nits(-0.0, BrightnessMode::MinBlack), "0.00 nits");
    }
}
