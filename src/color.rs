// Nits → scRGB conversion.
//
// scRGB is linear (gamma 1.0) with BT.709 primaries; 1.0 per channel equals the
// 80-nit SDR reference white, values above 1.0 are HDR highlights.

/// SDR reference white in nits (ITU-R BT.709 / sRGB reference display).
pub const REFERENCE_WHITE_NITS: f32 = 80.0;

/// Linear scRGB colour, one float per channel, alpha implied opaque.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ScRgb {
    pub const BLACK: ScRgb = ScRgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Neutral grey with every channel set to `value`.
    pub const fn gray(value: f32) -> Self {
        Self::new(value, value, value)
    }
}

/// Encode a luminance in nits as a neutral scRGB colour.
///
/// No clamping: the caller keeps `nits` inside its mode's range.
pub fn encode_nits(nits: f32) -> ScRgb {
    ScRgb::gray(nits / REFERENCE_WHITE_NITS)
}
