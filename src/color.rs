//! 15-bit color conversion into the native hardware format.
//!
//! Two 16-bit layouts are involved:
//!
//! - **display order** (X1R5G5B5, as stored by 16-bit BMP): red in bits
//!   10..15, green in 5..10, blue in 0..5.
//! - **native order** (A1B5G5R5): red in bits 0..5, green in 5..10, blue in
//!   10..15 and bit 15 set when the pixel is visible. A native value of `0`
//!   is fully transparent.

/// Visibility bit of a native color.
pub const VISIBLE: u16 = 1 << 15;

/// Display-order magenta (`#ff00ff`), rendered as transparent.
pub const CHROMA_KEY: u16 = 0x7C1F;

/// How display colors are mapped onto native colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Swap red and blue, keep green.
    #[default]
    Normal,
    /// Desaturate to the mid-point of the brightest and darkest channel.
    Grayscale,
}

/// Convert a display-order 15-bit color to a native color.
///
/// The chroma key maps to `0` in every mode.
pub fn to_native(display: u16, mode: ColorMode) -> u16 {
    if display & 0x7FFF == CHROMA_KEY {
        return 0;
    }

    let b = display & 0x1F;
    let g = (display >> 5) & 0x1F;
    let r = (display >> 10) & 0x1F;

    match mode {
        ColorMode::Normal => r | (g << 5) | (b << 10) | VISIBLE,
        ColorMode::Grayscale => {
            let max = r.max(g).max(b);
            let min = r.min(g).min(b);
            let gray = (max + min) / 2;
            gray | (gray << 5) | (gray << 10) | VISIBLE
        }
    }
}

/// Pack 8-bit RGB into a display-order color by dropping the low 3 bits.
pub fn pack_display_truncated(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 10) | (u16::from(g >> 3) << 5) | u16::from(b >> 3)
}

/// Scale an 8-bit channel to 5 bits, `round(c * 31 / 255)`.
///
/// `c * 31` is never an exact half multiple of 255, so adding 127 before
/// the floor division rounds identically to the floating-point form.
pub fn quantize_channel(c: u8) -> u16 {
    (u16::from(c) * 31 + 127) / 255
}

/// Pack an 8-bit-per-channel palette entry directly into a visible native color.
///
/// Palette entries bypass chroma keying and grayscale.
pub fn palette_to_native(r: u8, g: u8, b: u8) -> u16 {
    VISIBLE | (quantize_channel(b) << 10) | (quantize_channel(g) << 5) | quantize_channel(r)
}
