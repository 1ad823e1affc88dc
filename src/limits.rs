use crate::error::TextureError;

/// Caps on what a decoder may allocate for one texture.
///
/// Limits are checked after the header is parsed and before any pixel,
/// index or palette buffer exists. All fields default to `None`; without
/// limits, buffers are still bounded by the size of the input file.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Declared width in pixels.
    pub max_width: Option<u64>,
    /// Declared height in pixels.
    pub max_height: Option<u64>,
    /// Declared `width * height`, whatever the storage format.
    pub max_pixels: Option<u64>,
    /// Bytes of any single buffer a decoder keeps or produces.
    ///
    /// For BMP and PNG this covers the decoded pixels (two bytes per native
    /// cell, half a byte per 4-bit index) and the PNG frame buffer. For GRF
    /// it covers the index bytes, the palette, the stored LZ77 block, and
    /// the size that block expands to on [`Texture::copy`](crate::Texture::copy).
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check the declared dimensions.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), TextureError> {
        let exceeded = |what: &str, value: u64, max: u64| {
            TextureError::LimitExceeded(format!("{what} {value} exceeds limit {max}"))
        };
        let (width, height) = (u64::from(width), u64::from(height));
        if let Some(max) = self.max_width.filter(|&max| width > max) {
            return Err(exceeded("width", width, max));
        }
        if let Some(max) = self.max_height.filter(|&max| height > max) {
            return Err(exceeded("height", height, max));
        }
        let pixels = width * height;
        if let Some(max) = self.max_pixels.filter(|&max| pixels > max) {
            return Err(exceeded("pixel count", pixels, max));
        }
        Ok(())
    }

    /// Check the size of one buffer, in bytes.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), TextureError> {
        match self.max_memory_bytes {
            Some(max) if bytes as u64 > max => Err(TextureError::LimitExceeded(format!(
                "buffer of {bytes} bytes exceeds memory limit {max}"
            ))),
            _ => Ok(()),
        }
    }
}
