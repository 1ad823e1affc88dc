use enough::Stop;

use crate::color::ColorMode;
use crate::error::TextureError;
use crate::info::TextureKind;
use crate::limits::Limits;
use crate::texture::Texture;

/// Decode a texture from an in-memory file.
///
/// ```
/// use zentexture::{ColorMode, DecodeRequest, Unstoppable};
///
/// let data: &[u8] = b"not a texture";
/// let err = DecodeRequest::new(data)
///     .color_mode(ColorMode::Grayscale)
///     .decode(Unstoppable)
///     .unwrap_err();
/// assert!(matches!(err, zentexture::TextureError::UnrecognizedFormat));
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    color_mode: ColorMode,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            color_mode: ColorMode::default(),
            limits: None,
        }
    }

    /// Color mode for BMP and PNG pixels. GRF data is already native.
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Sniff the container and decode it.
    ///
    /// Unrecognized data and unsupported sub-variants both report
    /// [`TextureError::UnrecognizedFormat`].
    pub fn decode(&self, stop: impl Stop) -> Result<Texture, TextureError> {
        let data = self.data;
        let stop: &dyn Stop = &stop;
        match TextureKind::sniff(data) {
            TextureKind::Unknown => Err(TextureError::UnrecognizedFormat),
            TextureKind::PalettedBmp | TextureKind::Bmp => {
                crate::bmp::decode(data, self.color_mode, self.limits, stop)
            }
            TextureKind::Png => crate::png::decode(data, self.color_mode, self.limits, stop),
            TextureKind::PalettedGrf => crate::grf::decode_paletted(data, self.limits, stop),
            TextureKind::CompressedGrf => crate::grf::decode_compressed(data, self.limits, stop),
        }
    }
}
