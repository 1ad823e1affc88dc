//! BMP texture decoder (internal).
//!
//! Only the depths used for textures are handled: 4-bit paletted and
//! 16-bit X1R5G5B5. Other depths sniff as unknown.

mod decode;

use crate::color::ColorMode;
use crate::error::TextureError;
use crate::limits::Limits;
use crate::texture::Texture;
use enough::Stop;

pub(crate) use decode::parse_header;

/// Decode a 4-bit or 16-bit BMP.
pub(crate) fn decode(
    data: &[u8],
    mode: ColorMode,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Texture, TextureError> {
    log::debug!("loading bmp");
    decode::decode_bmp(data, mode, limits, stop)
}
