//! PNG textures.
//!
//! The PNG stream itself is decoded by the `png` crate; only fully opaque
//! pixels survive, everything else stays transparent.

use enough::Stop;
use rgb::RGBA8;

use crate::color::{self, ColorMode};
use crate::error::TextureError;
use crate::limits::Limits;
use crate::texture::{Texture, TextureData};

/// Read the IHDR dimensions.
pub(crate) fn probe(data: &[u8]) -> Result<(u32, u32), TextureError> {
    let reader = ::png::Decoder::new(data).read_info()?;
    let info = reader.info();
    Ok((info.width, info.height))
}

pub(crate) fn decode(
    data: &[u8],
    mode: ColorMode,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Texture, TextureError> {
    log::debug!("loading png");

    let mut decoder = ::png::Decoder::new(data);
    decoder.set_transformations(
        ::png::Transformations::EXPAND | ::png::Transformations::STRIP_16,
    );
    let mut reader = decoder.read_info()?;
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };

    let pixels = (width as usize)
        .checked_mul(height as usize)
        .ok_or(TextureError::DimensionsTooLarge { width, height })?;
    if let Some(limits) = limits {
        limits.check(width, height)?;
        limits.check_memory(reader.output_buffer_size())?;
        limits.check_memory(pixels * 2)?;
    }

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    stop.check()?;
    let rgba = to_rgba8(&buf[..frame.buffer_size()], frame.color_type)?;

    let mut out = vec![0u16; pixels];
    for (px, c) in out.iter_mut().zip(&rgba) {
        // Partial alpha is not blended.
        if c.a == 0xFF {
            *px = color::to_native(color::pack_display_truncated(c.r, c.g, c.b), mode);
        }
    }

    Ok(Texture::from_parts(width, height, TextureData::Png(out)))
}

/// Widen the expanded 8-bit frame to RGBA.
fn to_rgba8(buf: &[u8], color_type: ::png::ColorType) -> Result<Vec<RGBA8>, TextureError> {
    use ::png::ColorType;

    let pixels = match color_type {
        ColorType::Rgba => buf
            .chunks_exact(4)
            .map(|c| RGBA8::new(c[0], c[1], c[2], c[3]))
            .collect(),
        ColorType::Rgb => buf
            .chunks_exact(3)
            .map(|c| RGBA8::new(c[0], c[1], c[2], 0xFF))
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .map(|c| RGBA8::new(c[0], c[0], c[0], c[1]))
            .collect(),
        ColorType::Grayscale => buf.iter().map(|&g| RGBA8::new(g, g, g, 0xFF)).collect(),
        ColorType::Indexed => {
            return Err(TextureError::UnsupportedVariant(
                "indexed PNG frame after expansion".into(),
            ));
        }
    };
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    fn encode(width: u32, height: u32, color: ::png::ColorType, pixels: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut encoder = ::png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(::png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(pixels).unwrap();
        writer.finish().unwrap();
        out
    }

    #[test]
    fn only_opaque_pixels_survive() {
        let data = encode(
            3,
            1,
            ::png::ColorType::Rgba,
            &[255, 255, 255, 255, 255, 255, 255, 128, 255, 0, 0, 0],
        );
        let tex = decode(&data, ColorMode::Normal, None, &Unstoppable).unwrap();
        assert_eq!(tex.bitmap().unwrap(), &[0xFFFF, 0, 0]);
    }

    #[test]
    fn channels_truncate_then_swap() {
        // r=0xF8 -> 31, g=0x0F -> 1, b=0x07 -> 0
        let data = encode(1, 1, ::png::ColorType::Rgb, &[0xF8, 0x0F, 0x07]);
        let tex = decode(&data, ColorMode::Normal, None, &Unstoppable).unwrap();
        assert_eq!(tex.bitmap().unwrap(), &[0x8000 | (1 << 5) | 31]);
    }

    #[test]
    fn magenta_is_keyed_out() {
        let data = encode(1, 1, ::png::ColorType::Rgb, &[255, 0, 255]);
        let tex = decode(&data, ColorMode::Grayscale, None, &Unstoppable).unwrap();
        assert_eq!(tex.bitmap().unwrap(), &[0]);
    }

    #[test]
    fn grayscale_source_is_opaque() {
        let data = encode(2, 1, ::png::ColorType::Grayscale, &[0, 255]);
        let tex = decode(&data, ColorMode::Normal, None, &Unstoppable).unwrap();
        assert_eq!(tex.bitmap().unwrap(), &[0x8000, 0xFFFF]);
        assert_eq!(probe(&data).unwrap(), (2, 1));
    }

    #[test]
    fn corrupt_stream_is_an_error() {
        let mut data = encode(1, 1, ::png::ColorType::Rgb, &[1, 2, 3]);
        data.truncate(20);
        assert!(decode(&data, ColorMode::Normal, None, &Unstoppable).is_err());
    }
}
