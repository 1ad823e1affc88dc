//! BMP decoder for 4-bit paletted and 16-bit (X1R5G5B5) bitmaps.
//!
//! Rows are stored bottom-up and padded to 4 bytes; output rows are
//! top-down and tightly packed.

use enough::Stop;

use crate::color::{self, ColorMode};
use crate::cursor::Cursor;
use crate::error::TextureError;
use crate::limits::Limits;
use crate::texture::{Indexed, Texture, TextureData};

/// Size of the file header preceding the info header.
const FILE_HEADER_LEN: usize = 14;

// ── Parsed BMP header info ──────────────────────────────────────────

pub(crate) struct BmpHeader {
    pub data_offset: usize,
    pub info_size: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u16,
    pub colors_used: u32,
}

impl BmpHeader {
    fn stride(&self) -> usize {
        (self.width as usize).saturating_mul(usize::from(self.depth)).div_ceil(32) * 4
    }

    fn row_bytes(&self) -> usize {
        (self.width as usize).saturating_mul(usize::from(self.depth)).div_ceil(8)
    }

    /// End offset of the last stored row, which needs no trailing padding.
    fn pixel_data_end(&self) -> Option<usize> {
        if self.height == 0 {
            return Some(self.data_offset);
        }
        self.stride()
            .checked_mul(self.height as usize - 1)?
            .checked_add(self.row_bytes())?
            .checked_add(self.data_offset)
    }

    fn pixel_count(&self) -> Result<usize, TextureError> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(TextureError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })
    }
}

// ── Header parsing ──────────────────────────────────────────────────

/// Parse the file and info headers.
pub(crate) fn parse_header(data: &[u8]) -> Result<BmpHeader, TextureError> {
    let mut cur = Cursor::new(data);
    if cur.read_fixed_bytes::<2>()? != *b"BM" {
        return Err(TextureError::UnrecognizedFormat);
    }
    // File size and reserved words.
    cur.skip(8)?;
    let data_offset = cur.get_u32_le()? as usize;
    let info_size = cur.get_u32_le()?;
    if info_size < 40 {
        return Err(TextureError::InvalidHeader(format!(
            "BMP info header of {info_size} bytes is too small"
        )));
    }

    let width = cur.get_u32_le()?;
    let height = cur.get_u32_le()? as i32;
    if height < 0 {
        return Err(TextureError::UnsupportedVariant(
            "top-down BMP rows".into(),
        ));
    }
    // Planes.
    cur.skip(2)?;
    let depth = cur.get_u16_le()?;
    let compression = cur.get_u32_le()?;
    // Image size, then horizontal and vertical resolution.
    cur.skip(12)?;
    let colors_used = cur.get_u32_le()?;

    match (depth, compression) {
        // 3 = BI_BITFIELDS, taken as X1R5G5B5 masks
        (4, 0) | (16, 0) | (16, 3) => {}
        (4 | 16, other) => {
            return Err(TextureError::UnsupportedVariant(format!(
                "{depth}-bit BMP with compression {other}"
            )));
        }
        (other, _) => {
            return Err(TextureError::UnsupportedVariant(format!(
                "{other}-bit BMP"
            )));
        }
    }

    Ok(BmpHeader {
        data_offset,
        info_size,
        width,
        height: height as u32,
        depth,
        colors_used,
    })
}

// ── Full decode ─────────────────────────────────────────────────────

pub(crate) fn decode_bmp(
    data: &[u8],
    mode: ColorMode,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Texture, TextureError> {
    let header = parse_header(data)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    // Output buffers are sized from the header, so the rows must exist first.
    match header.pixel_data_end() {
        Some(end) if end <= data.len() => {}
        _ => return Err(TextureError::UnexpectedEof),
    }
    let pixels = header.pixel_count()?;

    let payload = match header.depth {
        16 => {
            check_memory(limits, pixels * 2)?;
            TextureData::Bmp(decode_direct(data, &header, pixels, mode, stop)?)
        }
        _ => {
            if header.width % 2 != 0 {
                return Err(TextureError::UnsupportedVariant(format!(
                    "4-bit BMP with odd width {}",
                    header.width
                )));
            }
            check_memory(limits, pixels / 2)?;
            let palette = read_palette(data, &header)?;
            let indices = decode_indices(data, &header, pixels / 2, stop)?;
            TextureData::PalettedBmp(Indexed { indices, palette })
        }
    };

    Ok(Texture::from_parts(header.width, header.height, payload))
}

fn check_memory(limits: Option<&Limits>, bytes: usize) -> Result<(), TextureError> {
    match limits {
        Some(limits) => limits.check_memory(bytes),
        None => Ok(()),
    }
}

/// Read the palette following the info header.
///
/// A stored count of zero means the full `2^depth` entries.
fn read_palette(data: &[u8], header: &BmpHeader) -> Result<Vec<u16>, TextureError> {
    let count = match header.colors_used {
        0 => 1usize << header.depth,
        n => n as usize,
    };
    if count > 256 {
        return Err(TextureError::InvalidHeader(format!(
            "BMP palette of {count} entries"
        )));
    }

    let mut cur = Cursor::new(data);
    cur.set_position(FILE_HEADER_LEN + header.info_size as usize)?;
    (0..count)
        .map(|_| {
            let [b, g, r, _reserved] = cur.read_fixed_bytes::<4>()?;
            Ok(color::palette_to_native(r, g, b))
        })
        .collect()
}

/// Byte offset of the stored row holding display row `y`.
fn row_offset(header: &BmpHeader, y: usize) -> Result<usize, TextureError> {
    let stored_row = header.height as usize - 1 - y;
    stored_row
        .checked_mul(header.stride())
        .and_then(|off| off.checked_add(header.data_offset))
        .ok_or(TextureError::UnexpectedEof)
}

fn decode_direct(
    data: &[u8],
    header: &BmpHeader,
    pixels: usize,
    mode: ColorMode,
    stop: &dyn Stop,
) -> Result<Vec<u16>, TextureError> {
    let width = header.width as usize;
    let mut out = vec![0u16; pixels];
    let mut cur = Cursor::new(data);

    for (y, out_row) in out.chunks_exact_mut(width.max(1)).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        cur.set_position(row_offset(header, y)?)?;
        let row = cur.read_bytes(header.row_bytes())?;
        for (px, pair) in out_row.iter_mut().zip(row.chunks_exact(2)) {
            *px = color::to_native(u16::from_le_bytes([pair[0], pair[1]]), mode);
        }
    }
    Ok(out)
}

fn decode_indices(
    data: &[u8],
    header: &BmpHeader,
    len: usize,
    stop: &dyn Stop,
) -> Result<Vec<u8>, TextureError> {
    let row_bytes = header.row_bytes();
    let mut out = vec![0u8; len];
    let mut cur = Cursor::new(data);

    for (y, out_row) in out.chunks_exact_mut(row_bytes.max(1)).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        cur.set_position(row_offset(header, y)?)?;
        let row = cur.read_bytes(row_bytes)?;
        // BMP puts the first pixel in the high nibble; native packing wants it low.
        for (dst, src) in out_row.iter_mut().zip(row) {
            *dst = src.rotate_left(4);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    /// Build a BMP with a 40-byte info header and 4-byte aligned rows.
    fn bmp(width: u32, height: u32, depth: u16, palette: &[[u8; 4]], rows: &[&[u8]]) -> Vec<u8> {
        let data_offset = 14 + 40 + palette.len() * 4;
        let mut d = Vec::new();
        d.extend_from_slice(b"BM");
        d.extend_from_slice(&0u32.to_le_bytes());
        d.extend_from_slice(&0u32.to_le_bytes());
        d.extend_from_slice(&(data_offset as u32).to_le_bytes());
        d.extend_from_slice(&40u32.to_le_bytes());
        d.extend_from_slice(&width.to_le_bytes());
        d.extend_from_slice(&height.to_le_bytes());
        d.extend_from_slice(&1u16.to_le_bytes());
        d.extend_from_slice(&depth.to_le_bytes());
        d.extend_from_slice(&0u32.to_le_bytes());
        d.extend_from_slice(&0u32.to_le_bytes());
        d.extend_from_slice(&[0u8; 8]);
        d.extend_from_slice(&(palette.len() as u32).to_le_bytes());
        d.extend_from_slice(&0u32.to_le_bytes());
        for entry in palette {
            d.extend_from_slice(entry);
        }
        // stored bottom-up
        for row in rows.iter().rev() {
            d.extend_from_slice(row);
            let pad = (4 - row.len() % 4) % 4;
            d.extend(std::iter::repeat_n(0u8, pad));
        }
        d
    }

    #[test]
    fn header_fields() {
        let data = bmp(4, 2, 16, &[], &[&[0; 8], &[0; 8]]);
        let h = parse_header(&data).unwrap();
        assert_eq!((h.width, h.height, h.depth), (4, 2, 16));
        assert_eq!(h.data_offset, 54);
        assert_eq!(h.stride(), 8);
    }

    #[test]
    fn direct_rows_flip_and_convert() {
        // top row: pure red, bottom row: pure blue (display order)
        let top = [0x00, 0x7C, 0x00, 0x7C];
        let bottom = [0x1F, 0x00, 0x1F, 0x00];
        let data = bmp(2, 2, 16, &[], &[&top, &bottom]);
        let tex = decode_bmp(&data, ColorMode::Normal, None, &Unstoppable).unwrap();
        assert_eq!(tex.bitmap().unwrap(), &[0x801F, 0x801F, 0xFC00, 0xFC00]);
    }

    #[test]
    fn direct_rows_skip_padding() {
        // 3 pixels = 6 bytes, padded to 8
        let top = [0x00, 0x00, 0xE0, 0x03, 0x1F, 0x7C];
        let bottom = [0xFF, 0x7F, 0x00, 0x00, 0x00, 0x00];
        let data = bmp(3, 2, 16, &[], &[&top, &bottom]);
        let tex = decode_bmp(&data, ColorMode::Normal, None, &Unstoppable).unwrap();
        assert_eq!(
            tex.bitmap().unwrap(),
            &[0x8000, 0x83E0, 0x0000, 0xFFFF, 0x8000, 0x8000]
        );
    }

    #[test]
    fn indexed_nibbles_are_swapped() {
        let palette = [[0, 0, 0, 0], [0, 0, 255, 0], [255, 0, 0, 0]];
        let data = bmp(4, 1, 4, &palette, &[&[0xAB, 0x12]]);
        let tex = decode_bmp(&data, ColorMode::Normal, None, &Unstoppable).unwrap();
        assert_eq!(tex.indices().unwrap(), &[0xBA, 0x21]);
        assert_eq!(tex.palette().unwrap(), &[0x8000, 0x801F, 0xFC00]);
    }

    #[test]
    fn zero_palette_count_means_full_palette() {
        let mut data = bmp(2, 1, 4, &[[0x10, 0x20, 0x30, 0]; 16], &[&[0x00]]);
        // clear the stored count
        data[46..50].copy_from_slice(&0u32.to_le_bytes());
        let tex = decode_bmp(&data, ColorMode::Normal, None, &Unstoppable).unwrap();
        assert_eq!(tex.palette().unwrap().len(), 16);
    }

    #[test]
    fn unsupported_depths_and_layouts() {
        let data = bmp(1, 1, 24, &[], &[&[0, 0, 0]]);
        assert!(matches!(
            parse_header(&data),
            Err(TextureError::UnsupportedVariant(_))
        ));

        let data = bmp(3, 1, 4, &[[0; 4]; 2], &[&[0, 0]]);
        assert!(matches!(
            decode_bmp(&data, ColorMode::Normal, None, &Unstoppable),
            Err(TextureError::UnsupportedVariant(_))
        ));

        let mut data = bmp(2, 1, 16, &[], &[&[0; 4]]);
        data[22..26].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            parse_header(&data),
            Err(TextureError::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn oversized_palette_is_rejected() {
        let mut data = bmp(2, 1, 4, &[[0; 4]; 2], &[&[0]]);
        data[46..50].copy_from_slice(&300u32.to_le_bytes());
        assert!(matches!(
            decode_bmp(&data, ColorMode::Normal, None, &Unstoppable),
            Err(TextureError::InvalidHeader(_))
        ));
    }

    #[test]
    fn truncated_rows_are_rejected() {
        let mut data = bmp(2, 2, 16, &[], &[&[0; 4], &[0; 4]]);
        data.truncate(data.len() - 2);
        assert!(matches!(
            decode_bmp(&data, ColorMode::Normal, None, &Unstoppable),
            Err(TextureError::UnexpectedEof)
        ));
    }

    #[test]
    fn huge_dimensions_without_rows_are_rejected() {
        for depth in [16, 4] {
            let palette: &[[u8; 4]] = if depth == 4 { &[[0; 4]; 16] } else { &[] };
            let mut data = bmp(2, 1, depth, palette, &[&[0; 4]]);
            data[18..22].copy_from_slice(&0xFFFF_FFFEu32.to_le_bytes());
            data[22..26].copy_from_slice(&0x7FFF_FFFFu32.to_le_bytes());
            assert!(matches!(
                decode_bmp(&data, ColorMode::Normal, None, &Unstoppable),
                Err(TextureError::UnexpectedEof)
            ));
        }
    }

    #[test]
    fn last_row_needs_no_padding() {
        let mut data = bmp(1, 2, 16, &[], &[&[0x1F, 0x00], &[0x00, 0x7C]]);
        data.truncate(data.len() - 2);
        let tex = decode_bmp(&data, ColorMode::Normal, None, &Unstoppable).unwrap();
        assert_eq!(tex.bitmap().unwrap(), &[0xFC00, 0x801F]);
    }

    #[test]
    fn limits_apply_to_declared_size() {
        let data = bmp(2, 2, 16, &[], &[&[0; 4], &[0; 4]]);
        let limits = Limits {
            max_width: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            decode_bmp(&data, ColorMode::Normal, Some(&limits), &Unstoppable),
            Err(TextureError::LimitExceeded(_))
        ));
    }
}
