use crate::error::TextureError;
use crate::grf::GrfAttributes;

/// Number of bytes inspected when sniffing a texture.
pub const SNIFF_LEN: usize = 48;

const PNG_MAGIC: [u8; 4] = *b"\x89PNG";

/// Texture container variant, detected from the first [`SNIFF_LEN`] bytes.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Not recognized, or a recognized container with an unsupported sub-variant.
    #[default]
    Unknown,
    /// BMP, 4 bits per pixel with a palette.
    PalettedBmp,
    /// BMP, 16 bits per pixel (X1R5G5B5).
    Bmp,
    /// PNG, thresholded to fully opaque pixels.
    Png,
    /// GRF with raw 4-bit indices and a native palette.
    PalettedGrf,
    /// GRF with an LZ77-compressed native bitmap.
    CompressedGrf,
}

impl TextureKind {
    /// Sniff the container type.
    ///
    /// Inputs shorter than [`SNIFF_LEN`] are treated as zero-padded.
    pub fn sniff(data: &[u8]) -> Self {
        let mut prefix = [0u8; SNIFF_LEN];
        let n = data.len().min(SNIFF_LEN);
        prefix[..n].copy_from_slice(&data[..n]);

        let word = |i: usize| -> [u8; 4] {
            let mut w = [0u8; 4];
            w.copy_from_slice(&prefix[i * 4..i * 4 + 4]);
            w
        };

        if &prefix[0..2] == b"BM" {
            // Only 4 and 16 bit bitmaps are supported.
            return match u16::from_le_bytes([prefix[28], prefix[29]]) {
                4 => Self::PalettedBmp,
                16 => Self::Bmp,
                _ => Self::Unknown,
            };
        }

        if word(0) == PNG_MAGIC {
            return Self::Png;
        }

        if &word(0) == b"RIFF"
            && &word(2) == b"GRF "
            && &word(3) == b"HDR "
            && &word(9) == b"GFX "
        {
            return match prefix[44] & 0xF0 {
                0x00 => Self::PalettedGrf,
                0x10 => Self::CompressedGrf,
                _ => Self::Unknown,
            };
        }

        Self::Unknown
    }

    /// Whether textures of this kind carry a palette.
    pub fn has_palette(self) -> bool {
        matches!(self, Self::PalettedBmp | Self::PalettedGrf)
    }

    /// Whether textures of this kind own a direct native bitmap.
    pub fn has_bitmap(self) -> bool {
        matches!(self, Self::Bmp | Self::Png)
    }

    /// Whether the pixel payload stays compressed until copied.
    pub fn is_compressed(self) -> bool {
        matches!(self, Self::CompressedGrf)
    }
}

/// Texture metadata obtained without decoding the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureInfo {
    pub kind: TextureKind,
    pub width: u32,
    pub height: u32,
    /// `HDR ` chunk attributes, for GRF containers.
    pub grf: Option<GrfAttributes>,
}

impl TextureInfo {
    /// Probe kind and declared dimensions.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TextureError> {
        let kind = TextureKind::sniff(data);
        let mut grf = None;
        let (width, height) = match kind {
            TextureKind::Unknown => return Err(TextureError::UnrecognizedFormat),
            TextureKind::PalettedBmp | TextureKind::Bmp => {
                let header = crate::bmp::parse_header(data)?;
                (header.width, header.height)
            }
            TextureKind::Png => crate::png::probe(data)?,
            TextureKind::PalettedGrf | TextureKind::CompressedGrf => {
                let header = crate::grf::parse_header(data)?;
                grf = Some(header.attributes);
                (header.width, header.height)
            }
        };
        Ok(Self {
            kind,
            width,
            height,
            grf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grf_prefix(type_byte: u8) -> Vec<u8> {
        let mut d = vec![0u8; 48];
        d[0..4].copy_from_slice(b"RIFF");
        d[8..12].copy_from_slice(b"GRF ");
        d[12..16].copy_from_slice(b"HDR ");
        d[36..40].copy_from_slice(b"GFX ");
        d[44] = type_byte;
        d
    }

    #[test]
    fn bmp_depths() {
        let mut d = vec![0u8; 48];
        d[0..2].copy_from_slice(b"BM");
        d[28] = 4;
        assert_eq!(TextureKind::sniff(&d), TextureKind::PalettedBmp);
        d[28] = 16;
        assert_eq!(TextureKind::sniff(&d), TextureKind::Bmp);
        d[28] = 24;
        assert_eq!(TextureKind::sniff(&d), TextureKind::Unknown);
        d[28] = 8;
        assert_eq!(TextureKind::sniff(&d), TextureKind::Unknown);
    }

    #[test]
    fn png_signature() {
        let d = b"\x89PNG\r\n\x1a\n";
        assert_eq!(TextureKind::sniff(d), TextureKind::Png);
    }

    #[test]
    fn grf_sub_type_nibble() {
        assert_eq!(TextureKind::sniff(&grf_prefix(0x00)), TextureKind::PalettedGrf);
        assert_eq!(TextureKind::sniff(&grf_prefix(0x10)), TextureKind::CompressedGrf);
        // low nibble is ignored
        assert_eq!(TextureKind::sniff(&grf_prefix(0x13)), TextureKind::CompressedGrf);
        assert_eq!(TextureKind::sniff(&grf_prefix(0x20)), TextureKind::Unknown);
        assert_eq!(TextureKind::sniff(&grf_prefix(0x40)), TextureKind::Unknown);
    }

    #[test]
    fn grf_requires_every_tag() {
        let mut d = grf_prefix(0x10);
        d[36..40].copy_from_slice(b"MAP ");
        assert_eq!(TextureKind::sniff(&d), TextureKind::Unknown);
    }

    #[test]
    fn short_and_empty_inputs() {
        assert_eq!(TextureKind::sniff(&[]), TextureKind::Unknown);
        // 'BM' with the depth field past the end reads as depth 0
        assert_eq!(TextureKind::sniff(b"BM"), TextureKind::Unknown);
    }

    #[test]
    fn kind_capabilities() {
        assert!(TextureKind::PalettedBmp.has_palette());
        assert!(TextureKind::PalettedGrf.has_palette());
        assert!(TextureKind::Png.has_bitmap());
        assert!(TextureKind::Bmp.has_bitmap());
        assert!(TextureKind::CompressedGrf.is_compressed());
        assert!(!TextureKind::Unknown.has_palette());
        assert!(!TextureKind::Unknown.has_bitmap());
        assert!(!TextureKind::CompressedGrf.has_bitmap());
    }

    #[test]
    fn probe_unknown_errors() {
        assert!(matches!(
            TextureInfo::from_bytes(b"GIF89a"),
            Err(TextureError::UnrecognizedFormat)
        ));
    }
}
