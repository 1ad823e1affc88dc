use enough::StopReason;

/// Errors from texture sniffing, decoding and copying.
///
/// Loading a texture through [`crate::TextureRequest::load`] never surfaces
/// these; they collapse into an inert [`crate::TextureKind::Unknown`] texture.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TextureError {
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("buffer too small: need {needed} cells, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("png decode failed: {0}")]
    Png(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for TextureError {
    fn from(r: StopReason) -> Self {
        TextureError::Cancelled(r)
    }
}

impl From<::png::DecodingError> for TextureError {
    fn from(e: ::png::DecodingError) -> Self {
        TextureError::Png(e.to_string())
    }
}
