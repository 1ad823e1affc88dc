use std::ffi::OsString;
use std::path::{Path, PathBuf};

use enough::Unstoppable;

use crate::color::ColorMode;
use crate::decode::DecodeRequest;
use crate::error::TextureError;
use crate::limits::Limits;
use crate::texture::Texture;

/// Extensions tried, in order, after the path stem.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".png", ".bmp", ".grf"];

/// Load a texture from `stem` plus the first extension that decodes.
///
/// Loading never fails. Candidates that are missing, unrecognized or
/// malformed are skipped; when none decodes the fallback path is loaded,
/// and if that fails too the texture is [`crate::TextureKind::Unknown`].
#[derive(Clone, Debug)]
pub struct TextureRequest<'a> {
    stem: PathBuf,
    fallback: Option<PathBuf>,
    extensions: &'a [&'a str],
    color_mode: ColorMode,
    limits: Option<&'a Limits>,
}

impl<'a> TextureRequest<'a> {
    pub fn new(stem: impl Into<PathBuf>) -> Self {
        Self {
            stem: stem.into(),
            fallback: None,
            extensions: DEFAULT_EXTENSIONS,
            color_mode: ColorMode::default(),
            limits: None,
        }
    }

    /// File loaded when no candidate decodes.
    pub fn fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback = Some(path.into());
        self
    }

    /// Replace [`DEFAULT_EXTENSIONS`].
    pub fn extensions(mut self, extensions: &'a [&'a str]) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Candidate paths in probing order.
    pub fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.extensions.iter().map(|ext| {
            let mut path = OsString::from(self.stem.as_os_str());
            path.push(ext);
            PathBuf::from(path)
        })
    }

    pub fn load(&self) -> Texture {
        for path in self.candidates() {
            log::trace!("probing {}", path.display());
            match self.load_file(&path) {
                Ok(texture) => return texture,
                Err(TextureError::Io(_)) => {}
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
        }

        let Some(fallback) = &self.fallback else {
            log::warn!("no texture found for {}", self.stem.display());
            return Texture::unknown();
        };
        log::debug!("using fallback {}", fallback.display());
        self.load_file(fallback).unwrap_or_else(|e| {
            log::warn!("fallback {} failed: {e}", fallback.display());
            Texture::unknown()
        })
    }

    fn load_file(&self, path: &Path) -> Result<Texture, TextureError> {
        let data = std::fs::read(path)?;
        let mut request = DecodeRequest::new(&data).color_mode(self.color_mode);
        if let Some(limits) = self.limits {
            request = request.limits(limits);
        }
        request.decode(Unstoppable)
    }
}
