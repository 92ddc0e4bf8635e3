//! Software-side pixel providers.
//!
//! Asset decoding lives outside the runtime core; a decoder hands the core a
//! [`TextureSource`] and the texture pulls pixels from it on `load()`.

use std::io;

use crate::texture::{PixelData, PixelFormat};

/// Produces the software payload of a texture.
pub trait TextureSource {
    /// Width in pixels, known before loading.
    fn width(&self) -> u32;

    /// Height in pixels, known before loading.
    fn height(&self) -> u32;

    /// Pixel layout the source produces.
    fn format(&self) -> PixelFormat;

    /// Produces the pixels.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the pixels cannot be read or decoded.
    fn load(&mut self) -> io::Result<PixelData>;
}

/// A source backed by pixels already in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    pixels: PixelData,
}

impl MemorySource {
    /// Wraps decoded pixels.
    #[must_use]
    pub const fn new(pixels: PixelData) -> Self {
        Self { pixels }
    }

    /// Builds an RGBA8888 source from one `[r, g, b, a]` array per pixel.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] if `pixels.len()` is not
    /// `width * height`.
    pub fn from_rgba(width: u32, height: u32, pixels: &[[u8; 4]]) -> io::Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(pixels);
        PixelData::new(width, height, PixelFormat::Rgba8888, bytes.to_vec())
            .map(Self::new)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} pixels do not fill {width}x{height}", pixels.len()),
                )
            })
    }

    /// A `width` x `height` RGBA8888 source filled with one colour.
    #[must_use]
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::new(PixelData::filled(width, height, color))
    }
}

impl TextureSource for MemorySource {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn format(&self) -> PixelFormat {
        self.pixels.format()
    }

    fn load(&mut self) -> io::Result<PixelData> {
        Ok(self.pixels.clone())
    }
}
