//! Pixel formats and software-side pixel payloads.

use serde::{Deserialize, Serialize};

/// Layout of one pixel in device memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// No pixels (placeholder textures).
    #[default]
    Undefined,
    /// 4 bits per channel RGBA.
    Rgba4444,
    /// 5 bits per colour channel, 1 alpha bit.
    Rgba5551,
    /// 8 bits per channel RGBA.
    Rgba8888,
    /// 5/6/5 bits RGB, no alpha.
    Rgb565,
    /// 8-bit alpha only.
    A8,
    /// 8-bit luminance.
    I8,
    /// 8-bit luminance plus 8-bit alpha.
    Ai88,
}

impl PixelFormat {
    /// Bits one pixel occupies.
    #[must_use]
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Undefined => 0,
            Self::A8 | Self::I8 => 8,
            Self::Rgba4444 | Self::Rgba5551 | Self::Rgb565 | Self::Ai88 => 16,
            Self::Rgba8888 => 32,
        }
    }

    /// Bytes needed for a `width` x `height` image.
    #[must_use]
    pub const fn byte_size(self, width: u32, height: u32) -> usize {
        (width as usize) * (height as usize) * (self.bits_per_pixel() as usize) / 8
    }
}

/// Decoded pixels living in process memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelData {
    width: u32,
    height: u32,
    format: PixelFormat,
    bytes: Vec<u8>,
}

impl PixelData {
    /// Wraps raw bytes. Returns `None` if the length does not match the
    /// dimensions and format.
    #[must_use]
    pub fn new(width: u32, height: u32, format: PixelFormat, bytes: Vec<u8>) -> Option<Self> {
        (bytes.len() == format.byte_size(width, height)).then_some(Self {
            width,
            height,
            format,
            bytes,
        })
    }

    /// An RGBA8888 image where every pixel is `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = vec![color; (width as usize) * (height as usize)];
        Self {
            width,
            height,
            format: PixelFormat::Rgba8888,
            bytes: bytemuck::cast_slice(&pixels).to_vec(),
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout.
    #[inline]
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel bytes, row-major.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the payload in bytes.
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_per_pixel() {
        assert_eq!(PixelFormat::Undefined.bits_per_pixel(), 0);
        assert_eq!(PixelFormat::A8.bits_per_pixel(), 8);
        assert_eq!(PixelFormat::Rgb565.bits_per_pixel(), 16);
        assert_eq!(PixelFormat::Rgba8888.bits_per_pixel(), 32);
    }

    #[test]
    fn test_byte_size() {
        assert_eq!(PixelFormat::Rgba8888.byte_size(4, 4), 64);
        assert_eq!(PixelFormat::Rgba4444.byte_size(3, 2), 12);
        assert_eq!(PixelFormat::Undefined.byte_size(100, 100), 0);
    }

    #[test]
    fn test_filled() {
        let data = PixelData::filled(2, 3, [1, 2, 3, 4]);
        assert_eq!(data.byte_len(), 24);
        assert_eq!(&data.bytes()[..8], &[1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_pixel_data_length_checked() {
        assert!(PixelData::new(2, 2, PixelFormat::Rgba8888, vec![0; 16]).is_some());
        assert!(PixelData::new(2, 2, PixelFormat::Rgba8888, vec![0; 15]).is_none());
    }
}
