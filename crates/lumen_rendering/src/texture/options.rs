//! Sampling options applied when a texture is uploaded.

use serde::{Deserialize, Serialize};

/// Minification / magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation.
    Linear,
}

/// Behaviour outside `[0, 1]` texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureWrap {
    /// Clamp to the edge texel.
    ClampToEdge,
    /// Tile the texture.
    Repeat,
}

/// Sampler state plus upload flags for one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureOptions {
    /// Filter when the texture is drawn smaller than its size.
    pub min_filter: TextureFilter,
    /// Filter when the texture is drawn larger than its size.
    pub mag_filter: TextureFilter,
    /// Horizontal wrap mode.
    pub wrap_s: TextureWrap,
    /// Vertical wrap mode.
    pub wrap_t: TextureWrap,
    /// Whether colour channels are premultiplied by alpha on upload.
    pub premultiply_alpha: bool,
}

impl TextureOptions {
    /// Nearest filtering, clamped.
    pub const NEAREST: Self = Self::new(TextureFilter::Nearest, TextureWrap::ClampToEdge);
    /// Bilinear filtering, clamped.
    pub const BILINEAR: Self = Self::new(TextureFilter::Linear, TextureWrap::ClampToEdge);
    /// Nearest filtering, tiled.
    pub const REPEATING_NEAREST: Self = Self::new(TextureFilter::Nearest, TextureWrap::Repeat);
    /// Bilinear filtering, tiled.
    pub const REPEATING_BILINEAR: Self = Self::new(TextureFilter::Linear, TextureWrap::Repeat);
    /// Default options.
    pub const DEFAULT: Self = Self::NEAREST;

    const fn new(filter: TextureFilter, wrap: TextureWrap) -> Self {
        Self {
            min_filter: filter,
            mag_filter: filter,
            wrap_s: wrap,
            wrap_t: wrap,
            premultiply_alpha: false,
        }
    }

    /// Returns a copy with premultiplied alpha enabled.
    #[must_use]
    pub const fn premultiplied(mut self) -> Self {
        self.premultiply_alpha = true;
        self
    }
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
