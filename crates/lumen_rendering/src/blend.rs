//! Colour-keyed blend state.
//!
//! [`AvoidBlend`] decides per destination pixel whether a draw lands, based
//! on how close the pixel already is to an operation colour.

use serde::{Deserialize, Serialize};

use crate::error::BlendError;

/// How the operation colour gates drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvoidMode {
    /// Draw everywhere except on pixels near the operation colour.
    Avoid,
    /// Draw only on pixels near the operation colour.
    Target,
}

/// Blend state keyed on an RGBA operation colour and a tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvoidBlend {
    op_color: [u8; 4],
    tolerance: u8,
    mode: AvoidMode,
}

impl AvoidBlend {
    /// Largest accepted tolerance.
    pub const MAX_TOLERANCE: i32 = 255;

    /// Creates the blend state.
    ///
    /// # Errors
    ///
    /// Returns [`BlendError::ToleranceOutOfRange`] unless
    /// `0 <= tolerance <= 255`.
    pub fn new(op_color: [u8; 4], tolerance: i32, mode: AvoidMode) -> Result<Self, BlendError> {
        let Ok(tolerance) = u8::try_from(tolerance) else {
            tracing::warn!(tolerance, "avoid blend tolerance out of range");
            return Err(BlendError::ToleranceOutOfRange(tolerance));
        };
        Ok(Self {
            op_color,
            tolerance,
            mode,
        })
    }

    /// The operation colour.
    #[must_use]
    pub const fn op_color(&self) -> [u8; 4] {
        self.op_color
    }

    /// The tolerance, `0..=255`.
    #[must_use]
    pub const fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// The gating mode.
    #[must_use]
    pub const fn mode(&self) -> AvoidMode {
        self.mode
    }

    /// Largest per-channel RGB difference between `dst` and the operation
    /// colour. Alpha is ignored.
    #[must_use]
    pub fn distance(&self, dst: [u8; 4]) -> u8 {
        dst.iter()
            .zip(self.op_color.iter())
            .take(3)
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .unwrap_or(0)
    }

    /// Checks whether a draw over `dst` lands.
    #[must_use]
    pub fn should_draw(&self, dst: [u8; 4]) -> bool {
        let near = self.distance(dst) <= self.tolerance;
        match self.mode {
            AvoidMode::Target => near,
            AvoidMode::Avoid => !near,
        }
    }
}
