//! # Texture Resources
//!
//! Textures whose pixels live in process memory and, on request, on the
//! graphics device.
//!
//! ## Lifecycle
//!
//! ```text
//! ┌──────────┐  load()  ┌────────────────┐  load_to_hardware()  ┌────────────────┐
//! │ Unloaded │ ───────> │ SoftwareLoaded │ ───────────────────> │ HardwareLoaded │ ──> bind()
//! └──────────┘          └────────────────┘ <─────────────────── └────────────────┘
//!                                           unload_from_hardware()
//! ```
//!
//! - `bind()` on anything but `HardwareLoaded` is a contract violation.
//! - A failed upload leaves the texture `SoftwareLoaded`; retry later.
//! - [`BlankTexture`] stands in where no real texture exists yet.

mod bitmap;
mod blank;
mod device;
mod format;
mod manager;
mod options;
mod resource;
mod source;
mod state;

pub use bitmap::Texture;
pub use blank::BlankTexture;
pub use device::{DeviceStats, GraphicsDevice, HardwareTextureId, HeadlessDevice, TextureUnit};
pub use format::{PixelData, PixelFormat};
pub use manager::{TextureManager, TextureUpdateReport};
pub use options::{TextureFilter, TextureOptions, TextureWrap};
pub use resource::HardwareTexture;
pub use source::{MemorySource, TextureSource};
pub use state::{LoggingTextureStateListener, TextureId, TextureState, TextureStateListener};
