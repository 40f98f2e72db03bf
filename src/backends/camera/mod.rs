// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend
//!
//! Device enumeration, the device registry, and the live V4L2 frame source.
//! The photo pipeline consumes frames through the [`FrameSource`] trait so
//! tests can bind a synthetic source instead of hardware.

pub mod enumeration;
pub mod format_converters;
pub mod registry;
pub mod stream;
pub mod types;

pub use registry::DeviceRegistry;
pub use stream::V4l2Source;
pub use types::{CameraDevice, CameraFrame};

use crate::config::Resolution;
use crate::errors::CaptureError;

/// A live, revocable source of capture frames
///
/// Implementations own the underlying hardware stream. Frames are RGBA and
/// sized to the stream's native dimensions.
pub trait FrameSource: Send {
    /// Identifier of the device this source is bound to
    fn device_id(&self) -> &str;

    /// Resolution actually delivered by the stream
    fn resolution(&self) -> Resolution;

    /// Grab the most recent frame
    fn capture_frame(&mut self) -> Result<CameraFrame, CaptureError>;

    /// Release the stream and the camera hardware
    ///
    /// Must be called (or the source dropped) before another source is
    /// opened on the same device.
    fn stop(&mut self);
}
