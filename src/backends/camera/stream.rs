// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 frame source
//!
//! Owns the live capture stream for one device. A dedicated thread drives
//! the mmap stream and keeps only the most recent raw buffer; the photo
//! pipeline pulls and converts a frame on capture request.
//!
//! The stream must be stopped explicitly (or dropped) before another source
//! is opened - a leaked stream keeps the camera hardware locked.

use super::FrameSource;
use super::format_converters::{mjpg_to_rgba, rgb24_to_rgba, yuyv_to_rgba};
use super::types::CameraFrame;
use crate::config::Resolution;
use crate::constants::{FIRST_FRAME_POLL_INTERVAL, FIRST_FRAME_TIMEOUT, STREAM_BUFFER_COUNT};
use crate::errors::{CameraError, CaptureError};
use std::os::unix::fs::PermissionsExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;

/// Pixel formats the source can negotiate, in preference order
const SUPPORTED_FOURCCS: [&[u8; 4]; 3] = [b"YUYV", b"MJPG", b"RGB3"];

/// Live V4L2 capture stream bound to a single device
pub struct V4l2Source {
    device_id: String,
    /// Resolution actually applied by the driver
    resolution: Resolution,
    fourcc: FourCC,
    latest: Arc<Mutex<Option<Vec<u8>>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl V4l2Source {
    /// Acquire a stream on the given device
    ///
    /// Negotiates the requested resolution as an ideal - the driver may
    /// substitute the nearest supported mode, which is not verified. Blocks
    /// until the first frame arrives so a successful open always has a frame
    /// ready for capture.
    ///
    /// # Arguments
    /// * `device_id` - V4L2 device path (e.g. /dev/video0)
    /// * `requested` - Ideal capture resolution
    pub fn open(device_id: &str, requested: Resolution) -> Result<Self, CameraError> {
        let metadata = match std::fs::metadata(device_id) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CameraError::NoCameraFound);
            }
            Err(err) => return Err(CameraError::InitializationFailed(err.to_string())),
        };

        // Node readable by nobody: access is blocked at the platform level,
        // as opposed to denied for this user at open time below.
        if metadata.permissions().mode() & 0o444 == 0 {
            return Err(CameraError::AccessBlocked);
        }

        let device = match v4l::Device::with_path(device_id) {
            Ok(device) => device,
            Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(CameraError::AccessDenied);
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CameraError::NoCameraFound);
            }
            Err(err) => return Err(CameraError::InitializationFailed(err.to_string())),
        };

        let caps = device
            .query_caps()
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;
        if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
            return Err(CameraError::CaptureUnsupported);
        }

        let format = negotiate_format(&device, requested)?;
        let resolution = Resolution::new(format.width, format.height);
        let fourcc = format.fourcc;

        info!(
            device = %device_id,
            resolution = %resolution,
            fourcc = %fourcc,
            "Acquired capture stream"
        );

        let latest: Arc<Mutex<Option<Vec<u8>>>> = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_latest = Arc::clone(&latest);
        let thread_stop = Arc::clone(&stop);
        let thread_device_id = device_id.to_string();

        let handle = std::thread::Builder::new()
            .name("camera-stream".to_string())
            .spawn(move || {
                let mut stream =
                    match MmapStream::with_buffers(&device, Type::VideoCapture, STREAM_BUFFER_COUNT)
                    {
                        Ok(stream) => stream,
                        Err(err) => {
                            error!(device = %thread_device_id, error = %err, "Failed to start capture stream");
                            return;
                        }
                    };

                debug!(device = %thread_device_id, "Capture thread started");

                while !thread_stop.load(Ordering::SeqCst) {
                    match stream.next() {
                        Ok((buffer, meta)) => {
                            let used = meta.bytesused as usize;
                            let len = if used == 0 {
                                buffer.len()
                            } else {
                                used.min(buffer.len())
                            };
                            *thread_latest.lock().unwrap() = Some(buffer[..len].to_vec());
                        }
                        Err(err) => {
                            warn!(device = %thread_device_id, error = %err, "Capture stream ended");
                            break;
                        }
                    }
                }

                debug!(device = %thread_device_id, "Capture thread exiting");
            })
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;

        let mut source = Self {
            device_id: device_id.to_string(),
            resolution,
            fourcc,
            latest,
            stop,
            handle: Some(handle),
        };

        source.wait_for_first_frame()?;
        Ok(source)
    }

    /// Block until the capture thread has delivered a frame
    fn wait_for_first_frame(&mut self) -> Result<(), CameraError> {
        let start = Instant::now();
        while start.elapsed() < FIRST_FRAME_TIMEOUT {
            if self.latest.lock().unwrap().is_some() {
                return Ok(());
            }
            if self
                .handle
                .as_ref()
                .map(|h| h.is_finished())
                .unwrap_or(true)
            {
                break;
            }
            std::thread::sleep(FIRST_FRAME_POLL_INTERVAL);
        }

        self.stop();
        Err(CameraError::InitializationFailed(
            "camera delivered no frames".to_string(),
        ))
    }
}

fn negotiate_format(
    device: &v4l::Device,
    requested: Resolution,
) -> Result<v4l::Format, CameraError> {
    for fourcc in SUPPORTED_FOURCCS {
        let wanted = v4l::Format::new(requested.width, requested.height, FourCC::new(fourcc));
        match device.set_format(&wanted) {
            Ok(applied) if applied.fourcc == wanted.fourcc => return Ok(applied),
            Ok(applied) => {
                debug!(
                    requested = %wanted.fourcc,
                    applied = %applied.fourcc,
                    "Driver substituted pixel format, trying next"
                );
            }
            Err(err) => {
                debug!(fourcc = %wanted.fourcc, error = %err, "Format rejected");
            }
        }
    }

    Err(CameraError::Overconstrained)
}

impl FrameSource for V4l2Source {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn capture_frame(&mut self) -> Result<CameraFrame, CaptureError> {
        let raw = self
            .latest
            .lock()
            .unwrap()
            .clone()
            .ok_or(CaptureError::NoFrameAvailable)?;

        let (width, height) = (self.resolution.width, self.resolution.height);
        match &self.fourcc.repr {
            b"YUYV" => Ok(CameraFrame::from_rgba(
                width,
                height,
                yuyv_to_rgba(&raw, width, height),
            )),
            b"RGB3" => Ok(CameraFrame::from_rgba(
                width,
                height,
                rgb24_to_rgba(&raw, width, height),
            )),
            b"MJPG" => {
                let (width, height, rgba) = mjpg_to_rgba(&raw)?;
                Ok(CameraFrame::from_rgba(width, height, rgba))
            }
            other => Err(CaptureError::ProcessingFailed(format!(
                "unsupported pixel format {:?}",
                other
            ))),
        }
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(device = %self.device_id, "Capture thread panicked");
            }
            info!(device = %self.device_id, "Capture stream released");
        }
    }
}

impl Drop for V4l2Source {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}
