// SPDX-License-Identifier: GPL-3.0-only

//! Webcam capture and gallery application
//!
//! This library provides the core functionality for the webcam-gallery
//! application: camera device discovery, still-photo capture with optional
//! filtering, and a durable gallery of captured images.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: Camera device enumeration, registry, and V4L2 frame source
//! - [`pipelines`]: Photo capture pipeline (filter, encode, commit)
//! - [`gallery`]: Persisted image store
//! - [`naming`]: Name validation and auto-naming
//! - [`config`]: Capture settings handling
//! - [`export`]: Data-URL decoding and file export

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod export;
pub mod gallery;
pub mod naming;
pub mod pipelines;

// Re-export commonly used types
pub use backends::camera::{CameraDevice, CameraFrame, DeviceRegistry, FrameSource};
pub use config::{CaptureSettings, FilterType, Resolution, SettingsUpdate};
pub use errors::{AppError, AppResult, CameraError, CaptureError, StorageError};
pub use gallery::{GalleryStore, ImageRecord};
pub use pipelines::photo::{CaptureOutcome, CapturePipeline, PipelineState};
