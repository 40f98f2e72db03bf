// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipelines
//!
//! The photo pipeline turns live stream frames into persisted gallery
//! records. Heavy work (filtering, encoding) runs on blocking tasks so the
//! async owner never stalls its executor.

pub mod photo;

pub use photo::{CaptureOutcome, CapturePipeline, PendingCapture, PipelineState};
