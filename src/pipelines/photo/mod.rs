// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture pipeline
//!
//! Owns the live frame source and turns frames into stored gallery images:
//!
//! ```text
//! Frame Source → Filter → JPEG encode → Name check → Gallery
//!                                           ↓ (conflict)
//!                                     Pending preview
//! ```
//!
//! # State machine
//!
//! `Idle → Streaming → (Previewing | Streaming)`. Stream acquisition stops
//! any previously held stream before binding a new one; on acquisition
//! failure the pipeline stays idle with no stream bound. A capture whose
//! name clears the uniqueness check commits straight to the gallery and the
//! pipeline stays streaming; a conflicting name parks the encoded frame as
//! a pending preview until `save` or `discard` resolves it.

pub mod encoding;
pub mod processing;

use crate::backends::camera::{FrameSource, V4l2Source};
use crate::config::CaptureSettings;
use crate::errors::{CameraError, CaptureError};
use crate::gallery::{GalleryStore, ImageRecord};
use crate::naming;
use tracing::{debug, info};

/// Pipeline lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No stream bound
    Idle,
    /// Live stream bound, ready to capture
    Streaming,
    /// Encoded frame held for preview after a name conflict
    Previewing,
}

/// An encoded frame waiting for the user to rename, save, or discard it
#[derive(Debug, Clone)]
pub struct PendingCapture {
    /// Encoded image payload (JPEG data URL)
    pub src: String,
    /// The trimmed name that failed validation
    pub requested_name: String,
}

/// Result of a capture or save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A new record was committed to the gallery
    Saved {
        id: String,
        name: String,
        /// True when the name was auto-generated from the timestamp; the
        /// caller resets its input field only in that case
        auto_named: bool,
    },
    /// The name is already taken; nothing was committed. After `capture`
    /// the encoded frame is held as a pending preview.
    NameConflict,
}

/// Capture pipeline bound to at most one live stream
#[derive(Default)]
pub struct CapturePipeline {
    source: Option<Box<dyn FrameSource>>,
    pending: Option<PendingCapture>,
}

impl CapturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        if self.pending.is_some() {
            PipelineState::Previewing
        } else if self.source.is_some() {
            PipelineState::Streaming
        } else {
            PipelineState::Idle
        }
    }

    /// The pending preview, if a capture is waiting to be resolved
    pub fn pending_preview(&self) -> Option<&PendingCapture> {
        self.pending.as_ref()
    }

    /// Acquire a stream for the selected device and resolution
    ///
    /// Any previously held stream is stopped first to release the hardware.
    /// The selection must already be resolved by the device registry; with
    /// no device selected there is nothing to bind.
    pub async fn start_stream(&mut self, settings: &CaptureSettings) -> Result<(), CameraError> {
        self.stop_stream();

        let device_id = settings
            .selected_device_id
            .clone()
            .ok_or(CameraError::NoCameraFound)?;
        let resolution = settings.resolution;

        let source = tokio::task::spawn_blocking(move || V4l2Source::open(&device_id, resolution))
            .await
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))??;

        self.bind_source(Box::new(source));
        Ok(())
    }

    /// Bind an already-open frame source, stopping any previous one
    pub fn bind_source(&mut self, source: Box<dyn FrameSource>) {
        self.stop_stream();
        debug!(device = %source.device_id(), "Stream bound");
        self.source = Some(source);
    }

    /// Stop and release the bound stream, if any
    pub fn stop_stream(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.stop();
        }
    }

    /// Capture the current frame and commit or park it
    ///
    /// Grabs the current frame, applies the configured filter, and encodes
    /// it to a JPEG data URL. If `name` (or its auto-generated replacement)
    /// clears the uniqueness check the record commits directly to the
    /// gallery; otherwise the encoded frame becomes the pending preview.
    pub async fn capture(
        &mut self,
        name: &str,
        settings: &CaptureSettings,
        store: &mut GalleryStore,
    ) -> Result<CaptureOutcome, CaptureError> {
        let source = self.source.as_mut().ok_or(CaptureError::NotStreaming)?;
        let frame = source.capture_frame()?;

        let filter = settings.filter;
        let quality = settings.quality_percent;

        let src = tokio::task::spawn_blocking(move || -> Result<String, CaptureError> {
            let rgb = processing::process(&frame, filter)?;
            let jpeg = encoding::encode_jpeg(&rgb, quality)?;
            Ok(encoding::to_data_url(&jpeg))
        })
        .await
        .map_err(|e| CaptureError::EncodingFailed(e.to_string()))??;

        if naming::validate(name, store) {
            Ok(commit(name, src, store))
        } else {
            debug!(name = %name.trim(), "Name already taken, holding preview");
            self.pending = Some(PendingCapture {
                src,
                requested_name: name.trim().to_string(),
            });
            Ok(CaptureOutcome::NameConflict)
        }
    }

    /// Save the pending preview under the given name
    ///
    /// Re-validates the name; a conflict leaves the preview pending so the
    /// caller can re-present the validation message.
    pub fn save(
        &mut self,
        name: &str,
        store: &mut GalleryStore,
    ) -> Result<CaptureOutcome, CaptureError> {
        let Some(pending) = self.pending.take() else {
            return Err(CaptureError::NoFrameAvailable);
        };

        if !naming::validate(name, store) {
            self.pending = Some(pending);
            return Ok(CaptureOutcome::NameConflict);
        }

        Ok(commit(name, pending.src, store))
    }

    /// Drop the pending preview without committing anything
    pub fn discard(&mut self) {
        if self.pending.take().is_some() {
            debug!("Pending capture discarded");
        }
    }
}

/// Resolve the final name and append the record to the gallery
fn commit(name: &str, src: String, store: &mut GalleryStore) -> CaptureOutcome {
    let (resolved, auto_named) = naming::resolve(name);
    let record = ImageRecord::new(resolved.clone(), src);
    let id = record.id.clone();

    info!(id = %id, name = %resolved, auto_named, "Image saved");
    store.add(record);

    CaptureOutcome::Saved {
        id,
        name: resolved,
        auto_named,
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        self.stop_stream();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::CameraFrame;
    use crate::config::Resolution;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct TestSource {
        frame: CameraFrame,
        stopped: Arc<AtomicBool>,
    }

    impl TestSource {
        fn boxed() -> Box<Self> {
            Self::with_flag(Arc::new(AtomicBool::new(false)))
        }

        fn with_flag(stopped: Arc<AtomicBool>) -> Box<Self> {
            Box::new(Self {
                frame: CameraFrame::from_rgba(2, 2, vec![200, 100, 0, 255].repeat(4)),
                stopped,
            })
        }
    }

    impl FrameSource for TestSource {
        fn device_id(&self) -> &str {
            "/dev/test"
        }

        fn resolution(&self) -> Resolution {
            Resolution::new(self.frame.width, self.frame.height)
        }

        fn capture_frame(&mut self) -> Result<CameraFrame, CaptureError> {
            Ok(self.frame.clone())
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    fn empty_store() -> GalleryStore {
        let dir = tempfile::tempdir().unwrap();
        GalleryStore::load(dir.path().join("gallery.json"))
    }

    fn streaming_pipeline() -> CapturePipeline {
        let mut pipeline = CapturePipeline::new();
        pipeline.bind_source(TestSource::boxed());
        pipeline
    }

    #[tokio::test]
    async fn test_capture_with_unique_name_commits_directly() {
        let mut pipeline = streaming_pipeline();
        let mut store = empty_store();
        let settings = CaptureSettings::default();

        let outcome = pipeline
            .capture("holiday", &settings, &mut store)
            .await
            .unwrap();

        match outcome {
            CaptureOutcome::Saved {
                name, auto_named, ..
            } => {
                assert_eq!(name, "holiday");
                assert!(!auto_named);
            }
            other => panic!("expected Saved, got {:?}", other),
        }
        assert_eq!(store.images().len(), 1);
        assert!(store.images()[0].src.starts_with("data:image/jpeg;base64,"));
        assert_eq!(pipeline.state(), PipelineState::Streaming);
    }

    #[tokio::test]
    async fn test_capture_with_empty_name_auto_names() {
        let mut pipeline = streaming_pipeline();
        let mut store = empty_store();
        let settings = CaptureSettings::default();

        let outcome = pipeline.capture("   ", &settings, &mut store).await.unwrap();

        match outcome {
            CaptureOutcome::Saved {
                name, auto_named, ..
            } => {
                assert!(name.starts_with("image_"));
                assert!(!name.contains(':'));
                assert!(auto_named);
            }
            other => panic!("expected Saved, got {:?}", other),
        }
        assert_eq!(pipeline.state(), PipelineState::Streaming);
    }

    #[tokio::test]
    async fn test_capture_with_taken_name_parks_preview() {
        let mut pipeline = streaming_pipeline();
        let mut store = empty_store();
        let settings = CaptureSettings::default();

        pipeline
            .capture("holiday", &settings, &mut store)
            .await
            .unwrap();
        let outcome = pipeline
            .capture("HOLIDAY", &settings, &mut store)
            .await
            .unwrap();

        assert_eq!(outcome, CaptureOutcome::NameConflict);
        assert_eq!(pipeline.state(), PipelineState::Previewing);
        assert_eq!(store.images().len(), 1);
        assert_eq!(
            pipeline.pending_preview().unwrap().requested_name,
            "HOLIDAY"
        );
    }

    #[tokio::test]
    async fn test_save_revalidates_and_commits() {
        let mut pipeline = streaming_pipeline();
        let mut store = empty_store();
        let settings = CaptureSettings::default();

        pipeline
            .capture("holiday", &settings, &mut store)
            .await
            .unwrap();
        pipeline
            .capture("holiday", &settings, &mut store)
            .await
            .unwrap();

        // Still conflicting: preview stays pending
        let outcome = pipeline.save("holiday", &mut store).unwrap();
        assert_eq!(outcome, CaptureOutcome::NameConflict);
        assert_eq!(pipeline.state(), PipelineState::Previewing);

        // Renamed: commits and returns to streaming
        let outcome = pipeline.save("holiday 2", &mut store).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Saved { .. }));
        assert_eq!(pipeline.state(), PipelineState::Streaming);
        assert_eq!(store.images().len(), 2);
        assert_eq!(store.images()[0].name, "holiday 2");
    }

    #[tokio::test]
    async fn test_discard_drops_preview_without_store_mutation() {
        let mut pipeline = streaming_pipeline();
        let mut store = empty_store();
        let settings = CaptureSettings::default();

        pipeline
            .capture("holiday", &settings, &mut store)
            .await
            .unwrap();
        pipeline
            .capture("holiday", &settings, &mut store)
            .await
            .unwrap();

        pipeline.discard();
        assert_eq!(pipeline.state(), PipelineState::Streaming);
        assert_eq!(store.images().len(), 1);
    }

    #[tokio::test]
    async fn test_capture_without_stream_fails() {
        let mut pipeline = CapturePipeline::new();
        let mut store = empty_store();
        let settings = CaptureSettings::default();

        let err = pipeline
            .capture("holiday", &settings, &mut store)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::NotStreaming));
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn test_new_records_order_most_recent_first() {
        let mut pipeline = streaming_pipeline();
        let mut store = empty_store();
        let settings = CaptureSettings::default();

        pipeline.capture("first", &settings, &mut store).await.unwrap();
        pipeline.capture("second", &settings, &mut store).await.unwrap();

        let images = store.images();
        assert_eq!(images[0].name, "second");
        assert_eq!(images[1].name, "first");
        assert!(images[0].timestamp >= images[1].timestamp);
    }

    #[test]
    fn test_bind_source_stops_previous_stream() {
        let stopped = Arc::new(AtomicBool::new(false));

        let mut pipeline = CapturePipeline::new();
        pipeline.bind_source(TestSource::with_flag(Arc::clone(&stopped)));
        pipeline.bind_source(TestSource::boxed());

        assert!(stopped.load(Ordering::SeqCst));
        assert_eq!(pipeline.state(), PipelineState::Streaming);

        pipeline.stop_stream();
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }
}
