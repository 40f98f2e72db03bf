// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the webcam gallery application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture errors
    Capture(CaptureError),
    /// Storage/filesystem errors
    Storage(StorageError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Camera access and device errors
///
/// Each variant is a distinct user-facing condition. Stream acquisition
/// reports exactly one of these and leaves the pipeline idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The selected device has no video capture capability
    CaptureUnsupported,
    /// Capture access is blocked at the platform level (device node unreadable)
    AccessBlocked,
    /// Capture access was denied when requested
    AccessDenied,
    /// No camera device matched the selection
    NoCameraFound,
    /// The requested capture constraints cannot be satisfied
    Overconstrained,
    /// Camera disconnected or stopped delivering frames
    Disconnected,
    /// Device initialization failed
    InitializationFailed(String),
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// No live stream is bound, so there is no frame to capture
    NotStreaming,
    /// No frame available for capture
    NoFrameAvailable,
    /// Frame processing failed
    ProcessingFailed(String),
    /// Encoding failed
    EncodingFailed(String),
}

/// Persistence errors against durable storage
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Read failed
    ReadFailed(String),
    /// Write failed
    WriteFailed(String),
    /// Stored payload could not be parsed
    MalformedPayload(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::CaptureUnsupported => {
                write!(f, "This device does not support video capture")
            }
            CameraError::AccessBlocked => {
                write!(f, "Camera access is blocked; check device permissions")
            }
            CameraError::AccessDenied => write!(f, "Camera access was denied"),
            CameraError::NoCameraFound => write!(f, "No camera found"),
            CameraError::Overconstrained => {
                write!(f, "The requested camera settings are not supported")
            }
            CameraError::Disconnected => write!(f, "Camera disconnected"),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NotStreaming => write!(f, "No live stream is active"),
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadFailed(msg) => write!(f, "Read failed: {}", msg),
            StorageError::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
            StorageError::MalformedPayload(msg) => write!(f, "Malformed payload: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for StorageError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::from(err))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::WriteFailed(err.to_string())
    }
}
