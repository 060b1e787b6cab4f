//! Error types for the conversion queue.
//!
//! Provides a single error enum using `thiserror`; it is serializable so the
//! desktop command layer can hand it to the webview unchanged.

use std::io;
use thiserror::Error;
use serde::Serialize;

use crate::core::{ImageId, ImageStatus};

/// Main error type for the queue, the bridges and the conversion service.
#[derive(Error, Debug, Serialize)]
pub enum ConverterError {
    /// Settings or input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Image decoding or encoding failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Unsupported or invalid image format
    #[error("Format error: {0}")]
    Format(String),

    /// A record with the same source path is already queued
    #[error("Duplicate source: {0}")]
    DuplicateSource(String),

    /// No record with this id exists in the store
    #[error("Unknown image: {0}")]
    UnknownImage(ImageId),

    /// The requested status change is not part of the record lifecycle
    #[error("Invalid transition for {id}: {from:?} -> {to:?}")]
    InvalidTransition {
        id: ImageId,
        from: ImageStatus,
        to: ImageStatus,
    },

    /// The drag-and-drop subscription could not be armed
    #[error("Drop bridge setup failed: {0}")]
    BridgeSetup(String),

    /// The file picker failed
    #[error("File picker error: {0}")]
    Picker(String),
}

/// Convenience result type for queue operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

// Helper methods for error creation
impl ConverterError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }

    pub fn bridge_setup<T: Into<String>>(msg: T) -> Self {
        Self::BridgeSetup(msg.into())
    }

    pub fn picker<T: Into<String>>(msg: T) -> Self {
        Self::Picker(msg.into())
    }
}

// Convert std::io::Error to ConverterError
impl From<io::Error> for ConverterError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_message() {
        let err: ConverterError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ConverterError::IO(ref msg) if msg == "gone"));
        assert_eq!(err.to_string(), "IO error: gone");
    }

    #[test]
    fn errors_serialize_with_variant_tag() {
        let err = ConverterError::DuplicateSource("/tmp/a.png".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["DuplicateSource"], "/tmp/a.png");
    }
}
