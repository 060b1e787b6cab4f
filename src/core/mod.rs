//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`ImageRecord`]: One queued image and its lifecycle state
//! - [`NamingOptions`]: Output naming policy
//! - [`ConversionSettings`]: Quality and naming for a run
//! - [`Progress`] and [`QueueEvent`]: Notifications for observers
//! - [`AppState`]: Application-lifetime wiring of queue and drop bridge

mod naming;
mod progress;
mod settings;
mod state;
mod types;

pub use naming::{NamingOptions, NamingScheme, DEFAULT_PATTERN, DEFAULT_SUFFIX};
pub use progress::{Progress, ProgressType, QueueEvent, RunOutcome, RunSummary};
pub use settings::{ConversionSettings, DEFAULT_QUALITY};
pub use state::AppState;
pub use types::{ImageId, ImageRecord, ImageStatus, ImageView, RecordPatch, RunId};
