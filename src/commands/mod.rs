//! Tauri integration for the desktop shell.
//!
//! [`init`] returns a plugin that manages an [`AppState`], arms the drop
//! bridge, forwards queue events to the webview and exposes these commands:
//! - [`add_image_paths`] / [`pick_images`]: Queue images
//! - [`remove_image`] / [`clear_images`]: Drop images and their previews
//! - [`set_quality`] / [`set_naming_options`]: Settings for the next run
//! - [`convert_images`]: Run one sequential conversion pass
//! - [`get_queue`]: Snapshot for rendering
//! - [`save_converted_image`] / [`save_completed_images`]: Save result payloads

mod drop_source;
mod image;
mod picker;

use std::sync::Arc;

use tauri::http::{Response, StatusCode};
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Emitter, Manager, Runtime};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::core::{AppState, ConversionSettings, QueueEvent};
use crate::processing::WebpConverter;

pub use drop_source::TauriDropSource;
pub use image::*;
pub use picker::DialogPicker;

/// Event carrying every [`QueueEvent`] to the frontend.
pub const QUEUE_EVENT: &str = "queue-event";

/// Builds the `image-queue` plugin.
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("image-queue")
        .invoke_handler(tauri::generate_handler![
            add_image_paths,
            pick_images,
            remove_image,
            clear_images,
            set_quality,
            set_naming_options,
            get_queue,
            convert_images,
            save_converted_image,
            save_completed_images,
        ])
        .register_uri_scheme_protocol("preview", |ctx, request| {
            let state = ctx.app_handle().state::<AppState>();
            match state.previews().resolve(request.uri().path()) {
                Some((mime, bytes)) => Response::builder()
                    .header("Content-Type", mime)
                    .body(bytes)
                    .unwrap_or_default(),
                None => Response::builder()
                    .status(StatusCode::NOT_FOUND)
                    .body(Vec::new())
                    .unwrap_or_default(),
            }
        })
        .setup(|app, _api| {
            let state = AppState::new(
                Arc::new(WebpConverter::default()),
                Arc::new(TauriDropSource::new(app.clone())),
                ConversionSettings::default(),
            );
            forward_events(app.clone(), state.queue().subscribe());

            let connect = state.clone();
            tauri::async_runtime::spawn(async move {
                if connect.connect_drops().await.is_ok() {
                    debug!("✓ Drop bridge connected");
                }
            });

            app.manage(state);
            debug!("✓ AppState initialized");
            Ok(())
        })
        .build()
}

fn forward_events<R: Runtime>(app: AppHandle<R>, mut events: broadcast::Receiver<QueueEvent>) {
    tauri::async_runtime::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let _ = app.emit(QUEUE_EVENT, &event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Frontend lagged, {} queue event(s) skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use tauri::http::Uri;

    use crate::queue::preview_key;

    #[test]
    fn preview_key_comes_from_the_request_path() {
        let native: Uri = "preview://localhost/3".parse().unwrap();
        let rewritten: Uri = "http://preview.localhost/3".parse().unwrap();
        assert_eq!(preview_key(native.path()), "3");
        assert_eq!(preview_key(rewritten.path()), "3");
    }
}
