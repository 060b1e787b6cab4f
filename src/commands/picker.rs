use async_trait::async_trait;
use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;

use crate::bridge::{FilePicker, PickerSelection};
use crate::utils::{ConverterError, ConverterResult, SUPPORTED_EXTENSIONS};

/// Native multi-select dialog from `tauri-plugin-dialog`.
pub struct DialogPicker<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> DialogPicker<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl<R: Runtime> FilePicker for DialogPicker<R> {
    async fn pick_images(&self) -> ConverterResult<PickerSelection> {
        let (tx, rx) = oneshot::channel();
        self.app
            .dialog()
            .file()
            .add_filter("Images", SUPPORTED_EXTENSIONS)
            .pick_files(move |picked| {
                let _ = tx.send(picked);
            });

        let picked = rx
            .await
            .map_err(|_| ConverterError::picker("Dialog closed without responding"))?;

        let Some(files) = picked else {
            return Ok(PickerSelection::Cancelled);
        };

        let paths = files
            .into_iter()
            .map(|file| {
                file.into_path()
                    .map(|p| p.to_string_lossy().to_string())
                    .map_err(|e| ConverterError::picker(e.to_string()))
            })
            .collect::<ConverterResult<Vec<_>>>()?;

        Ok(match <[String; 1]>::try_from(paths) {
            Ok([single]) => PickerSelection::Single(single),
            Err(paths) => PickerSelection::Multiple(paths),
        })
    }
}
