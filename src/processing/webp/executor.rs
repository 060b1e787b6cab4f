// src/processing/webp/executor.rs

//! Conversion service that writes WebP files beside their sources.
//!
//! Decoding and encoding are CPU bound and run inside
//! `tokio::task::spawn_blocking` so the async runtime is never blocked.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::debug;

use crate::processing::{ConversionRequest, ConversionResult, ConversionService};
use crate::utils::{
    ConverterError, ConverterResult, OUTPUT_EXTENSION, ensure_parent_dir, extract_filename,
    output_location, read_file,
};

use super::encode::encode_webp;

/// Configuration for [`WebpConverter`].
#[derive(Debug, Clone)]
pub struct WebpConverterConfig {
    /// Directory for outputs; `None` writes next to each source
    pub output_dir: Option<PathBuf>,
    /// Whether results carry the encoded bytes as base64
    pub include_payload: bool,
}

impl Default for WebpConverterConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            include_payload: true,
        }
    }
}

/// Re-encodes images as WebP and writes them to disk.
#[derive(Debug, Clone, Default)]
pub struct WebpConverter {
    config: WebpConverterConfig,
}

impl WebpConverter {
    pub fn new(config: WebpConverterConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConversionService for WebpConverter {
    async fn convert(&self, request: ConversionRequest) -> ConverterResult<ConversionResult> {
        let source = PathBuf::from(&request.source_path);
        let data = read_file(&source).await?;
        let original_size = data.len() as u64;
        let quality = request.quality;

        let encoded = tokio::task::spawn_blocking(move || encode_webp(&data, quality))
            .await
            .map_err(|e| ConverterError::processing(format!("Encoder task panicked: {e}")))?;

        let webp = match encoded {
            Ok(webp) => webp,
            Err(e) => return Ok(ConversionResult::failure(original_size, e.to_string())),
        };

        let output_name = request.naming_options.output_file_name(
            extract_filename(&request.source_path),
            request.sequence,
            chrono::Local::now().date_naive(),
            OUTPUT_EXTENSION,
        );
        let output_path = output_location(&source, self.config.output_dir.as_deref(), &output_name);

        if output_path == source {
            return Ok(ConversionResult::failure(
                original_size,
                format!("Output would overwrite the source: {}", output_path.display()),
            ));
        }

        ensure_parent_dir(&output_path).await?;
        tokio::fs::write(&output_path, &webp)
            .await
            .map_err(|e| ConverterError::io(format!("Failed to write WebP file: {e}")))?;

        let new_size = webp.len() as u64;
        debug!(
            "'{}' -> '{}' ({} -> {} bytes)",
            extract_filename(&request.source_path),
            output_name,
            original_size,
            new_size
        );

        Ok(ConversionResult {
            success: true,
            output_path: output_path.to_string_lossy().to_string(),
            original_size,
            new_size,
            error: None,
            base64_data: self.config.include_payload.then(|| BASE64.encode(&webp)),
        })
    }
}

/// Writes a base64 result payload to `file_path`, creating parent directories.
pub async fn save_payload(base64_data: &str, file_path: impl AsRef<Path>) -> ConverterResult<()> {
    let bytes = BASE64
        .decode(base64_data)
        .map_err(|e| ConverterError::format(format!("Failed to decode base64: {e}")))?;

    let file_path = file_path.as_ref();
    ensure_parent_dir(file_path).await?;
    tokio::fs::write(file_path, bytes)
        .await
        .map_err(|e| ConverterError::io(format!("Failed to write file: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NamingOptions;
    use std::io::Cursor;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, out.into_inner()).unwrap();
        path
    }

    fn request(path: &Path, naming: NamingOptions) -> ConversionRequest {
        ConversionRequest {
            source_path: path.to_string_lossy().to_string(),
            quality: 0.75,
            naming_options: naming,
            sequence: 1,
        }
    }

    #[tokio::test]
    async fn writes_suffixed_webp_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_png(dir.path(), "photo.png");

        let result = WebpConverter::default()
            .convert(request(&source, NamingOptions::add_suffix("_small")))
            .await
            .unwrap();

        assert!(result.success);
        let expected = dir.path().join("photo_small.webp");
        assert_eq!(result.output_path, expected.to_string_lossy());
        assert_eq!(std::fs::metadata(&expected).unwrap().len(), result.new_size);
        assert!(result.base64_data.is_some());
    }

    #[tokio::test]
    async fn undecodable_source_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.png");
        std::fs::write(&source, b"nope").unwrap();

        let result = WebpConverter::default()
            .convert(request(&source, NamingOptions::keep_original()))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.original_size, 4);
        assert!(result.error.unwrap().contains("Failed to load image"));
    }

    #[tokio::test]
    async fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = WebpConverter::default()
            .convert(request(&dir.path().join("gone.png"), NamingOptions::keep_original()))
            .await;
        assert!(matches!(outcome, Err(ConverterError::IO(_))));
    }

    #[tokio::test]
    async fn output_dir_and_payload_flag_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_png(dir.path(), "a.png");
        let out_dir = dir.path().join("out");
        let converter = WebpConverter::new(WebpConverterConfig {
            output_dir: Some(out_dir.clone()),
            include_payload: false,
        });

        let result = converter
            .convert(request(&source, NamingOptions::keep_original()))
            .await
            .unwrap();

        assert!(out_dir.join("a.webp").exists());
        assert!(result.base64_data.is_none());
    }

    #[tokio::test]
    async fn payload_round_trips_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("x.webp");
        save_payload(&BASE64.encode(b"RIFFdata"), &target).await.unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"RIFFdata");

        assert!(matches!(
            save_payload("***", &target).await,
            Err(ConverterError::Format(_))
        ));
    }
}
