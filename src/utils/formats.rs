use std::path::Path;

/// Extensions accepted from the file picker and the drop source.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// Extension written by the WebP converter.
pub const OUTPUT_EXTENSION: &str = "webp";

/// Get file extension as lowercase string
pub fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check whether the path has one of the supported image extensions (case-insensitive)
pub fn is_supported_image(path: &str) -> bool {
    extension_of(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Keeps only paths with a supported image extension, preserving order.
pub fn filter_supported<I, S>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    paths
        .into_iter()
        .map(Into::into)
        .filter(|p| is_supported_image(p))
        .collect()
}

/// MIME type used when serving a preview, derived from the source extension.
pub fn mime_for(path: &str) -> &'static str {
    match extension_of(path).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tiff") => "image/tiff",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
