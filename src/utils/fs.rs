use std::path::{Path, PathBuf};
use tokio::fs;
use crate::utils::{ConverterError, ConverterResult};

/// Returns the final path component, falling back to the whole input.
///
/// Both separators are honoured so Windows paths dropped onto a Unix build
/// still yield a sensible display name.
pub fn extract_filename(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}

/// File name without its last extension.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

/// Reads a whole file, mapping failures to an IO error naming the path.
pub async fn read_file(path: impl AsRef<Path>) -> ConverterResult<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path)
        .await
        .map_err(|e| ConverterError::io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Creates the parent directory of `path` if it does not exist yet.
pub async fn ensure_parent_dir(path: impl AsRef<Path>) -> ConverterResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConverterError::io(format!("Failed to create directory: {}", e)))?;
        }
    }
    Ok(())
}

/// Output location for `file_name`: inside `output_dir` when given, else next to `source`.
pub fn output_location(source: &Path, output_dir: Option<&Path>, file_name: &str) -> PathBuf {
    match output_dir.or_else(|| source.parent()) {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
