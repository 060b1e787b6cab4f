pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{ConverterError, ConverterResult};
pub use validation::{validate_settings, validate_quality, validate_naming};
pub use formats::{SUPPORTED_EXTENSIONS, OUTPUT_EXTENSION, is_supported_image, filter_supported, mime_for};
pub use fs::{extract_filename, file_stem, read_file, ensure_parent_dir, output_location};
