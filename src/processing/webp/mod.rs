//! WebP implementation of the conversion service.

mod encode;
mod executor;

pub use encode::encode_webp;
pub use executor::{WebpConverter, WebpConverterConfig, save_payload};
