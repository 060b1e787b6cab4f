pub mod converter;
pub mod webp;

pub use converter::{ConversionRequest, ConversionResult, ConversionService};
pub use webp::{WebpConverter, WebpConverterConfig, save_payload};
