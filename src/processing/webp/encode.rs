use crate::utils::{ConverterError, ConverterResult};

/// Decodes any supported raster format and re-encodes it as lossy WebP.
///
/// `quality` is a fraction in `[0.0, 1.0]`; libwebp expects 0-100.
pub fn encode_webp(data: &[u8], quality: f32) -> ConverterResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| ConverterError::format(format!("Failed to load image: {e}")))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ConverterError::format("Image has no pixels"));
    }

    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
    let memory = encoder.encode(quality.clamp(0.0, 1.0) * 100.0);

    Ok(memory.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(8, 8, |x, y| image::Rgba([x as u8 * 30, y as u8 * 30, 128, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn produces_riff_webp() {
        let webp = encode_webp(&png_bytes(), 0.8).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn garbage_is_a_format_error() {
        let err = encode_webp(b"definitely not an image", 0.8).unwrap_err();
        assert!(matches!(err, ConverterError::Format(_)));
    }
}
