//! Canvas serialization.

use std::io::Write;

use image::RgbImage;
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use scrawl_common::{EncoderKind, Result, ScrawlError};

use super::{Canvas, ImageEncoder};

fn encoding_error(err: image::ImageError) -> ScrawlError {
    match err {
        image::ImageError::IoError(io) => ScrawlError::from(io),
        other => ScrawlError::Encoding(other.to_string()),
    }
}

/// Baseline JPEG; alpha is dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegImageEncoder;

impl ImageEncoder for JpegImageEncoder {
    fn encode(&self, canvas: &Canvas, quality: u8, sink: &mut dyn Write) -> Result<()> {
        let rgb: RgbImage = canvas.convert();
        let encoder = JpegEncoder::new_with_quality(sink, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder).map_err(encoding_error)
    }

    fn extension(&self) -> &'static str {
        EncoderKind::Jpeg.extension()
    }

    fn mime_type(&self) -> &'static str {
        EncoderKind::Jpeg.mime_type()
    }
}

/// Lossless PNG; quality is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct PngImageEncoder;

impl ImageEncoder for PngImageEncoder {
    fn encode(&self, canvas: &Canvas, _quality: u8, sink: &mut dyn Write) -> Result<()> {
        canvas
            .write_with_encoder(PngEncoder::new(sink))
            .map_err(encoding_error)
    }

    fn extension(&self) -> &'static str {
        EncoderKind::Png.extension()
    }

    fn mime_type(&self) -> &'static str {
        EncoderKind::Png.mime_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    #[test]
    fn test_jpeg_decodes_at_minimum_quality() {
        let canvas = Canvas::from_pixel(200, 50, Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        JpegImageEncoder.encode(&canvas, 1, &mut bytes).unwrap();

        assert!(!bytes.is_empty());
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (200, 50));
    }

    #[test]
    fn test_png_is_lossless() {
        let mut canvas = Canvas::from_pixel(30, 20, Rgba([1, 2, 3, 255]));
        canvas.put_pixel(7, 9, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        PngImageEncoder.encode(&canvas, 1, &mut bytes).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, canvas);
    }

    #[test]
    fn test_sink_failure_is_encoding_error() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let canvas = Canvas::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let err = PngImageEncoder.encode(&canvas, 1, &mut Closed).unwrap_err();
        assert!(matches!(err, ScrawlError::Encoding(_)));
    }
}
