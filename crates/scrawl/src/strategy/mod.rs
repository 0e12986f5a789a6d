//! Pluggable pipeline stages.
//!
//! Each stage is a trait object owned by the [`Producer`](crate::Producer).
//! Implementations must be `Send + Sync`: a producer may serve
//! `create_image` calls from several threads at once, and no stage holds
//! per-call state.

mod background;
mod distort;
mod encode;
mod render;
mod text;

pub use background::{GradientBackground, SolidBackground};
pub use distort::{FishEyeDistorter, PassthroughDistorter, ShadowDistorter, WaterDistorter};
pub use encode::{JpegImageEncoder, PngImageEncoder};
pub use render::FontWordRenderer;
pub use text::RandomTextProducer;

use std::io::Write;

use image::RgbaImage;
use scrawl_common::Result;

use crate::settings::Settings;

/// Raster image passed between stages
pub type Canvas = RgbaImage;

/// Produces the challenge text
pub trait TextProducer: Send + Sync {
    /// A fresh challenge string; expected to differ between calls
    fn text(&self) -> String;
}

/// Rasterizes text onto a canvas
pub trait WordRenderer: Send + Sync {
    /// Render `text` onto a canvas of exactly `width` x `height`
    fn render(&self, text: &str, width: u32, height: u32) -> Result<Canvas>;
}

/// Applies the anti-OCR transform
pub trait Distorter: Send + Sync {
    /// Distort `canvas`, reading options from the producer's current settings
    fn distort(&self, canvas: Canvas, settings: &Settings) -> Result<Canvas>;
}

/// Places the canvas over a background
pub trait BackgroundProducer: Send + Sync {
    fn add_background(&self, canvas: Canvas) -> Result<Canvas>;
}

/// Serializes the finished canvas
pub trait ImageEncoder: Send + Sync {
    /// Write `canvas` to `sink` at `quality` (1-100, ignored by lossless formats)
    fn encode(&self, canvas: &Canvas, quality: u8, sink: &mut dyn Write) -> Result<()>;

    /// File extension of the encoded bytes
    fn extension(&self) -> &'static str;

    /// MIME type of the encoded bytes
    fn mime_type(&self) -> &'static str;
}
