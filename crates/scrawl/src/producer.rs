//! The challenge image producer.
//!
//! Runs the fixed stage sequence on the calling thread:
//! ```text
//! render → distort → background → border (optional) → encode → sink
//! ```
//! Each stage consumes the previous stage's canvas. A failed stage stops the
//! pipeline before anything is written to the sink.
//!
//! `create_text` and `create_image` borrow the producer immutably and the
//! setters borrow it mutably, so a producer cannot be reconfigured while a
//! call is in flight. A shared `&Producer` may serve concurrent calls from
//! several threads.

use std::io::{self, Write};

use scrawl_common::constants::MIN_ENCODE_QUALITY;
use scrawl_common::{Result, ScrawlError, Stage};

use crate::border::draw_border;
use crate::registry;
use crate::settings::Settings;
use crate::strategy::{
    BackgroundProducer, Canvas, Distorter, ImageEncoder, TextProducer, WordRenderer,
};

/// Produces challenge text and challenge images
pub struct Producer {
    settings: Settings,
    text_producer: Box<dyn TextProducer>,
    word_renderer: Box<dyn WordRenderer>,
    distorter: Box<dyn Distorter>,
    background_producer: Box<dyn BackgroundProducer>,
    encoder: Box<dyn ImageEncoder>,
}

impl Producer {
    /// Resolve every stage from `settings`.
    ///
    /// Fails with a configuration error if any stage cannot be built.
    pub fn new(settings: Settings) -> Result<Self> {
        Self::builder(settings).build()
    }

    /// Start a producer with some stages supplied by the caller
    pub fn builder(settings: Settings) -> ProducerBuilder {
        ProducerBuilder {
            settings,
            text_producer: None,
            word_renderer: None,
            distorter: None,
            background_producer: None,
            encoder: None,
        }
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Canvas (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.settings.width(), self.settings.height())
    }

    /// File extension of the images this producer writes
    pub fn extension(&self) -> &'static str {
        self.encoder.extension()
    }

    /// MIME type of the images this producer writes
    pub fn mime_type(&self) -> &'static str {
        self.encoder.mime_type()
    }

    /// A fresh challenge string.
    ///
    /// The producer does not remember it; callers keep it for verification.
    pub fn create_text(&self) -> String {
        self.text_producer.text()
    }

    /// Render `text` through every stage and write the encoded image to `sink`.
    ///
    /// Stage failures are returned as render errors and leave the sink
    /// untouched. Encoding failures may leave partial bytes in the sink.
    pub fn create_image(&self, sink: &mut dyn Write, text: &str) -> Result<()> {
        let (width, height) = self.dimensions();

        let canvas = self
            .word_renderer
            .render(text, width, height)
            .map_err(|e| e.in_stage(Stage::Render))?;
        let canvas = expect_dimensions(canvas, Stage::Render, width, height)?;
        tracing::debug!(stage = %Stage::Render, width, height, chars = text.chars().count(), "Stage complete");

        let canvas = self
            .distorter
            .distort(canvas, &self.settings)
            .map_err(|e| e.in_stage(Stage::Distort))?;
        let canvas = expect_dimensions(canvas, Stage::Distort, width, height)?;
        tracing::debug!(stage = %Stage::Distort, "Stage complete");

        let canvas = self
            .background_producer
            .add_background(canvas)
            .map_err(|e| e.in_stage(Stage::Background))?;
        let mut canvas = expect_dimensions(canvas, Stage::Background, width, height)?;
        tracing::debug!(stage = %Stage::Background, "Stage complete");

        if let Some(style) = self.settings.border() {
            draw_border(&mut canvas, style);
            tracing::debug!(stage = %Stage::Border, thickness = style.thickness, color = %style.color, "Stage complete");
        }

        let mut counter = CountingWriter::new(sink);
        self.encoder.encode(&canvas, MIN_ENCODE_QUALITY, &mut counter)?;
        counter.flush()?;
        tracing::debug!(stage = %Stage::Encode, bytes = counter.written, quality = MIN_ENCODE_QUALITY, "Stage complete");

        Ok(())
    }

    pub fn set_text_producer(&mut self, text_producer: Box<dyn TextProducer>) {
        self.text_producer = text_producer;
    }

    pub fn set_word_renderer(&mut self, word_renderer: Box<dyn WordRenderer>) {
        self.word_renderer = word_renderer;
    }

    /// Replace the distorter
    pub fn set_obscurificator(&mut self, distorter: Box<dyn Distorter>) {
        self.distorter = distorter;
    }

    pub fn set_background_producer(&mut self, background_producer: Box<dyn BackgroundProducer>) {
        self.background_producer = background_producer;
    }

    pub fn set_encoder(&mut self, encoder: Box<dyn ImageEncoder>) {
        self.encoder = encoder;
    }

    /// Replace the settings wholesale.
    ///
    /// Takes effect on the next `create_image` for dimensions, border and
    /// distortion options. Already-built stages are kept.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("settings", &self.settings)
            .field("encoder", &self.encoder.mime_type())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Producer`] with caller-supplied stages
pub struct ProducerBuilder {
    settings: Settings,
    text_producer: Option<Box<dyn TextProducer>>,
    word_renderer: Option<Box<dyn WordRenderer>>,
    distorter: Option<Box<dyn Distorter>>,
    background_producer: Option<Box<dyn BackgroundProducer>>,
    encoder: Option<Box<dyn ImageEncoder>>,
}

impl ProducerBuilder {
    pub fn text_producer(mut self, text_producer: impl TextProducer + 'static) -> Self {
        self.text_producer = Some(Box::new(text_producer));
        self
    }

    pub fn word_renderer(mut self, word_renderer: impl WordRenderer + 'static) -> Self {
        self.word_renderer = Some(Box::new(word_renderer));
        self
    }

    pub fn distorter(mut self, distorter: impl Distorter + 'static) -> Self {
        self.distorter = Some(Box::new(distorter));
        self
    }

    pub fn background_producer(mut self, background_producer: impl BackgroundProducer + 'static) -> Self {
        self.background_producer = Some(Box::new(background_producer));
        self
    }

    pub fn encoder(mut self, encoder: impl ImageEncoder + 'static) -> Self {
        self.encoder = Some(Box::new(encoder));
        self
    }

    /// Resolve the stages not supplied and build the producer
    pub fn build(self) -> Result<Producer> {
        let settings = self.settings;

        let text_producer = match self.text_producer {
            Some(stage) => stage,
            None => registry::text_producer(&settings)?,
        };
        let word_renderer = match self.word_renderer {
            Some(stage) => stage,
            None => registry::word_renderer(&settings)?,
        };
        let distorter = match self.distorter {
            Some(stage) => stage,
            None => registry::distorter(&settings)?,
        };
        let background_producer = match self.background_producer {
            Some(stage) => stage,
            None => registry::background_producer(&settings)?,
        };
        let encoder = match self.encoder {
            Some(stage) => stage,
            None => registry::encoder(&settings)?,
        };

        tracing::info!(
            width = settings.width(),
            height = settings.height(),
            border = settings.border().is_some(),
            format = encoder.mime_type(),
            "Producer ready"
        );

        Ok(Producer {
            settings,
            text_producer,
            word_renderer,
            distorter,
            background_producer,
            encoder,
        })
    }
}

fn expect_dimensions(canvas: Canvas, stage: Stage, width: u32, height: u32) -> Result<Canvas> {
    if canvas.dimensions() == (width, height) {
        Ok(canvas)
    } else {
        let (got_w, got_h) = canvas.dimensions();
        Err(ScrawlError::render(
            stage,
            format!("expected a {width}x{height} canvas, got {got_w}x{got_h}"),
        ))
    }
}

/// Passes writes through while counting bytes
struct CountingWriter<'a> {
    inner: &'a mut dyn Write,
    written: usize,
}

impl<'a> CountingWriter<'a> {
    fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, written: 0 }
    }
}

impl Write for CountingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
