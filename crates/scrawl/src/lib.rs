//! # Scrawl
//!
//! Synthesizes single-use challenge images: text is rendered, distorted,
//! composited onto a background, optionally outlined and encoded.
//!
//! ## Architecture
//! ```text
//! TextProducer ─→ text ─┐
//!                       ↓
//! WordRenderer → Distorter → BackgroundProducer → border → ImageEncoder → sink
//! ```
//!
//! ## Usage
//! ```no_run
//! use scrawl::{Producer, Settings};
//!
//! let settings = Settings::from_iter([("border.color", "red"), ("border.thickness", "2")]);
//! let producer = Producer::new(settings)?;
//!
//! let answer = producer.create_text();
//! let mut file = std::fs::File::create("challenge.jpg")?;
//! producer.create_image(&mut file, &answer)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod border;
pub mod producer;
pub mod registry;
pub mod settings;
pub mod strategy;

pub use producer::{Producer, ProducerBuilder};
pub use scrawl_common::{Color, Result, ScrawlError, Stage};
pub use settings::{BorderStyle, Properties, Settings};
pub use strategy::{
    BackgroundProducer, Canvas, Distorter, ImageEncoder, TextProducer, WordRenderer,
};
