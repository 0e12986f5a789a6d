//! Strategy resolution.
//!
//! Maps the `strategy.*` identifiers onto the closed set of built-in
//! implementations. A missing identifier selects the default; an unknown
//! one is a configuration error.

use std::str::FromStr;

use scrawl_common::constants::keys;
use scrawl_common::{
    BackgroundKind, DistorterKind, EncoderKind, GlyphRendererKind, Result, ScrawlError,
    TextSourceKind,
};

use crate::settings::Settings;
use crate::strategy::{
    BackgroundProducer, Distorter, FishEyeDistorter, FontWordRenderer, GradientBackground,
    ImageEncoder, JpegImageEncoder, PassthroughDistorter, PngImageEncoder, RandomTextProducer,
    ShadowDistorter, SolidBackground, TextProducer, WaterDistorter, WordRenderer,
};

/// Parse the strategy kind stored under `key`
pub fn kind<K>(settings: &Settings, key: &str) -> Result<K>
where
    K: FromStr<Err = ScrawlError> + Default,
{
    match settings.get(key) {
        None => Ok(K::default()),
        Some(id) => id.parse(),
    }
}

pub fn text_producer(settings: &Settings) -> Result<Box<dyn TextProducer>> {
    let producer: Box<dyn TextProducer> = match kind(settings, keys::STRATEGY_TEXT_SOURCE)? {
        TextSourceKind::Random => Box::new(RandomTextProducer::from_settings(settings)),
    };
    Ok(producer)
}

pub fn word_renderer(settings: &Settings) -> Result<Box<dyn WordRenderer>> {
    let renderer: Box<dyn WordRenderer> = match kind(settings, keys::STRATEGY_GLYPH_RENDERER)? {
        GlyphRendererKind::Font => Box::new(FontWordRenderer::from_settings(settings)?),
    };
    Ok(renderer)
}

pub fn distorter(settings: &Settings) -> Result<Box<dyn Distorter>> {
    let distorter: Box<dyn Distorter> = match kind(settings, keys::STRATEGY_DISTORTER)? {
        DistorterKind::Water => Box::new(WaterDistorter),
        DistorterKind::Shadow => Box::new(ShadowDistorter),
        DistorterKind::FishEye => Box::new(FishEyeDistorter),
        DistorterKind::Passthrough => Box::new(PassthroughDistorter),
    };
    Ok(distorter)
}

pub fn background_producer(settings: &Settings) -> Result<Box<dyn BackgroundProducer>> {
    let background: Box<dyn BackgroundProducer> = match kind(settings, keys::STRATEGY_BACKGROUND)? {
        BackgroundKind::Gradient => Box::new(GradientBackground::from_settings(settings)),
        BackgroundKind::Solid => Box::new(SolidBackground::from_settings(settings)),
    };
    Ok(background)
}

pub fn encoder(settings: &Settings) -> Result<Box<dyn ImageEncoder>> {
    let encoder: Box<dyn ImageEncoder> = match kind(settings, keys::STRATEGY_ENCODER)? {
        EncoderKind::Jpeg => Box::new(JpegImageEncoder),
        EncoderKind::Png => Box::new(PngImageEncoder),
    };
    Ok(encoder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identifier_selects_default() {
        let settings = Settings::default();
        assert_eq!(kind::<DistorterKind>(&settings, keys::STRATEGY_DISTORTER).unwrap(), DistorterKind::Water);
        assert_eq!(encoder(&settings).unwrap().extension(), "jpg");
    }

    #[test]
    fn test_known_identifiers_resolve() {
        let settings = Settings::from_iter([
            (keys::STRATEGY_DISTORTER, "fisheye"),
            (keys::STRATEGY_BACKGROUND, "solid"),
            (keys::STRATEGY_ENCODER, "png"),
            (keys::STRATEGY_TEXT_SOURCE, "default"),
        ]);

        assert!(distorter(&settings).is_ok());
        assert!(background_producer(&settings).is_ok());
        assert!(text_producer(&settings).is_ok());
        assert_eq!(encoder(&settings).unwrap().mime_type(), "image/png");
    }

    #[test]
    fn test_unknown_identifier_fails_fast() {
        let settings = Settings::from_iter([(keys::STRATEGY_BACKGROUND, "com.example.Marble")]);
        let err = background_producer(&settings).err().unwrap();
        assert!(err.is_configuration());
    }
}
