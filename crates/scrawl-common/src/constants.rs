//! Shared constants for Scrawl components.

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 200;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 50;

/// Default border stroke thickness in pixels
pub const DEFAULT_BORDER_THICKNESS: u32 = 1;

/// Quality passed to the encoder on every image (lowest the JPEG encoder accepts)
pub const MIN_ENCODE_QUALITY: u8 = 1;

/// Default alphabet for generated challenge text
pub const DEFAULT_TEXT_CHARS: &str = "abcde2345678gfynmnpwx";

/// Default challenge text length
pub const DEFAULT_TEXT_LENGTH: usize = 5;

/// Default glyph pixel height
pub const DEFAULT_FONT_SIZE: f32 = 40.0;

/// Default extra gap between glyphs
pub const DEFAULT_CHAR_SPACE: i32 = 2;

/// The one value of a boolean key that switches a feature off
pub const DISABLED_VALUE: &str = "no";

/// Recognized configuration keys
pub mod keys {
    /// Draw the border: anything other than "no" enables it
    pub const BORDER_ENABLED: &str = "border.enabled";

    /// Border color
    pub const BORDER_COLOR: &str = "border.color";

    /// Border stroke thickness
    pub const BORDER_THICKNESS: &str = "border.thickness";

    /// Canvas width
    pub const IMAGE_WIDTH: &str = "image.width";

    /// Canvas height
    pub const IMAGE_HEIGHT: &str = "image.height";

    /// Distorter implementation
    pub const STRATEGY_DISTORTER: &str = "strategy.distorter";

    /// Background compositor implementation
    pub const STRATEGY_BACKGROUND: &str = "strategy.background";

    /// Glyph renderer implementation
    pub const STRATEGY_GLYPH_RENDERER: &str = "strategy.glyphRenderer";

    /// Text source implementation
    pub const STRATEGY_TEXT_SOURCE: &str = "strategy.textSource";

    /// Encoder implementation
    pub const STRATEGY_ENCODER: &str = "strategy.encoder";

    /// Alphabet for the default text source
    pub const TEXT_CHARS: &str = "text.chars";

    /// Length of generated text
    pub const TEXT_LENGTH: &str = "text.length";

    /// Comma-separated font files
    pub const TEXT_FONT_PATHS: &str = "text.font.paths";

    /// Glyph pixel height
    pub const TEXT_FONT_SIZE: &str = "text.font.size";

    /// Glyph color
    pub const TEXT_FONT_COLOR: &str = "text.font.color";

    /// Extra gap between glyphs
    pub const TEXT_CHAR_SPACE: &str = "text.char.space";

    /// Draw the noise curve: anything other than "no" enables it
    pub const NOISE_ENABLED: &str = "noise.enabled";

    /// Noise curve color
    pub const NOISE_COLOR: &str = "noise.color";

    /// Background gradient start / solid fill
    pub const BACKGROUND_FROM: &str = "background.from";

    /// Background gradient end
    pub const BACKGROUND_TO: &str = "background.to";
}

/// Every recognized key, in canonical spelling
pub const ALL_KEYS: &[&str] = &[
    keys::BORDER_ENABLED,
    keys::BORDER_COLOR,
    keys::BORDER_THICKNESS,
    keys::IMAGE_WIDTH,
    keys::IMAGE_HEIGHT,
    keys::STRATEGY_DISTORTER,
    keys::STRATEGY_BACKGROUND,
    keys::STRATEGY_GLYPH_RENDERER,
    keys::STRATEGY_TEXT_SOURCE,
    keys::STRATEGY_ENCODER,
    keys::TEXT_CHARS,
    keys::TEXT_LENGTH,
    keys::TEXT_FONT_PATHS,
    keys::TEXT_FONT_SIZE,
    keys::TEXT_FONT_COLOR,
    keys::TEXT_CHAR_SPACE,
    keys::NOISE_ENABLED,
    keys::NOISE_COLOR,
    keys::BACKGROUND_FROM,
    keys::BACKGROUND_TO,
];

/// Canonical spelling of `key` if it is recognized, ignoring ASCII case
pub fn canonical_key(key: &str) -> Option<&'static str> {
    ALL_KEYS.iter().copied().find(|known| known.eq_ignore_ascii_case(key))
}
