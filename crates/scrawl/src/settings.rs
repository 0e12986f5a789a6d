//! Pipeline configuration.
//!
//! Settings are parsed from a flat key/value property set. Every typed field
//! is fail-soft: a malformed value logs a warning and falls back to the
//! field's default instead of aborting construction. Unknown keys are kept
//! so strategies can read their own options.

use std::collections::BTreeMap;
use std::str::FromStr;

use scrawl_common::Color;
use scrawl_common::constants::{
    DEFAULT_BORDER_THICKNESS, DEFAULT_HEIGHT, DEFAULT_WIDTH, DISABLED_VALUE, keys,
};

/// Raw configuration as read from a property file or map
pub type Properties = BTreeMap<String, String>;

/// Border outline style, present only when the border is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderStyle {
    pub color: Color,
    /// Stroke width in pixels, always >= 1
    pub thickness: u32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            thickness: DEFAULT_BORDER_THICKNESS,
        }
    }
}

/// Immutable pipeline settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    properties: Properties,
    width: u32,
    height: u32,
    border: Option<BorderStyle>,
}

impl Settings {
    /// Parse settings from a property set
    pub fn new(properties: Properties) -> Self {
        let mut settings = Self {
            properties,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            border: None,
        };

        settings.width = settings.positive_or(keys::IMAGE_WIDTH, DEFAULT_WIDTH);
        settings.height = settings.positive_or(keys::IMAGE_HEIGHT, DEFAULT_HEIGHT);

        // Color and thickness are only read when the border is drawn
        if settings.flag(keys::BORDER_ENABLED) {
            settings.border = Some(BorderStyle {
                color: settings.color_or(keys::BORDER_COLOR, Color::BLACK),
                thickness: settings.thickness(),
            });
        }

        settings
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Border style, `None` when `border.enabled` is "no"
    pub fn border(&self) -> Option<&BorderStyle> {
        self.border.as_ref()
    }

    /// The raw property set these settings were parsed from
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Raw value of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Boolean switch: absent or anything other than "no" means on
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_none_or(|value| value != DISABLED_VALUE)
    }

    /// Parse `key`, falling back to `default` when absent or malformed
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get(key) else {
            return default;
        };

        match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = raw, "Malformed config value, using default");
                default
            }
        }
    }

    /// Parse a strictly positive integer, falling back to `default`
    pub fn positive_or(&self, key: &str, default: u32) -> u32 {
        match self.parse_or(key, default) {
            0 => {
                tracing::warn!(key, "Config value must be positive, using default");
                default
            }
            value => value,
        }
    }

    /// Parse a color, falling back to `default`
    pub fn color_or(&self, key: &str, default: Color) -> Color {
        self.parse_or(key, default)
    }

    /// Border thickness: unparsable falls back to the default, zero and
    /// negative values become 1
    fn thickness(&self) -> u32 {
        let thickness: i64 = self.parse_or(keys::BORDER_THICKNESS, DEFAULT_BORDER_THICKNESS.into());
        u32::try_from(thickness).ok().filter(|t| *t > 0).unwrap_or(1)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Properties::new())
    }
}

impl<K, V> FromIterator<(K, V)> for Settings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
