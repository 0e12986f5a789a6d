//! Random challenge text.

use rand::Rng;
use scrawl_common::constants::{DEFAULT_TEXT_CHARS, DEFAULT_TEXT_LENGTH, keys};

use super::TextProducer;
use crate::settings::Settings;

/// Draws characters uniformly from a configured alphabet
#[derive(Debug, Clone)]
pub struct RandomTextProducer {
    chars: Vec<char>,
    length: usize,
}

impl RandomTextProducer {
    /// Create a producer; an empty alphabet or zero length uses the default
    pub fn new(chars: &str, length: usize) -> Self {
        let mut chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            chars = DEFAULT_TEXT_CHARS.chars().collect();
        }

        Self {
            chars,
            length: if length == 0 { DEFAULT_TEXT_LENGTH } else { length },
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let chars = settings.get(keys::TEXT_CHARS).unwrap_or(DEFAULT_TEXT_CHARS);
        let length = settings.parse_or(keys::TEXT_LENGTH, DEFAULT_TEXT_LENGTH);
        Self::new(chars, length)
    }
}

impl Default for RandomTextProducer {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_CHARS, DEFAULT_TEXT_LENGTH)
    }
}

impl TextProducer for RandomTextProducer {
    fn text(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.chars[rng.random_range(0..self.chars.len())])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_text() {
        let producer = RandomTextProducer::default();
        let text = producer.text();
        assert_eq!(text.chars().count(), 5);
        assert!(text.chars().all(|c| DEFAULT_TEXT_CHARS.contains(c)));
    }

    #[test]
    fn test_text_from_settings() {
        let settings = Settings::from_iter([(keys::TEXT_CHARS, "XY"), (keys::TEXT_LENGTH, "8")]);
        let text = RandomTextProducer::from_settings(&settings).text();
        assert_eq!(text.len(), 8);
        assert!(text.chars().all(|c| c == 'X' || c == 'Y'));
    }

    #[test]
    fn test_degenerate_settings_use_defaults() {
        let settings = Settings::from_iter([(keys::TEXT_CHARS, ""), (keys::TEXT_LENGTH, "0")]);
        let text = RandomTextProducer::from_settings(&settings).text();
        assert_eq!(text.chars().count(), DEFAULT_TEXT_LENGTH);
    }
}
