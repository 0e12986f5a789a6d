//! Glyph rendering with TrueType/OpenType fonts.

use ab_glyph::{Font, FontArc, FontRef, PxScale, ScaleFont};
use image::Rgba;
use imageproc::drawing::{draw_text_mut, text_size};
use rand::Rng;
use scrawl_common::constants::{DEFAULT_CHAR_SPACE, DEFAULT_FONT_SIZE, keys};
use scrawl_common::{Color, Result, ScrawlError};

use super::{Canvas, WordRenderer};
use crate::settings::Settings;

/// DejaVu Sans, used when `text.font.paths` is not set
const EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Renders each character in a randomly chosen font onto a transparent canvas
#[derive(Clone)]
pub struct FontWordRenderer {
    fonts: Vec<FontArc>,
    size: f32,
    color: Rgba<u8>,
    char_space: i32,
}

impl FontWordRenderer {
    /// Build a renderer from already-loaded fonts
    pub fn new(fonts: Vec<FontArc>, size: f32, color: Color, char_space: i32) -> Result<Self> {
        if fonts.is_empty() {
            return Err(ScrawlError::Configuration(
                "glyph renderer needs at least one font".to_string(),
            ));
        }

        Ok(Self {
            fonts,
            size,
            color: Rgba(color.to_rgba()),
            char_space,
        })
    }

    /// Load every font listed in `text.font.paths`, or the embedded font
    /// when the key is absent.
    ///
    /// Fails if any listed file is unreadable or not a valid font.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let fonts = match settings.get(keys::TEXT_FONT_PATHS) {
            Some(paths) => paths
                .split(',')
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(load_font)
                .collect::<Result<Vec<_>>>()?,
            None => vec![embedded_font()?],
        };

        let size = settings.parse_or(keys::TEXT_FONT_SIZE, DEFAULT_FONT_SIZE);
        let size = if size.is_finite() && size > 0.0 { size } else { DEFAULT_FONT_SIZE };
        let char_space = settings
            .parse_or(keys::TEXT_CHAR_SPACE, DEFAULT_CHAR_SPACE)
            .max(0);

        Self::new(
            fonts,
            size,
            settings.color_or(keys::TEXT_FONT_COLOR, Color::BLACK),
            char_space,
        )
    }
}

fn embedded_font() -> Result<FontArc> {
    let font = FontRef::try_from_slice(EMBEDDED_FONT)
        .map_err(|e| ScrawlError::Configuration(format!("invalid embedded font: {e}")))?;
    Ok(FontArc::new(font))
}

fn load_font(path: &str) -> Result<FontArc> {
    let bytes = std::fs::read(path)
        .map_err(|e| ScrawlError::Configuration(format!("failed to read font {path}: {e}")))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| ScrawlError::Configuration(format!("invalid font {path}: {e}")))
}

/// X offset that centers a run of glyphs of `widths` separated by `space`
fn centered_start(widths: &[i32], space: i32, canvas_width: u32) -> i32 {
    let gaps = i32::try_from(widths.len().saturating_sub(1)).unwrap_or(i32::MAX);
    let total = widths.iter().sum::<i32>() + space * gaps;
    (i32::try_from(canvas_width).unwrap_or(i32::MAX) - total) / 2
}

impl WordRenderer for FontWordRenderer {
    fn render(&self, text: &str, width: u32, height: u32) -> Result<Canvas> {
        let mut canvas = Canvas::new(width, height);
        let scale = PxScale::from(self.size);
        let mut rng = rand::rng();

        let glyphs: Vec<(String, &FontArc)> = text
            .chars()
            .map(|ch| (ch.to_string(), &self.fonts[rng.random_range(0..self.fonts.len())]))
            .collect();
        let widths: Vec<i32> = glyphs
            .iter()
            .map(|(s, font)| i32::try_from(text_size(scale, *font, s).0).unwrap_or(0))
            .collect();

        // Baseline sits a fifth of the spare height below the top
        let baseline = (height as f32 - self.size) / 5.0 + self.size;
        let mut x = centered_start(&widths, self.char_space, width);

        for ((s, font), glyph_width) in glyphs.iter().zip(&widths) {
            let top = (baseline - font.as_scaled(scale).ascent()).round() as i32;
            draw_text_mut(&mut canvas, self.color, x, top, scale, *font, s);
            x += glyph_width + self.char_space;
        }

        Ok(canvas)
    }
}
