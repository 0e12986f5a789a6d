//! Background compositing.

use image::Rgba;
use image::imageops::overlay;
use scrawl_common::constants::keys;
use scrawl_common::{Color, Result};

use super::{BackgroundProducer, Canvas};
use crate::settings::Settings;

/// Diagonal gradient from the top-left color to the bottom-right color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientBackground {
    pub from: Color,
    pub to: Color,
}

impl GradientBackground {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            from: settings.color_or(keys::BACKGROUND_FROM, Color::LIGHT_GRAY),
            to: settings.color_or(keys::BACKGROUND_TO, Color::WHITE),
        }
    }
}

impl Default for GradientBackground {
    fn default() -> Self {
        Self {
            from: Color::LIGHT_GRAY,
            to: Color::WHITE,
        }
    }
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

impl BackgroundProducer for GradientBackground {
    fn add_background(&self, canvas: Canvas) -> Result<Canvas> {
        let (width, height) = canvas.dimensions();
        let (w, h) = (width as f32, height as f32);
        let span = (w * w + h * h).max(1.0);

        // Project each pixel onto the (0,0)->(w,h) diagonal
        let mut background = Canvas::from_fn(width, height, |x, y| {
            let t = ((x as f32 * w + y as f32 * h) / span).clamp(0.0, 1.0);
            Rgba([
                lerp(self.from.r, self.to.r, t),
                lerp(self.from.g, self.to.g, t),
                lerp(self.from.b, self.to.b, t),
                255,
            ])
        });

        overlay(&mut background, &canvas, 0, 0);
        Ok(background)
    }
}

/// Flat fill in one color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidBackground {
    pub color: Color,
}

impl SolidBackground {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            color: settings.color_or(keys::BACKGROUND_FROM, Color::LIGHT_GRAY),
        }
    }
}

impl BackgroundProducer for SolidBackground {
    fn add_background(&self, canvas: Canvas) -> Result<Canvas> {
        let (width, height) = canvas.dimensions();
        let mut background = Canvas::from_pixel(width, height, Rgba(self.color.to_rgba()));
        overlay(&mut background, &canvas, 0, 0);
        Ok(background)
    }
}
