//! Anti-OCR distortion.
//!
//! All distorters are stateless: warp amplitudes, lens placement and the
//! noise curve are drawn fresh on every call, and the noise switches are
//! read from the settings passed in.

use image::Rgba;
use image::imageops::overlay;
use imageproc::drawing::{draw_cubic_bezier_curve_mut, draw_line_segment_mut};
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{Interpolation, warp_with};
use rand::Rng;
use scrawl_common::constants::keys;
use scrawl_common::{Color, Result};

use super::{Canvas, Distorter};
use crate::settings::Settings;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Horizontal ripple amplitude in pixels
const RIPPLE_X_AMPLITUDE: f32 = 7.6;
/// Wavelength (in radians per pixel divisor) of the horizontal ripple
const RIPPLE_X_WAVELENGTH: f32 = 20.0;
/// Wavelength of the vertical ripple
const RIPPLE_Y_WAVELENGTH: f32 = 10.0;

/// Shadow offset in pixels, down and to the right
const SHADOW_OFFSET: i64 = 3;
const SHADOW_SIGMA: f32 = 2.0;
const SHADOW_OPACITY: f32 = 0.6;

/// Lens strength: 1.0 is no magnification, smaller pulls harder
const FISHEYE_POWER: f32 = 0.6;

/// Sine ripple warp followed by the noise curve
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterDistorter;

impl Distorter for WaterDistorter {
    fn distort(&self, canvas: Canvas, settings: &Settings) -> Result<Canvas> {
        let mut canvas = ripple(&canvas, &mut rand::rng());
        add_noise(&mut canvas, settings);
        Ok(canvas)
    }
}

/// Blurred drop shadow behind the glyphs, ripple warp, then noise
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowDistorter;

impl Distorter for ShadowDistorter {
    fn distort(&self, canvas: Canvas, settings: &Settings) -> Result<Canvas> {
        let shaded = drop_shadow(&canvas);
        let mut canvas = ripple(&shaded, &mut rand::rng());
        add_noise(&mut canvas, settings);
        Ok(canvas)
    }
}

/// Crossing grid lines and a radial lens warp, then noise
#[derive(Debug, Clone, Copy, Default)]
pub struct FishEyeDistorter;

impl Distorter for FishEyeDistorter {
    fn distort(&self, mut canvas: Canvas, settings: &Settings) -> Result<Canvas> {
        let mut rng = rand::rng();
        draw_grid(&mut canvas, &mut rng);
        let mut canvas = fisheye(&canvas, &mut rng);
        add_noise(&mut canvas, settings);
        Ok(canvas)
    }
}

/// Returns the canvas untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughDistorter;

impl Distorter for PassthroughDistorter {
    fn distort(&self, canvas: Canvas, _settings: &Settings) -> Result<Canvas> {
        Ok(canvas)
    }
}

fn ripple(canvas: &Canvas, rng: &mut impl Rng) -> Canvas {
    let y_amplitude = rng.random_range(1.0..2.0f32);
    let phase = rng.random_range(0.0..std::f32::consts::TAU);

    warp_with(
        canvas,
        move |x, y| {
            (
                x + (y / RIPPLE_X_WAVELENGTH + phase).sin() * RIPPLE_X_AMPLITUDE,
                y + (x / RIPPLE_Y_WAVELENGTH + phase).sin() * y_amplitude,
            )
        },
        Interpolation::Bilinear,
        TRANSPARENT,
    )
}

fn drop_shadow(canvas: &Canvas) -> Canvas {
    let (width, height) = canvas.dimensions();

    let shadow = Canvas::from_fn(width, height, |x, y| {
        let alpha = f32::from(canvas.get_pixel(x, y)[3]) * SHADOW_OPACITY;
        Rgba([0, 0, 0, alpha as u8])
    });
    let shadow = gaussian_blur_f32(&shadow, SHADOW_SIGMA);

    let mut out = Canvas::from_pixel(width, height, TRANSPARENT);
    overlay(&mut out, &shadow, SHADOW_OFFSET, SHADOW_OFFSET);
    overlay(&mut out, canvas, 0, 0);
    out
}

fn draw_grid(canvas: &mut Canvas, rng: &mut impl Rng) {
    let (width, height) = canvas.dimensions();
    let (w, h) = (width as f32, height as f32);

    let rows = rng.random_range(2..5u32);
    let cols = rng.random_range(4..8u32);

    for i in 1..=rows {
        let y = h * i as f32 / (rows + 1) as f32;
        draw_line_segment_mut(canvas, (0.0, y), (w, y), random_gray(rng));
    }
    for i in 1..=cols {
        let x = w * i as f32 / (cols + 1) as f32;
        draw_line_segment_mut(canvas, (x, 0.0), (x, h), random_gray(rng));
    }
}

fn random_gray(rng: &mut impl Rng) -> Rgba<u8> {
    let level = rng.random_range(90..170u8);
    Rgba([level, level, level, 255])
}

fn fisheye(canvas: &Canvas, rng: &mut impl Rng) -> Canvas {
    let (width, height) = canvas.dimensions();
    let (w, h) = (width as f32, height as f32);

    let cx = rng.random_range(w * 0.25..=w * 0.75);
    let cy = rng.random_range(h * 0.25..=h * 0.75);
    let radius = w.min(h).max(1.0);

    warp_with(
        canvas,
        move |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            let distance = (dx * dx + dy * dy).sqrt();
            if distance >= radius || distance == 0.0 {
                return (x, y);
            }
            let scale = (distance / radius).powf(1.0 / FISHEYE_POWER) * radius / distance;
            (cx + dx * scale, cy + dy * scale)
        },
        Interpolation::Bilinear,
        TRANSPARENT,
    )
}

/// Draw a two-pixel cubic curve across the canvas unless `noise.enabled` is "no"
fn add_noise(canvas: &mut Canvas, settings: &Settings) {
    if !settings.flag(keys::NOISE_ENABLED) {
        return;
    }

    let color = Rgba(settings.color_or(keys::NOISE_COLOR, Color::BLACK).to_rgba());
    let (width, height) = canvas.dimensions();
    let (w, h) = (width as f32, height as f32);
    let mut rng = rand::rng();
    let mut point = |x: f32| (x, rng.random_range(0.0..=h));

    let start = point(0.0);
    let control_a = point(w * 0.3);
    let control_b = point(w * 0.7);
    let end = point(w);

    for offset in [0.0, 1.0] {
        let shift = |(x, y): (f32, f32)| (x, y + offset);
        draw_cubic_bezier_curve_mut(
            canvas,
            shift(start),
            shift(end),
            shift(control_a),
            shift(control_b),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph_canvas() -> Canvas {
        Canvas::from_fn(200, 50, |x, _| {
            if (80..120).contains(&x) {
                Rgba([0, 0, 0, 255])
            } else {
                TRANSPARENT
            }
        })
    }

    fn quiet() -> Settings {
        Settings::from_iter([(keys::NOISE_ENABLED, "no")])
    }

    #[test]
    fn test_distorters_keep_dimensions() {
        let settings = Settings::default();
        let distorters: [&dyn Distorter; 4] = [
            &WaterDistorter,
            &ShadowDistorter,
            &FishEyeDistorter,
            &PassthroughDistorter,
        ];

        for distorter in distorters {
            let out = distorter.distort(glyph_canvas(), &settings).unwrap();
            assert_eq!(out.dimensions(), (200, 50));
        }
    }

    #[test]
    fn test_passthrough_is_identity() {
        let out = PassthroughDistorter.distort(glyph_canvas(), &Settings::default()).unwrap();
        assert_eq!(out, glyph_canvas());
    }

    #[test]
    fn test_water_moves_pixels() {
        let out = WaterDistorter.distort(glyph_canvas(), &quiet()).unwrap();
        assert_ne!(out, glyph_canvas());
    }

    #[test]
    fn test_noise_follows_settings() {
        let blank = Canvas::from_pixel(200, 50, TRANSPARENT);

        let mut quiet_canvas = blank.clone();
        add_noise(&mut quiet_canvas, &quiet());
        assert_eq!(quiet_canvas, blank);

        let red = Settings::from_iter([(keys::NOISE_COLOR, "red")]);
        let mut noisy = blank.clone();
        add_noise(&mut noisy, &red);
        assert!(noisy.pixels().any(|p| *p == Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_shadow_darkens_behind_glyphs() {
        let shaded = drop_shadow(&glyph_canvas());
        // Just right of the glyph block the shadow shows through
        assert!(shaded.get_pixel(121, 25)[3] > 0);
        assert_eq!(*shaded.get_pixel(10, 25), TRANSPARENT);
    }
}
