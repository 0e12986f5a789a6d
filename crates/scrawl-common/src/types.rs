//! Core types shared across Scrawl components.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScrawlError;

/// An opaque RGB color as written in configuration.
///
/// Accepts a named color (`red`, `lightGray`, ...), an `r,g,b` decimal
/// triplet, or `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const LIGHT_GRAY: Color = Color::rgb(192, 192, 192);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA channels, fully opaque
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "blue" => Self::rgb(0, 0, 255),
            "cyan" => Self::rgb(0, 255, 255),
            "darkgray" | "dark_gray" => Self::rgb(64, 64, 64),
            "gray" => Self::rgb(128, 128, 128),
            "green" => Self::rgb(0, 255, 0),
            "lightgray" | "light_gray" => Self::LIGHT_GRAY,
            "magenta" => Self::rgb(255, 0, 255),
            "orange" => Self::rgb(255, 200, 0),
            "pink" => Self::rgb(255, 175, 175),
            "red" => Self::RED,
            "white" => Self::WHITE,
            "yellow" => Self::rgb(255, 255, 0),
            _ => return None,
        };
        Some(color)
    }
}

impl FromStr for Color {
    type Err = ScrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ScrawlError::Configuration(format!("invalid color: {s:?}"));

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(invalid());
            }
            let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return Ok(Self::rgb(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ));
        }

        if s.contains(',') {
            let channels: Vec<u8> = s
                .split(',')
                .map(|part| part.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())?;
            return match channels.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                _ => Err(invalid()),
            };
        }

        Self::named(s).ok_or_else(invalid)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Render,
    Distort,
    Background,
    Border,
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Render => "render",
            Self::Distort => "distort",
            Self::Background => "background",
            Self::Border => "border",
            Self::Encode => "encode",
        };
        f.write_str(name)
    }
}

/// Declares a closed set of strategy identifiers with `FromStr`/`Display`.
///
/// The first listed variant is the default.
macro_rules! strategy_kind {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $first:ident => $first_id:literal
            $(, $variant:ident => $id:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $first,
            $($variant,)*
        }

        impl $name {
            /// Every identifier this kind accepts
            pub const IDENTIFIERS: &'static [&'static str] = &[$first_id $(, $id)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    Self::$first => $first_id,
                    $(Self::$variant => $id,)*
                }
            }
        }

        impl FromStr for $name {
            type Err = ScrawlError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $first_id => Ok(Self::$first),
                    $($id => Ok(Self::$variant),)*
                    other => Err(ScrawlError::Configuration(format!(
                        "unknown {} {:?} (expected one of: {})",
                        $what,
                        other,
                        Self::IDENTIFIERS.join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

strategy_kind! {
    /// Text source implementations
    TextSourceKind, "text source" {
        Random => "default",
    }
}

strategy_kind! {
    /// Glyph renderer implementations
    GlyphRendererKind, "glyph renderer" {
        Font => "default",
    }
}

strategy_kind! {
    /// Distorter implementations
    DistorterKind, "distorter" {
        Water => "water",
        Shadow => "shadow",
        FishEye => "fisheye",
        Passthrough => "none",
    }
}

strategy_kind! {
    /// Background compositor implementations
    BackgroundKind, "background" {
        Gradient => "gradient",
        Solid => "solid",
    }
}

strategy_kind! {
    /// Image encoder implementations
    EncoderKind, "encoder" {
        Jpeg => "jpeg",
        Png => "png",
    }
}

impl EncoderKind {
    /// File extension of the encoded bytes
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type of the encoded bytes
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::RED);
        assert_eq!("lightGray".parse::<Color>().unwrap(), Color::LIGHT_GRAY);
        assert_eq!("10, 20,30".parse::<Color>().unwrap(), Color::rgb(10, 20, 30));
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));

        assert!("".parse::<Color>().is_err());
        assert!("chartreuse".parse::<Color>().is_err());
        assert!("1,2".parse::<Color>().is_err());
        assert!("1,2,300".parse::<Color>().is_err());
        assert!("#fff".parse::<Color>().is_err());
    }

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!("Shadow".parse::<DistorterKind>().unwrap(), DistorterKind::Shadow);
        assert_eq!(DistorterKind::default(), DistorterKind::Water);
        assert_eq!(EncoderKind::default(), EncoderKind::Jpeg);
        assert_eq!(TextSourceKind::default().as_str(), "default");

        let err = "warp".parse::<DistorterKind>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("fisheye"));
    }
}
