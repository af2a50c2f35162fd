use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output frame shape the template is composed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Classic4x3,
    #[serde(rename = "4:5")]
    Portrait4x5,
}

impl AspectRatio {
    pub fn all() -> &'static [AspectRatio] {
        &[
            AspectRatio::Landscape16x9,
            AspectRatio::Portrait9x16,
            AspectRatio::Square,
            AspectRatio::Classic4x3,
            AspectRatio::Portrait4x5,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Classic4x3 => "4:3",
            AspectRatio::Portrait4x5 => "4:5",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AspectRatio::Landscape16x9 => "Landscape (YouTube)",
            AspectRatio::Portrait9x16 => "Vertical (Stories, Reels)",
            AspectRatio::Square => "Square (Feed)",
            AspectRatio::Classic4x3 => "Classic",
            AspectRatio::Portrait4x5 => "Portrait (Feed)",
        }
    }

    fn dimensions(&self) -> (f32, f32) {
        match self {
            AspectRatio::Landscape16x9 => (16.0, 9.0),
            AspectRatio::Portrait9x16 => (9.0, 16.0),
            AspectRatio::Square => (1.0, 1.0),
            AspectRatio::Classic4x3 => (4.0, 3.0),
            AspectRatio::Portrait4x5 => (4.0, 5.0),
        }
    }

    /// Width over height
    pub fn ratio(&self) -> f32 {
        let (w, h) = self.dimensions();
        w / h
    }

    /// Largest `(width, height)` of this ratio inside the available area
    pub fn fit(&self, available_width: f32, available_height: f32) -> (f32, f32) {
        if available_width <= 0.0 || available_height <= 0.0 {
            return (0.0, 0.0);
        }
        let ratio = self.ratio();
        if available_width / available_height > ratio {
            (available_height * ratio, available_height)
        } else {
            (available_width, available_width / ratio)
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectRatio {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        AspectRatio::all()
            .iter()
            .copied()
            .find(|a| a.name() == s.trim())
            .ok_or_else(|| EditorError::UnknownAspectRatio(s.to_string()))
    }
}
