use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 1.75;
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Timeline detail level, always within `[MIN_ZOOM, MAX_ZOOM]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Zoom(f64);

impl Zoom {
    /// Clamp an arbitrary value. Non-finite input falls back to the default.
    pub fn new(level: f64) -> Self {
        if level.is_finite() {
            Self(level.clamp(MIN_ZOOM, MAX_ZOOM))
        } else {
            Self(DEFAULT_ZOOM)
        }
    }

    pub fn level(self) -> f64 {
        self.0
    }

    /// Move by `steps` increments of `ZOOM_STEP`, rounded to two decimals
    pub fn stepped(self, steps: i32) -> Self {
        let raw = self.0 + steps as f64 * ZOOM_STEP;
        Self::new((raw * 100.0).round() / 100.0)
    }

    pub fn zoom_in(self) -> Self {
        self.stepped(1)
    }

    pub fn zoom_out(self) -> Self {
        self.stepped(-1)
    }

    pub fn can_zoom_in(self) -> bool {
        self.0 < MAX_ZOOM
    }

    pub fn can_zoom_out(self) -> bool {
        self.0 > MIN_ZOOM
    }

    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(DEFAULT_ZOOM)
    }
}

impl From<f64> for Zoom {
    fn from(level: f64) -> Self {
        Self::new(level)
    }
}

impl From<Zoom> for f64 {
    fn from(zoom: Zoom) -> Self {
        zoom.0
    }
}
