use crate::error::{EditorError, Result};
use crate::project::{AssetId, MediaAsset};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use uuid::Uuid;

pub type ClipId = Uuid;

/// Shortest trimmed window a clip may have, in seconds
pub const MIN_CLIP_DURATION: f64 = 0.1;

/// Slack for float noise when validating positions
const POSITION_EPSILON: f64 = 1e-9;

/// Trimmed in/out points within the source, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPosition {
    pub start_time: f64,
    pub end_time: f64,
}

impl ClipPosition {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// `0 <= start < end <= original_duration` with at least `MIN_CLIP_DURATION` between them
    pub fn is_valid_for(&self, original_duration: f64) -> bool {
        self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.end_time <= original_duration + POSITION_EPSILON
            && self.duration() >= MIN_CLIP_DURATION - POSITION_EPSILON
    }

    pub fn validate(self, original_duration: f64) -> Result<Self> {
        if self.is_valid_for(original_duration) {
            Ok(self)
        } else {
            Err(EditorError::InvalidPosition {
                start: self.start_time,
                end: self.end_time,
                duration: original_duration,
            })
        }
    }
}

fn check_range(name: &'static str, value: f32, range: RangeInclusive<f32>) -> Result<()> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(EditorError::InvalidParameter {
            name,
            value: value as f64,
        })
    }
}

/// Placement of the clip inside the canvas. Offsets are fractions of the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Degrees, clockwise
    pub rotation: f32,
    pub opacity: f32,
}

impl Transform {
    pub const OFFSET_RANGE: RangeInclusive<f32> = -1.0..=1.0;
    pub const SCALE_RANGE: RangeInclusive<f32> = 0.1..=5.0;
    pub const ROTATION_RANGE: RangeInclusive<f32> = -180.0..=180.0;
    pub const OPACITY_RANGE: RangeInclusive<f32> = 0.0..=1.0;

    pub fn validate(self) -> Result<Self> {
        check_range("x", self.x, Self::OFFSET_RANGE)?;
        check_range("y", self.y, Self::OFFSET_RANGE)?;
        check_range("scale", self.scale, Self::SCALE_RANGE)?;
        check_range("rotation", self.rotation, Self::ROTATION_RANGE)?;
        check_range("opacity", self.opacity, Self::OPACITY_RANGE)?;
        Ok(self)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

/// Colour adjustments applied to preview frames. All zero is the identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effects {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    /// Box blur radius in preview pixels
    pub blur: f32,
}

impl Effects {
    pub const ADJUST_RANGE: RangeInclusive<f32> = -1.0..=1.0;
    pub const BLUR_RANGE: RangeInclusive<f32> = 0.0..=10.0;

    pub fn validate(self) -> Result<Self> {
        check_range("brightness", self.brightness, Self::ADJUST_RANGE)?;
        check_range("contrast", self.contrast, Self::ADJUST_RANGE)?;
        check_range("saturation", self.saturation, Self::ADJUST_RANGE)?;
        check_range("blur", self.blur, Self::BLUR_RANGE)?;
        Ok(self)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub volume: f32,
    pub muted: bool,
    pub speed: f32,
}

impl AudioSettings {
    pub const VOLUME_RANGE: RangeInclusive<f32> = 0.0..=2.0;
    pub const SPEED_RANGE: RangeInclusive<f32> = 0.25..=4.0;

    pub fn validate(self) -> Result<Self> {
        check_range("volume", self.volume, Self::VOLUME_RANGE)?;
        check_range("speed", self.speed, Self::SPEED_RANGE)?;
        Ok(self)
    }

    /// Volume actually sent to the sink
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            speed: 1.0,
        }
    }
}

/// Recompute the window end after a speed change.
///
/// The unscaled segment length is recovered from the current window and the old
/// speed, so applying the same speed twice is a no-op and returning to 1.0
/// restores the original length unless the source end clamped it.
pub fn rescale_for_speed(
    position: ClipPosition,
    old_speed: f32,
    new_speed: f32,
    original_duration: f64,
) -> ClipPosition {
    let base = position.duration() * old_speed as f64;
    let end = (position.start_time + base / new_speed as f64)
        .min(original_duration)
        .max(position.start_time + MIN_CLIP_DURATION);
    ClipPosition::new(position.start_time, end)
}

/// The single video placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub asset_id: AssetId,
    pub name: String,
    pub source: PathBuf,
    pub original_duration: f64,
    pub position: ClipPosition,
    pub transform: Transform,
    pub effects: Effects,
    pub audio: AudioSettings,
}

impl Clip {
    /// Place an asset untrimmed, with identity parameters
    pub fn from_asset(asset: &MediaAsset) -> Result<Self> {
        let position = ClipPosition::new(0.0, asset.duration).validate(asset.duration)?;
        Ok(Self {
            id: Uuid::new_v4(),
            asset_id: asset.id,
            name: asset.name.clone(),
            source: asset.path.clone(),
            original_duration: asset.duration,
            position,
            transform: Transform::default(),
            effects: Effects::default(),
            audio: AudioSettings::default(),
        })
    }

    /// Length of the trimmed window
    pub fn duration(&self) -> f64 {
        self.position.duration()
    }

    /// Source timestamp for a time relative to the trimmed window
    pub fn source_time(&self, relative: f64) -> f64 {
        (self.position.start_time + relative.clamp(0.0, self.duration()))
            .min(self.position.end_time)
    }
}
