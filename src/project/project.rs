use crate::error::{EditorError, Result};
use crate::project::{
    rescale_for_speed, AspectRatio, AudioSettings, Clip, ClipPosition, Effects, MediaAsset,
    Transform,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProjectId = Uuid;

pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// One template: a canvas shape and at most one clip.
///
/// Every setter replaces a whole parameter bag after validating it; a rejected
/// bag leaves the project unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub aspect_ratio: AspectRatio,
    pub clip: Option<Clip>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: &str, aspect_ratio: AspectRatio) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: normalize_name(name),
            aspect_ratio,
            clip: None,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    fn clip_mut(&mut self) -> Result<&mut Clip> {
        self.clip.as_mut().ok_or(EditorError::NoClip)
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Put an asset on the timeline, replacing whatever clip was there
    pub fn place_asset(&mut self, asset: &MediaAsset) -> Result<&Clip> {
        let clip = Clip::from_asset(asset)?;
        self.touch();
        Ok(self.clip.insert(clip))
    }

    /// Take the clip off the timeline. The asset stays in the library.
    pub fn remove_clip(&mut self) -> Option<Clip> {
        let removed = self.clip.take();
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn set_position(&mut self, position: ClipPosition) -> Result<()> {
        let clip = self.clip_mut()?;
        clip.position = position.validate(clip.original_duration)?;
        self.touch();
        Ok(())
    }

    pub fn set_transform(&mut self, transform: Transform) -> Result<()> {
        let transform = transform.validate()?;
        self.clip_mut()?.transform = transform;
        self.touch();
        Ok(())
    }

    pub fn set_effects(&mut self, effects: Effects) -> Result<()> {
        let effects = effects.validate()?;
        self.clip_mut()?.effects = effects;
        self.touch();
        Ok(())
    }

    /// Replace the audio bag. A speed change also rescales the window end.
    pub fn set_audio(&mut self, audio: AudioSettings) -> Result<()> {
        let audio = audio.validate()?;
        let clip = self.clip_mut()?;
        if audio.speed != clip.audio.speed {
            clip.position = rescale_for_speed(
                clip.position,
                clip.audio.speed,
                audio.speed,
                clip.original_duration,
            );
        }
        clip.audio = audio;
        self.touch();
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        if self.aspect_ratio != aspect_ratio {
            self.aspect_ratio = aspect_ratio;
            self.touch();
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.name = normalize_name(name);
        self.touch();
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(UNTITLED_PROJECT, AspectRatio::default())
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNTITLED_PROJECT.to_string()
    } else {
        trimmed.to_string()
    }
}
