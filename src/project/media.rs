use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub type AssetId = Uuid;

/// Duration assumed when a file cannot be probed
pub const FALLBACK_DURATION: f64 = 60.0;

/// Library preview image
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Thumbnail {
    Frame {
        width: u32,
        height: u32,
        rgba: Arc<Vec<u8>>,
    },
    #[default]
    Placeholder,
}

impl Thumbnail {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Thumbnail::Placeholder)
    }
}

/// An imported source file
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub id: AssetId,
    pub name: String,
    pub path: PathBuf,
    pub duration: f64,
    pub byte_size: u64,
    pub width: u32,
    pub height: u32,
    pub thumbnail: Thumbnail,
    /// False when probing failed and duration is the fallback
    pub decode_ok: bool,
}

impl MediaAsset {
    pub fn filename(path: &std::path::Path) -> String {
        path.file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn resolution_string(&self) -> String {
        if self.width > 0 && self.height > 0 {
            format!("{}x{}", self.width, self.height)
        } else {
            "N/A".to_string()
        }
    }

    pub fn duration_string(&self) -> String {
        crate::utils::format_time(self.duration)
    }

    #[cfg(test)]
    pub fn test_asset(name: &str, duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            path: PathBuf::from(name),
            duration,
            byte_size: 1024,
            width: 1920,
            height: 1080,
            thumbnail: Thumbnail::Placeholder,
            decode_ok: true,
        }
    }
}

/// Imported assets, independent of what is on the timeline
#[derive(Debug, Clone, Default)]
pub struct MediaLibrary {
    assets: Vec<MediaAsset>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, asset: MediaAsset) {
        self.assets.push(asset);
    }

    pub fn get(&self, id: AssetId) -> Option<&MediaAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn remove(&mut self, id: AssetId) -> Option<MediaAsset> {
        let index = self.assets.iter().position(|a| a.id == id)?;
        Some(self.assets.remove(index))
    }

    pub fn assets(&self) -> &[MediaAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.assets.iter().map(|a| a.byte_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_add_remove() {
        let mut library = MediaLibrary::new();
        let a = MediaAsset::test_asset("a.mp4", 10.0);
        let b = MediaAsset::test_asset("b.mp4", 20.0);
        let a_id = a.id;
        library.add(a);
        library.add(b);
        assert_eq!(library.len(), 2);
        assert_eq!(library.total_bytes(), 2048);

        let removed = library.remove(a_id).unwrap();
        assert_eq!(removed.name, "a.mp4");
        assert!(library.get(a_id).is_none());
        assert!(library.remove(a_id).is_none());
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            MediaAsset::filename(std::path::Path::new("/videos/intro.mp4")),
            "intro.mp4"
        );
        assert_eq!(MediaAsset::filename(std::path::Path::new("/")), "Unknown");
    }
}
