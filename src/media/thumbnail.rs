use crate::error::{EditorError, Result};
use crate::media::{extract_frame, fit_frame_size, FfmpegTools, MediaInfo};
use crate::project::Thumbnail;
use std::path::Path;

/// Library thumbnails are scaled to this width
pub const THUMBNAIL_WIDTH: u32 = 160;

/// Capture point: the configured time, or the midpoint for short sources
pub fn thumbnail_time(preferred: f64, duration: f64) -> f64 {
    preferred.min(duration / 2.0).max(0.0)
}

pub fn thumbnail_size(info: &MediaInfo) -> (u32, u32) {
    fit_frame_size(info.width, info.height, THUMBNAIL_WIDTH, u32::MAX)
}

pub fn extract_thumbnail(
    tools: &FfmpegTools,
    path: &Path,
    info: &MediaInfo,
    preferred_time: f64,
) -> Result<Thumbnail> {
    let (width, height) = thumbnail_size(info);
    let time = thumbnail_time(preferred_time, info.duration);
    let frame = extract_frame(tools, path, time, width, height).map_err(|e| match e {
        EditorError::VideoDecode(msg) => EditorError::ThumbnailExtraction(msg),
        other => other,
    })?
    .ok_or_else(|| EditorError::ThumbnailExtraction(format!("no frame at {:.2}s", time)))?;
    Ok(Thumbnail::Frame {
        width: frame.width,
        height: frame.height,
        rgba: frame.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_time() {
        assert_eq!(thumbnail_time(1.0, 30.0), 1.0);
        assert_eq!(thumbnail_time(1.0, 1.2), 0.6);
        assert_eq!(thumbnail_time(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_size_from_probe() {
        let info = MediaInfo {
            duration: 10.0,
            width: 1280,
            height: 720,
            ..MediaInfo::default()
        };
        assert_eq!(thumbnail_size(&info), (160, 90));

        let portrait = MediaInfo {
            width: 1080,
            height: 1920,
            ..info
        };
        assert_eq!(thumbnail_size(&portrait), (160, 284));
    }

    #[test]
    fn test_failure_maps_to_thumbnail_error() {
        let tools = FfmpegTools::with_paths("template-studio-no-such-ffmpeg".into(), "ffprobe".into());
        let info = MediaInfo {
            duration: 10.0,
            ..MediaInfo::default()
        };
        assert!(matches!(
            extract_thumbnail(&tools, Path::new("clip.mp4"), &info, 1.0),
            Err(EditorError::ThumbnailExtraction(_))
        ));
    }
}
