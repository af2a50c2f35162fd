use crate::error::{EditorError, Result};
use crate::media::FfmpegTools;
use std::path::Path;
use std::sync::Arc;

/// Largest preview frame pulled from ffmpeg (480p)
pub const MAX_PREVIEW_WIDTH: u32 = 854;
pub const MAX_PREVIEW_HEIGHT: u32 = 480;

/// A decoded RGBA frame
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub data: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    /// Source time the frame was taken at
    pub pts: f64,
}

/// Output size that fits `max_width` x `max_height` keeping the source aspect.
/// Dimensions are even, as most ffmpeg scalers require. Unknown sources
/// are assumed to be 16:9.
pub fn fit_frame_size(source_width: u32, source_height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let known = source_width > 0 && source_height > 0;
    let (sw, sh) = if known {
        (source_width as f64, source_height as f64)
    } else {
        (16.0, 9.0)
    };
    let mut scale = (max_width as f64 / sw).min(max_height as f64 / sh);
    if known {
        // Never upscale a real source
        scale = scale.min(1.0);
    }
    let even = |v: f64| ((v / 2.0).round() as u32 * 2).max(2);
    (even(sw * scale), even(sh * scale))
}

/// Pull a single frame at `time` through a raw RGBA pipe: no temp files,
/// no image encoding. `Ok(None)` means ffmpeg found no frame at or after
/// `time`, which happens when seeking onto the end of the stream.
pub fn extract_frame(tools: &FfmpegTools, path: &Path, time: f64, width: u32, height: u32) -> Result<Option<VideoFrame>> {
    let output = tools
        .ffmpeg()
        .args([
            "-ss", &format!("{:.3}", time.max(0.0)), // Seek before input (fast)
            "-i",
        ])
        .arg(path)
        .args([
            "-vframes", "1",
            "-vf", &format!("scale={}:{}", width, height),
            "-f", "rawvideo",
            "-pix_fmt", "rgba",
            "-",
        ])
        .output()
        .map_err(|e| EditorError::VideoDecode(format!("could not run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EditorError::VideoDecode(
            stderr.lines().last().unwrap_or("unknown error").to_string(),
        ));
    }

    frame_from_raw(output.stdout, width, height, time)
}

/// Validate an RGBA buffer against the requested size. Empty output is not
/// an error: there was simply no frame left to decode.
pub fn frame_from_raw(data: Vec<u8>, width: u32, height: u32, pts: f64) -> Result<Option<VideoFrame>> {
    if data.is_empty() {
        return Ok(None);
    }
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(EditorError::VideoDecode(format!(
            "unexpected frame size: got {} bytes, expected {}",
            data.len(),
            expected
        )));
    }
    Ok(Some(VideoFrame {
        data: Arc::new(data),
        width,
        height,
        pts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_keeps_aspect_and_even_sizes() {
        assert_eq!(fit_frame_size(1920, 1080, 854, 480), (854, 480));
        assert_eq!(fit_frame_size(1080, 1920, 854, 480), (270, 480));
        assert_eq!(fit_frame_size(1920, 1080, 160, 1000), (160, 90));
        assert_eq!(fit_frame_size(1001, 1001, 160, 1000), (160, 160));
    }

    #[test]
    fn test_fit_does_not_upscale() {
        assert_eq!(fit_frame_size(320, 240, 854, 480), (320, 240));
    }

    #[test]
    fn test_fit_unknown_source() {
        assert_eq!(fit_frame_size(0, 0, 160, 1000), (160, 90));
    }

    #[test]
    fn test_raw_frame_size_checked() {
        let frame = frame_from_raw(vec![0; 2 * 2 * 4], 2, 2, 1.5).unwrap().unwrap();
        assert_eq!((frame.width, frame.height, frame.pts), (2, 2, 1.5));
        assert!(matches!(
            frame_from_raw(vec![0; 15], 2, 2, 0.0),
            Err(EditorError::VideoDecode(_))
        ));
    }

    #[test]
    fn test_empty_output_past_last_frame() {
        // ffmpeg exits cleanly with nothing on stdout when seeking onto EOF
        assert_eq!(frame_from_raw(Vec::new(), 640, 480, 10.0).unwrap(), None);
    }

    #[test]
    fn test_missing_ffmpeg_is_decode_error() {
        let tools = FfmpegTools::with_paths("template-studio-no-such-ffmpeg".into(), "ffprobe".into());
        let result = extract_frame(&tools, Path::new("clip.mp4"), 0.0, 16, 16);
        assert!(matches!(result, Err(EditorError::VideoDecode(_))));
    }
}
