use crate::error::{EditorError, Result};
use crate::media::FfmpegTools;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub framerate: Option<f64>,
    pub format_name: String,
    pub file_size: u64,
}

impl MediaInfo {
    pub fn has_video(&self) -> bool {
        self.video_codec.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.audio_codec.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct FFProbeOutput {
    format: Option<FFProbeFormat>,
    streams: Option<Vec<FFProbeStream>>,
}

#[derive(Debug, Deserialize)]
struct FFProbeFormat {
    duration: Option<String>,
    format_name: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

pub fn probe_file(tools: &FfmpegTools, path: &Path) -> Result<MediaInfo> {
    let output = tools
        .ffprobe()
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| EditorError::Probe(format!("could not run ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EditorError::Probe(format!("ffprobe failed: {}", stderr.trim())));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `ffprobe -print_format json -show_format -show_streams` output.
///
/// Files without a usable duration are rejected: the timeline cannot be
/// laid out without one.
pub fn parse_probe_output(json: &str) -> Result<MediaInfo> {
    let probe_output: FFProbeOutput = serde_json::from_str(json)
        .map_err(|e| EditorError::Probe(format!("unreadable ffprobe output: {}", e)))?;

    let mut info = MediaInfo::default();
    let mut stream_duration: Option<f64> = None;

    if let Some(format) = probe_output.format {
        info.duration = format.duration.and_then(|d| parse_seconds(&d)).unwrap_or(0.0);
        info.format_name = format.format_name.unwrap_or_default();
        info.file_size = format.size.and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
    }

    for stream in probe_output.streams.unwrap_or_default() {
        match stream.codec_type.as_deref().unwrap_or("") {
            // First video stream wins
            "video" if info.video_codec.is_none() => {
                info.video_codec = stream.codec_name;
                info.width = stream.width.unwrap_or(0);
                info.height = stream.height.unwrap_or(0);
                info.framerate = stream.r_frame_rate.and_then(|r| parse_framerate(&r));
                stream_duration = stream.duration.and_then(|d| parse_seconds(&d));
            }
            "audio" if info.audio_codec.is_none() => {
                info.audio_codec = stream.codec_name;
            }
            _ => {}
        }
    }

    if info.duration <= 0.0 {
        info.duration = stream_duration.unwrap_or(0.0);
    }
    if info.duration <= 0.0 {
        return Err(EditorError::Probe("no duration reported".to_string()));
    }

    Ok(info)
}

fn parse_seconds(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}

fn parse_framerate(fps_str: &str) -> Option<f64> {
    let parts: Vec<&str> = fps_str.split('/').collect();
    if parts.len() == 2 {
        let num: f64 = parts[0].parse().ok()?;
        let den: f64 = parts[1].parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    fps_str.parse().ok()
}
