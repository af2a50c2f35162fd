use crate::config::EditorConfig;
use std::process::{Command, Stdio};

/// Locations of the ffmpeg binaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegTools {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegTools {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }

    pub fn with_paths(ffmpeg_path: String, ffprobe_path: String) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_paths(config.ffmpeg_path.clone(), config.ffprobe_path.clone())
    }

    pub fn ffmpeg(&self) -> Command {
        background_command(&self.ffmpeg_path)
    }

    pub fn ffprobe(&self) -> Command {
        background_command(&self.ffprobe_path)
    }

    /// Check if FFmpeg is available
    pub fn is_available(&self) -> bool {
        self.ffmpeg()
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self::new()
    }
}

/// Command that does not pop a console window on Windows
fn background_command(program: &str) -> Command {
    #[allow(unused_mut)]
    let mut cmd = Command::new(program);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_config() {
        let config = EditorConfig {
            ffmpeg_path: "/usr/local/bin/ffmpeg".to_string(),
            ..EditorConfig::default()
        };
        let tools = FfmpegTools::from_config(&config);
        assert_eq!(
            tools,
            FfmpegTools::with_paths("/usr/local/bin/ffmpeg".into(), "ffprobe".into())
        );
        assert_eq!(tools.ffmpeg().get_program(), "/usr/local/bin/ffmpeg");
        assert_eq!(tools.ffprobe().get_program(), "ffprobe");
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let tools = FfmpegTools::with_paths(
            "template-studio-no-such-ffmpeg".into(),
            "template-studio-no-such-ffprobe".into(),
        );
        assert!(!tools.is_available());
    }
}
