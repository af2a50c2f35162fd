use crate::error::{EditorError, Result};
use crate::media::FfmpegTools;
use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::Duration;
use uuid::Uuid;

/// Extracted soundtrack on disk, deleted when the last owner lets go
#[derive(Debug)]
struct TempAudio(PathBuf);

impl Drop for TempAudio {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.0) {
            log::debug!("Could not remove {}: {}", self.0.display(), e);
        }
    }
}

type TempAudioSlot = Mutex<Option<TempAudio>>;

/// Hand a finished extraction to its player. If the player is already gone
/// the file is deleted here instead.
fn deliver_temp_audio(slot: &Weak<TempAudioSlot>, temp: TempAudio) {
    match slot.upgrade() {
        Some(slot) => *slot.lock() = Some(temp),
        None => log::debug!("Player closed before audio for {} was ready", temp.0.display()),
    }
}

/// Audio player using rodio for playback.
/// The soundtrack is extracted in the background; playback starts once ready.
pub struct AudioPlayer {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Arc<Sink>,
    temp_audio: Arc<TempAudioSlot>,
    volume: Arc<Mutex<f32>>,
}

impl AudioPlayer {
    /// Open the default output. Extraction runs on a separate thread so the
    /// caller is not blocked.
    pub fn new(tools: &FfmpegTools, video_path: &Path) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| EditorError::VideoDecode(format!("no audio output: {}", e)))?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| EditorError::VideoDecode(format!("audio sink: {}", e)))?;

        let temp_audio: Arc<TempAudioSlot> = Arc::new(Mutex::new(None));

        let tools = tools.clone();
        let path = video_path.to_path_buf();
        let slot = Arc::downgrade(&temp_audio);
        std::thread::spawn(move || match extract_audio_to_temp(&tools, &path) {
            Ok(temp) => {
                let non_empty = std::fs::metadata(&temp.0)
                    .map(|m| m.len() > 0)
                    .unwrap_or(false);
                if non_empty {
                    deliver_temp_audio(&slot, temp);
                }
            }
            Err(e) => log::warn!("No audio for {}: {}", path.display(), e),
        });

        Ok(Self {
            _stream: stream,
            _stream_handle: stream_handle,
            sink: Arc::new(sink),
            temp_audio,
            volume: Arc::new(Mutex::new(1.0)),
        })
    }

    pub fn play(&self) {
        self.sink.play();
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn stop(&self) {
        self.sink.stop();
        self.sink.clear();
    }

    /// Volume in 0.0..=2.0; muting is volume 0
    pub fn set_volume(&self, vol: f32) {
        let clamped = vol.clamp(0.0, 2.0);
        *self.volume.lock() = clamped;
        self.sink.set_volume(clamped);
    }

    pub fn set_speed(&self, speed: f32) {
        self.sink.set_speed(speed);
    }

    /// Reload the track starting at `time` source seconds. Leaves the sink paused.
    pub fn seek(&self, time: f64) {
        self.sink.stop();
        self.sink.clear();

        let guard = self.temp_audio.lock();
        if let Some(TempAudio(ref temp_path)) = *guard {
            match File::open(temp_path)
                .map_err(|e| e.to_string())
                .and_then(|file| Decoder::new(BufReader::new(file)).map_err(|e| e.to_string()))
            {
                Ok(source) => {
                    let skipped = source.skip_duration(Duration::from_secs_f64(time.max(0.0)));
                    self.sink.append(skipped);
                    self.sink.set_volume(*self.volume.lock());
                }
                Err(e) => log::warn!("Audio seek failed: {}", e),
            }
        }
    }
}

/// Fresh WAV path per extraction, so players never share a file
fn temp_audio_path(video_path: &Path) -> PathBuf {
    let file_stem = video_path.file_stem().unwrap_or_default().to_string_lossy();
    std::env::temp_dir().join(format!(
        "template_studio_audio_{}_{}.wav",
        file_stem,
        Uuid::new_v4().simple()
    ))
}

/// Extract audio from video to a temporary WAV file
fn extract_audio_to_temp(tools: &FfmpegTools, video_path: &Path) -> Result<TempAudio> {
    // Owned from here on so a failed run cleans up too
    let temp = TempAudio(temp_audio_path(video_path));

    let output = tools
        .ffmpeg()
        .args(["-y", "-i"])
        .arg(video_path)
        .args([
            "-vn",
            "-acodec", "pcm_s16le",
            "-ar", "44100",
            "-ac", "2",
        ])
        .arg(&temp.0)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(EditorError::VideoDecode("audio extraction failed".to_string()));
    }

    Ok(temp)
}
