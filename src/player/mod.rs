mod audio_player;
mod cache;
mod seek;
mod sync;

pub use audio_player::*;
pub use cache::*;
pub use seek::*;
pub use sync::*;

use crate::error::{EditorError, Result};
use crate::media::{extract_frame, fit_frame_size, FfmpegTools, VideoFrame, MAX_PREVIEW_HEIGHT, MAX_PREVIEW_WIDTH};
use crate::project::{AudioSettings, Clip, ClipId, ClipPosition};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Preview refresh rate while playing
const FRAME_INTERVAL: f64 = 1.0 / 10.0;

/// Stills are taken at least this far before the end of the source, where
/// ffmpeg still has a frame to return
const END_MARGIN: f64 = FRAME_INTERVAL;

/// Where extraction results land; shared with the worker threads
#[derive(Clone, Default)]
struct FrameSlots {
    current: Arc<Mutex<Option<VideoFrame>>>,
    cache: Arc<Mutex<FrameCache>>,
    decode_error: Arc<Mutex<Option<String>>>,
}

impl FrameSlots {
    /// Publish one extraction. A decoded frame clears an earlier failure;
    /// no frame at all leaves the previous one on screen. Returns false on
    /// a decode failure.
    fn commit(&self, path: &Path, result: Result<Option<VideoFrame>>) -> bool {
        match result {
            Ok(Some(frame)) => {
                self.cache.lock().insert(frame.clone());
                *self.current.lock() = Some(frame);
                *self.decode_error.lock() = None;
                true
            }
            Ok(None) => {
                log::debug!("No frame left to decode in {}", path.display());
                true
            }
            Err(e) => {
                record_decode_error(&self.decode_error, path, e);
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Plays the trimmed window of the timeline clip.
///
/// All times passed in or out are relative to the window start; the clock
/// runs at the clip's speed.
pub struct PreviewPlayer {
    tools: FfmpegTools,
    clip_id: ClipId,
    path: PathBuf,
    frame_size: (u32, u32),
    original_duration: f64,
    window: Arc<Mutex<ClipPosition>>,
    state: Arc<Mutex<PlaybackState>>,
    clock: Arc<Mutex<PlaybackClock>>,
    frames: FrameSlots,
    seeks: Arc<Mutex<SeekQueue>>,
    loop_generation: Arc<AtomicU64>,
    audio_player: Option<AudioPlayer>,
}

impl PreviewPlayer {
    pub fn new(tools: &FfmpegTools, clip: &Clip, source_width: u32, source_height: u32) -> Self {
        let audio_player = match AudioPlayer::new(tools, &clip.source) {
            Ok(audio) => Some(audio),
            Err(e) => {
                log::warn!("Preview without audio: {}", e);
                None
            }
        };

        let player = Self {
            tools: tools.clone(),
            clip_id: clip.id,
            path: clip.source.clone(),
            frame_size: fit_frame_size(source_width, source_height, MAX_PREVIEW_WIDTH, MAX_PREVIEW_HEIGHT),
            original_duration: clip.original_duration,
            window: Arc::new(Mutex::new(clip.position)),
            state: Arc::new(Mutex::new(PlaybackState::Stopped)),
            clock: Arc::new(Mutex::new(PlaybackClock::new())),
            frames: FrameSlots::default(),
            seeks: Arc::new(Mutex::new(SeekQueue::default())),
            loop_generation: Arc::new(AtomicU64::new(0)),
            audio_player,
        };
        player.set_audio(&clip.audio);
        player.extract_frame_at(0.0);
        player
    }

    pub fn clip_id(&self) -> ClipId {
        self.clip_id
    }

    /// Follow a trim or move. Time is clamped into the new window.
    pub fn set_window(&self, position: ClipPosition) {
        if *self.window.lock() == position {
            return;
        }
        *self.window.lock() = position;
        let time = self.current_time().min(position.duration());
        self.seek(time);
    }

    pub fn set_audio(&self, audio: &AudioSettings) {
        self.clock.lock().set_rate(audio.speed as f64);
        if let Some(ref player) = self.audio_player {
            player.set_volume(audio.effective_volume());
            player.set_speed(audio.speed);
        }
    }

    pub fn play(&self) -> Result<()> {
        if let Some(err) = self.decode_error() {
            return Err(EditorError::VideoDecode(err));
        }
        let window = *self.window.lock();
        if reached_end(window, self.current_time()) {
            self.clock.lock().set_time(0.0);
        }

        *self.state.lock() = PlaybackState::Playing;
        let time = self.current_time();
        if let Some(ref audio) = self.audio_player {
            audio.seek(window.start_time + time);
            audio.play();
        }
        self.clock.lock().resume();
        self.start_playback_loop();
        Ok(())
    }

    pub fn pause(&self) {
        *self.state.lock() = PlaybackState::Paused;
        self.clock.lock().pause();
        if let Some(ref audio) = self.audio_player {
            audio.pause();
        }
    }

    pub fn stop(&self) {
        *self.state.lock() = PlaybackState::Stopped;
        self.clock.lock().reset();
        if let Some(ref audio) = self.audio_player {
            audio.stop();
        }
        self.extract_frame_at(0.0);
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        match self.state() {
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Jump to `time` seconds into the window. A paused player leaves the
    /// audio alone; `play` seeks it.
    pub fn seek(&self, time: f64) {
        let window = *self.window.lock();
        let clamped = time.clamp(0.0, window.duration().max(0.0));
        self.clock.lock().set_time(clamped);
        if self.state() == PlaybackState::Playing {
            if let Some(ref audio) = self.audio_player {
                audio.seek(window.start_time + clamped);
                audio.play();
            }
        }
        self.extract_frame_at(clamped);
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Seconds into the window
    pub fn current_time(&self) -> f64 {
        self.clock.lock().get_time()
    }

    pub fn current_frame(&self) -> Option<VideoFrame> {
        self.frames.current.lock().clone()
    }

    /// Last decode failure; playback is disabled until a frame decodes again
    pub fn decode_error(&self) -> Option<String> {
        self.frames.decode_error.lock().clone()
    }

    /// Show the still at `relative` seconds into the window. Requests made
    /// while an extraction is running are coalesced to the newest one.
    fn extract_frame_at(&self, relative: f64) {
        let source_time = extraction_time(*self.window.lock(), relative, self.original_duration);
        if let Some(frame) = self.frames.cache.lock().get(source_time, CACHE_TOLERANCE) {
            self.seeks.lock().cancel();
            *self.frames.current.lock() = Some(frame);
            return;
        }
        if !self.seeks.lock().request(source_time) {
            return;
        }

        let tools = self.tools.clone();
        let path = self.path.clone();
        let (width, height) = self.frame_size;
        let frames = self.frames.clone();
        let seeks = self.seeks.clone();
        std::thread::spawn(move || {
            loop {
                // Bound first so the queue is unlocked while ffmpeg runs
                let next = seeks.lock().next();
                let Some((generation, time)) = next else {
                    break;
                };
                let result = extract_frame(&tools, &path, time, width, height);
                if seeks.lock().is_current(generation) {
                    frames.commit(&path, result);
                }
            }
        });
    }

    fn start_playback_loop(&self) {
        // A newer loop makes older ones exit
        let generation = self.loop_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let loop_generation = self.loop_generation.clone();
        let tools = self.tools.clone();
        let path = self.path.clone();
        let (width, height) = self.frame_size;
        let window = self.window.clone();
        let state = self.state.clone();
        let clock = self.clock.clone();
        let frames = self.frames.clone();
        let original_duration = self.original_duration;

        std::thread::spawn(move || {
            let mut last_frame_time = f64::NEG_INFINITY;

            loop {
                if *state.lock() != PlaybackState::Playing
                    || loop_generation.load(Ordering::SeqCst) != generation
                {
                    break;
                }

                let position = *window.lock();
                let time = clock.lock().get_time();
                if reached_end(position, time) {
                    let mut clock = clock.lock();
                    clock.pause();
                    clock.set_time(position.duration());
                    *state.lock() = PlaybackState::Paused;
                    break;
                }

                if (time - last_frame_time).abs() >= FRAME_INTERVAL {
                    last_frame_time = time;
                    let source_time = extraction_time(position, time, original_duration);

                    let cached = frames.cache.lock().get(source_time, FRAME_INTERVAL);
                    let result = match cached {
                        Some(frame) => Ok(Some(frame)),
                        None => extract_frame(&tools, &path, source_time, width, height),
                    };
                    if !frames.commit(&path, result) {
                        clock.lock().pause();
                        *state.lock() = PlaybackState::Stopped;
                        break;
                    }
                }

                std::thread::sleep(Duration::from_millis(50));
            }
        });
    }
}

impl Drop for PreviewPlayer {
    fn drop(&mut self) {
        *self.state.lock() = PlaybackState::Stopped;
    }
}

/// Whether `relative` has run off the end of the window
pub fn reached_end(window: ClipPosition, relative: f64) -> bool {
    relative >= window.duration()
}

/// Source second to decode for `relative` seconds into the window, kept
/// clear of the end of the stream
pub fn extraction_time(window: ClipPosition, relative: f64, original_duration: f64) -> f64 {
    (window.start_time + relative)
        .min(original_duration - END_MARGIN)
        .max(window.start_time)
        .max(0.0)
}

fn record_decode_error(slot: &Mutex<Option<String>>, path: &Path, error: EditorError) {
    let mut slot = slot.lock();
    if slot.is_none() {
        log::error!("Preview decode failed for {}: {}", path.display(), error);
        *slot = Some(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_end() {
        let window = ClipPosition::new(5.0, 8.0);
        assert!(!reached_end(window, 0.0));
        assert!(!reached_end(window, 2.99));
        assert!(reached_end(window, 3.0));
        assert!(reached_end(window, 7.0));
    }

    #[test]
    fn test_extraction_stays_before_stream_end() {
        let untrimmed = ClipPosition::new(0.0, 10.0);
        assert_eq!(extraction_time(untrimmed, 2.0, 10.0), 2.0);
        // Right edge of an untrimmed clip
        assert!(extraction_time(untrimmed, 10.0, 10.0) < 10.0);
        assert!((extraction_time(untrimmed, 10.0, 10.0) - (10.0 - END_MARGIN)).abs() < 1e-9);

        // Never before the window start, even for a window shorter than the margin
        let tail = ClipPosition::new(9.95, 10.0);
        assert_eq!(extraction_time(tail, 0.05, 10.0), 9.95);
    }

    fn frame(pts: f64) -> VideoFrame {
        VideoFrame {
            data: Arc::new(vec![0; 4]),
            width: 1,
            height: 1,
            pts,
        }
    }

    #[test]
    fn test_seek_past_last_frame_keeps_playback() {
        let slots = FrameSlots::default();
        let path = Path::new("clip.mp4");
        assert!(slots.commit(path, Ok(Some(frame(0.0)))));

        // ffmpeg seeking onto EOF: clean exit, empty stdout
        let empty = crate::media::frame_from_raw(Vec::new(), 640, 480, 10.0);
        assert!(slots.commit(path, empty));
        assert!(slots.decode_error.lock().is_none());
        assert_eq!(slots.current.lock().as_ref().map(|f| f.pts), Some(0.0));
    }

    #[test]
    fn test_decoded_frame_clears_failure() {
        let slots = FrameSlots::default();
        let path = Path::new("clip.mp4");
        let failed = Err(EditorError::VideoDecode("broken packet".into()));
        assert!(!slots.commit(path, failed));
        assert!(slots.decode_error.lock().is_some());

        assert!(slots.commit(path, Ok(Some(frame(2.0)))));
        assert!(slots.decode_error.lock().is_none());
        assert_eq!(slots.current.lock().as_ref().map(|f| f.pts), Some(2.0));
    }

    #[test]
    fn test_decode_error_recorded_once() {
        let slot = Mutex::new(None);
        let path = Path::new("clip.mp4");
        record_decode_error(&slot, path, EditorError::VideoDecode("first".into()));
        record_decode_error(&slot, path, EditorError::VideoDecode("second".into()));
        assert_eq!(slot.lock().as_deref(), Some("Video decode failed: first"));
    }
}
