use crate::media::VideoFrame;
use std::collections::VecDeque;

/// Frames closer than this are treated as the same still
pub const CACHE_TOLERANCE: f64 = 0.05;
const CACHE_CAPACITY: usize = 60;

/// Recently decoded frames keyed by source time, oldest evicted first
#[derive(Debug, Default)]
pub struct FrameCache {
    frames: VecDeque<VideoFrame>,
}

impl FrameCache {
    pub fn get(&self, time: f64, tolerance: f64) -> Option<VideoFrame> {
        self.frames
            .iter()
            .filter(|f| (f.pts - time).abs() < tolerance)
            .min_by(|a, b| (a.pts - time).abs().total_cmp(&(b.pts - time).abs()))
            .cloned()
    }

    pub fn insert(&mut self, frame: VideoFrame) {
        if self.frames.iter().any(|f| (f.pts - frame.pts).abs() < f64::EPSILON) {
            return;
        }
        self.frames.push_back(frame);
        if self.frames.len() > CACHE_CAPACITY {
            self.frames.pop_front();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.frames.len()
    }
}
