/// Coalesces still-frame requests so at most one ffmpeg seek runs at a time.
///
/// Every request supersedes the ones before it. A worker takes the newest
/// pending request when it finishes, and only the newest generation may
/// publish its frame.
#[derive(Debug, Default)]
pub struct SeekQueue {
    latest: u64,
    pending: Option<(u64, f64)>,
    running: bool,
}

impl SeekQueue {
    /// Queue a seek to `source_time`. Returns true when no worker is running
    /// and the caller has to start one.
    pub fn request(&mut self, source_time: f64) -> bool {
        self.latest += 1;
        self.pending = Some((self.latest, source_time));
        let start = !self.running;
        self.running = true;
        start
    }

    /// Next request for the worker; `None` retires it
    pub fn next(&mut self) -> Option<(u64, f64)> {
        let next = self.pending.take();
        if next.is_none() {
            self.running = false;
        }
        next
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }

    /// Drop whatever is queued or in flight, e.g. after a cache hit
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_coalesces_into_one_worker() {
        let mut queue = SeekQueue::default();
        assert!(queue.request(1.0));

        // Worker picks up the first seek; the drag keeps moving meanwhile
        let (first, _) = queue.next().unwrap();
        for step in 1..30 {
            assert!(!queue.request(1.0 + step as f64 * 0.1));
        }
        assert!(!queue.is_current(first));

        // Only the last position is left to extract
        let (last, time) = queue.next().unwrap();
        assert!(queue.is_current(last));
        assert!((time - 3.9).abs() < 1e-9);
        assert!(queue.next().is_none());

        // Retired worker means the next request starts a new one
        assert!(queue.request(5.0));
    }

    #[test]
    fn test_cancel_invalidates_in_flight() {
        let mut queue = SeekQueue::default();
        queue.request(2.0);
        let (generation, _) = queue.next().unwrap();
        queue.cancel();
        assert!(!queue.is_current(generation));
        assert!(queue.next().is_none());
    }
}
