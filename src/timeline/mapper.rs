//! Conversions between source time and scroll-content pixels.
//!
//! Zoom is a detail level, not a pixels-per-second scale: it picks one of a
//! few fixed view durations, and the scrollable track is sized so that one
//! view duration spans the visible container.

use crate::error::{EditorError, Result};
use crate::timeline::Zoom;

/// Span of source time visible across the container at this zoom
pub fn view_duration(zoom: Zoom, original_duration: f64) -> f64 {
    let level = zoom.level();
    if level >= 1.5 {
        original_duration / 1.5
    } else if level >= 1.25 {
        original_duration / 1.25
    } else if level >= 1.0 {
        original_duration
    } else if level >= 0.75 {
        original_duration * 1.25
    } else if level >= 0.5 {
        original_duration * 1.5
    } else {
        original_duration * 2.0
    }
}

/// Width of the scrollable track, never narrower than the container
pub fn scroll_content_width(container_width: f64, original_duration: f64, view_duration: f64) -> f64 {
    if !(view_duration > 0.0) || !view_duration.is_finite() {
        return container_width.max(0.0);
    }
    container_width.max(original_duration / view_duration * container_width)
}

/// Linear map between `[0, duration]` and `[0, content_width]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeMapper {
    original_duration: f64,
    content_width: f64,
}

impl TimeMapper {
    pub fn new(zoom: Zoom, original_duration: f64, container_width: f64) -> Self {
        let view = view_duration(zoom, original_duration);
        Self {
            original_duration,
            content_width: scroll_content_width(container_width, original_duration, view),
        }
    }

    /// Build directly from a known track width
    #[cfg(test)]
    pub fn with_content_width(original_duration: f64, content_width: f64) -> Self {
        Self {
            original_duration,
            content_width,
        }
    }

    /// False for zero-width tracks or zero-length sources
    pub fn is_available(&self) -> bool {
        self.content_width.is_finite()
            && self.content_width > 0.0
            && self.original_duration.is_finite()
            && self.original_duration > 0.0
    }

    pub fn content_width(&self) -> f64 {
        if self.content_width.is_finite() {
            self.content_width.max(0.0)
        } else {
            0.0
        }
    }

    pub fn original_duration(&self) -> f64 {
        self.original_duration
    }

    /// Position of `time` on the track; 0 when no mapping exists
    pub fn pixel_of_time(&self, time: f64) -> f64 {
        if !self.is_available() {
            return 0.0;
        }
        time / self.original_duration * self.content_width
    }

    /// Source time at pixel `x`; 0 when no mapping exists
    pub fn time_of_pixel(&self, x: f64) -> f64 {
        self.try_time_of_pixel(x).unwrap_or(0.0)
    }

    pub fn try_time_of_pixel(&self, x: f64) -> Result<f64> {
        if !self.is_available() {
            return Err(EditorError::InvalidDragGeometry {
                width: self.content_width,
                duration: self.original_duration,
            });
        }
        Ok(x / self.content_width * self.original_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_duration_steps() {
        let d = 60.0;
        assert_relative_eq!(view_duration(Zoom::new(1.75), d), 40.0);
        assert_relative_eq!(view_duration(Zoom::new(1.5), d), 40.0);
        assert_relative_eq!(view_duration(Zoom::new(1.3), d), 48.0);
        assert_relative_eq!(view_duration(Zoom::new(1.0), d), 60.0);
        assert_relative_eq!(view_duration(Zoom::new(1.2), d), 60.0);
        assert_relative_eq!(view_duration(Zoom::new(0.8), d), 75.0);
        assert_relative_eq!(view_duration(Zoom::new(0.5), d), 90.0);
        assert_relative_eq!(view_duration(Zoom::new(0.25), d), 120.0);
    }

    #[test]
    fn test_content_never_narrower_than_container() {
        for level in [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75] {
            let mapper = TimeMapper::new(Zoom::new(level), 30.0, 800.0);
            assert!(mapper.content_width() >= 800.0);
        }
        let zoomed = TimeMapper::new(Zoom::new(1.5), 30.0, 800.0);
        assert_relative_eq!(zoomed.content_width(), 1200.0);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        for level in [0.25, 0.6, 1.0, 1.3, 1.75] {
            for duration in [0.5, 7.0, 45.0, 3600.0] {
                let mapper = TimeMapper::new(Zoom::new(level), duration, 937.0);
                let steps = 200;
                for i in 0..=steps {
                    let t = duration * i as f64 / steps as f64;
                    let back = mapper.time_of_pixel(mapper.pixel_of_time(t));
                    assert_relative_eq!(back, t, max_relative = 1e-6, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_end_maps_to_content_edge() {
        let mapper = TimeMapper::new(Zoom::default(), 10.0, 500.0);
        assert_relative_eq!(mapper.pixel_of_time(10.0), 500.0);
        assert_relative_eq!(mapper.time_of_pixel(250.0), 5.0);
    }

    #[test]
    fn test_zero_width_has_no_mapping() {
        let mapper = TimeMapper::new(Zoom::default(), 10.0, 0.0);
        assert!(!mapper.is_available());
        assert_eq!(mapper.pixel_of_time(5.0), 0.0);
        assert_eq!(mapper.time_of_pixel(100.0), 0.0);
        assert!(matches!(
            mapper.try_time_of_pixel(100.0),
            Err(EditorError::InvalidDragGeometry { .. })
        ));
    }

    #[test]
    fn test_zero_duration_has_no_mapping() {
        let mapper = TimeMapper::new(Zoom::default(), 0.0, 800.0);
        assert!(!mapper.is_available());
        let x = mapper.pixel_of_time(3.0);
        assert!(!x.is_nan());
        assert_eq!(x, 0.0);
    }
}
