use crate::project::ClipPosition;
use crate::timeline::TimeMapper;

/// Distance from either viewport edge at which playback scrolls the track
pub const AUTOSCROLL_MARGIN: f64 = 50.0;

/// Visible slice of the scroll content, in track pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_offset: f64,
    pub width: f64,
}

impl Viewport {
    pub fn new(scroll_offset: f64, width: f64) -> Self {
        Self {
            scroll_offset,
            width,
        }
    }

    pub fn right(&self) -> f64 {
        self.scroll_offset + self.width
    }

    #[cfg(test)]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.scroll_offset && x <= self.right()
    }
}

/// Track x of the playhead. `current_time` is relative to the trimmed window.
pub fn playhead_x(mapper: &TimeMapper, position: ClipPosition, current_time: f64) -> f64 {
    mapper.pixel_of_time(position.start_time + current_time)
}

/// New scroll offset when the playhead nears or leaves the viewport.
///
/// The playhead is placed `margin` pixels in from the left edge so forward
/// playback runs into view. Returns `None` when no scroll is needed.
pub fn autoscroll_target(
    playhead_x: f64,
    viewport: Viewport,
    content_width: f64,
    margin: f64,
) -> Option<f64> {
    if viewport.width <= 0.0 || content_width <= viewport.width {
        return None;
    }
    let near_left = playhead_x < viewport.scroll_offset + margin;
    let near_right = playhead_x > viewport.right() - margin;
    if !near_left && !near_right {
        return None;
    }

    let max_offset = content_width - viewport.width;
    let target = (playhead_x - margin).clamp(0.0, max_offset);
    ((target - viewport.scroll_offset).abs() > 0.5).then_some(target)
}

/// Time relative to the trimmed window for a click at `click_x` viewport pixels
pub fn seek_time_for_click(
    click_x: f64,
    scroll_offset: f64,
    mapper: &TimeMapper,
    position: ClipPosition,
) -> f64 {
    let absolute = mapper.time_of_pixel(click_x + scroll_offset);
    (absolute - position.start_time).clamp(0.0, position.duration().max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 20 px per second over a 60 second source: 1200 px of content
    fn mapper() -> TimeMapper {
        TimeMapper::with_content_width(60.0, 1200.0)
    }

    #[test]
    fn test_playhead_is_offset_by_clip_start() {
        let pos = ClipPosition::new(10.0, 30.0);
        assert_relative_eq!(playhead_x(&mapper(), pos, 0.0), 200.0);
        assert_relative_eq!(playhead_x(&mapper(), pos, 5.0), 300.0);
    }

    #[test]
    fn test_no_scroll_inside_safe_zone() {
        let viewport = Viewport::new(0.0, 400.0);
        assert_eq!(autoscroll_target(200.0, viewport, 1200.0, 50.0), None);
        assert_eq!(autoscroll_target(349.0, viewport, 1200.0, 50.0), None);
    }

    #[test]
    fn test_scrolls_near_right_edge() {
        let viewport = Viewport::new(0.0, 400.0);
        let target = autoscroll_target(380.0, viewport, 1200.0, 50.0).unwrap();
        assert_relative_eq!(target, 330.0);
        assert!(Viewport::new(target, 400.0).contains(380.0));
    }

    #[test]
    fn test_scrolls_back_when_playhead_behind_view() {
        let viewport = Viewport::new(600.0, 400.0);
        let target = autoscroll_target(100.0, viewport, 1200.0, 50.0).unwrap();
        assert_relative_eq!(target, 50.0);
    }

    #[test]
    fn test_scroll_clamped_to_content() {
        let viewport = Viewport::new(800.0, 400.0);
        // Already scrolled to the end of the content
        assert_eq!(autoscroll_target(1190.0, viewport, 1200.0, 50.0), None);

        let viewport = Viewport::new(100.0, 400.0);
        let target = autoscroll_target(20.0, viewport, 1200.0, 50.0).unwrap();
        assert_eq!(target, 0.0);
    }

    #[test]
    fn test_no_scroll_when_content_fits() {
        let viewport = Viewport::new(0.0, 1200.0);
        assert_eq!(autoscroll_target(1190.0, viewport, 1200.0, 50.0), None);
    }

    #[test]
    fn test_click_accounts_for_scroll() {
        let pos = ClipPosition::new(10.0, 30.0);
        // 100 px into a view scrolled by 300 px => 400 px => 20 s absolute
        assert_relative_eq!(seek_time_for_click(100.0, 300.0, &mapper(), pos), 10.0);
    }

    #[test]
    fn test_click_clamped_to_window() {
        let pos = ClipPosition::new(10.0, 30.0);
        assert_eq!(seek_time_for_click(50.0, 0.0, &mapper(), pos), 0.0);
        assert_relative_eq!(seek_time_for_click(1000.0, 100.0, &mapper(), pos), 20.0);
    }
}
