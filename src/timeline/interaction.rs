//! Drag state machines for trimming and moving the clip.
//!
//! Both drags share one `Interaction` value, so a trim and a move can never be
//! active together. Every pointer move is computed from the anchor captured at
//! drag start, never from the previous frame.

use crate::error::{EditorError, Result};
use crate::project::{ClipPosition, MIN_CLIP_DURATION};
use crate::timeline::TimeMapper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimSide {
    Left,
    Right,
}

/// Pointer x (track pixels) and clip position when the drag began
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub start_x: f64,
    pub original: ClipPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Trimming { side: TrimSide, anchor: DragAnchor },
    Dragging { anchor: DragAnchor },
}

impl Interaction {
    pub fn is_active(&self) -> bool {
        !matches!(self, Interaction::Idle)
    }

    pub fn trim_side(&self) -> Option<TrimSide> {
        match self {
            Interaction::Trimming { side, .. } => Some(*side),
            _ => None,
        }
    }

    pub fn begin_trim(&mut self, side: TrimSide, x: f64, position: ClipPosition) -> Result<()> {
        self.ensure_idle()?;
        *self = Interaction::Trimming {
            side,
            anchor: DragAnchor {
                start_x: x,
                original: position,
            },
        };
        Ok(())
    }

    pub fn begin_move(&mut self, x: f64, position: ClipPosition) -> Result<()> {
        self.ensure_idle()?;
        *self = Interaction::Dragging {
            anchor: DragAnchor {
                start_x: x,
                original: position,
            },
        };
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_active() {
            Err(EditorError::InteractionBusy)
        } else {
            Ok(())
        }
    }

    /// Position for the pointer at `x`, or `None` when idle or unmapped
    pub fn position_at(&self, x: f64, mapper: &TimeMapper) -> Option<ClipPosition> {
        let (anchor, side) = match self {
            Interaction::Idle => return None,
            Interaction::Trimming { side, anchor } => (anchor, Some(*side)),
            Interaction::Dragging { anchor } => (anchor, None),
        };
        let delta = mapper.try_time_of_pixel(x - anchor.start_x).ok()?;
        let total = mapper.original_duration();
        Some(match side {
            Some(side) => trim(side, anchor.original, delta, total),
            None => shift(anchor.original, delta, total),
        })
    }

    /// Back to idle. Returns whether a drag was actually running.
    pub fn release(&mut self) -> bool {
        let was_active = self.is_active();
        *self = Interaction::Idle;
        was_active
    }
}

/// Trim one edge by `delta` seconds, keeping the other edge fixed
pub fn trim(side: TrimSide, original: ClipPosition, delta: f64, total_duration: f64) -> ClipPosition {
    match side {
        TrimSide::Left => {
            let start = (original.start_time + delta)
                .min(original.end_time - MIN_CLIP_DURATION)
                .max(0.0);
            ClipPosition::new(start, original.end_time)
        }
        TrimSide::Right => {
            let end = (original.end_time + delta)
                .min(total_duration)
                .max(original.start_time + MIN_CLIP_DURATION);
            ClipPosition::new(original.start_time, end)
        }
    }
}

/// Move the whole window by `delta` seconds, clamped as a pair to the source
pub fn shift(original: ClipPosition, delta: f64, total_duration: f64) -> ClipPosition {
    let length = original.duration();
    let latest_start = (total_duration - length).max(0.0);
    let start = original.start_time + delta;

    if start < 0.0 {
        ClipPosition::new(0.0, length)
    } else if start > latest_start {
        ClipPosition::new(latest_start, latest_start + length)
    } else {
        ClipPosition::new(start, start + length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Zoom;
    use approx::assert_relative_eq;

    /// 10 px per second over `duration` seconds
    fn mapper(duration: f64) -> TimeMapper {
        TimeMapper::with_content_width(duration, duration * 10.0)
    }

    #[test]
    fn test_left_trim_scenario() {
        let map = mapper(10.0);
        let mut interaction = Interaction::Idle;

        interaction
            .begin_trim(TrimSide::Left, 100.0, ClipPosition::new(0.0, 10.0))
            .unwrap();
        let pos = interaction.position_at(130.0, &map).unwrap();
        assert_relative_eq!(pos.start_time, 3.0);
        assert_relative_eq!(pos.end_time, 10.0);
        assert!(interaction.release());

        // New drag anchored on the trimmed clip, pulled back 4 seconds
        interaction.begin_trim(TrimSide::Left, 130.0, pos).unwrap();
        let pos = interaction.position_at(90.0, &map).unwrap();
        assert_eq!(pos, ClipPosition::new(0.0, 10.0));
    }

    #[test]
    fn test_move_scenario() {
        let map = mapper(30.0);
        let mut interaction = Interaction::Idle;
        interaction
            .begin_move(50.0, ClipPosition::new(10.0, 20.0))
            .unwrap();
        let pos = interaction.position_at(200.0, &map).unwrap();
        assert_eq!(pos, ClipPosition::new(20.0, 30.0));
    }

    #[test]
    fn test_left_trim_never_crosses_minimum() {
        let original = ClipPosition::new(2.0, 6.0);
        for delta in [-10.0, -1.0, 0.0, 1.0, 3.85, 3.9, 3.95, 4.0, 50.0] {
            let pos = trim(TrimSide::Left, original, delta, 10.0);
            assert!(pos.start_time >= 0.0);
            assert!(pos.start_time <= pos.end_time - MIN_CLIP_DURATION + 1e-12);
            assert_eq!(pos.end_time, 6.0);
        }
    }

    #[test]
    fn test_right_trim_never_crosses_minimum() {
        let original = ClipPosition::new(2.0, 6.0);
        for delta in [-50.0, -3.95, -3.9, -1.0, 0.0, 2.0, 4.0, 10.0] {
            let pos = trim(TrimSide::Right, original, delta, 10.0);
            assert!(pos.end_time >= pos.start_time + MIN_CLIP_DURATION - 1e-12);
            assert!(pos.end_time <= 10.0);
            assert_eq!(pos.start_time, 2.0);
        }
    }

    #[test]
    fn test_move_preserves_length() {
        let total = 30.0;
        let mut pos = ClipPosition::new(3.7, 11.2);
        let length = pos.duration();
        for delta in [1.3, -7.9, 25.0, -0.01, 12.345, -40.0, 6.6, 100.0, -2.2] {
            pos = shift(pos, delta, total);
            assert_relative_eq!(pos.duration(), length, epsilon = 1e-9);
            assert!(pos.start_time >= 0.0);
            assert!(pos.end_time <= total + 1e-9);
        }
    }

    #[test]
    fn test_move_clamps_at_start() {
        let pos = shift(ClipPosition::new(5.0, 8.0), -20.0, 30.0);
        assert_eq!(pos, ClipPosition::new(0.0, 3.0));
    }

    #[test]
    fn test_full_length_clip_cannot_move() {
        let pos = shift(ClipPosition::new(0.0, 10.0), 4.0, 10.0);
        assert_eq!(pos, ClipPosition::new(0.0, 10.0));
    }

    #[test]
    fn test_busy_guard() {
        let mut interaction = Interaction::Idle;
        let pos = ClipPosition::new(0.0, 5.0);
        interaction.begin_move(0.0, pos).unwrap();
        assert!(matches!(
            interaction.begin_trim(TrimSide::Right, 10.0, pos),
            Err(EditorError::InteractionBusy)
        ));
        assert!(matches!(interaction, Interaction::Dragging { .. }));

        assert!(interaction.release());
        assert!(!interaction.release());
        interaction.begin_trim(TrimSide::Right, 10.0, pos).unwrap();
        assert_eq!(interaction.trim_side(), Some(TrimSide::Right));
    }

    #[test]
    fn test_idle_or_unmapped_yields_nothing() {
        let idle = Interaction::Idle;
        assert!(idle.position_at(10.0, &mapper(10.0)).is_none());

        let mut interaction = Interaction::Idle;
        interaction
            .begin_move(0.0, ClipPosition::new(0.0, 5.0))
            .unwrap();
        let unmapped = TimeMapper::new(Zoom::default(), 10.0, 0.0);
        assert!(interaction.position_at(40.0, &unmapped).is_none());
    }
}
