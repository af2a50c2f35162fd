//! Host-facing timeline engine.
//!
//! The host hands in its current state every frame as a [`TimelineInput`] and
//! drains [`TimelineEvent`]s afterwards; the engine itself only remembers the
//! active drag and which clip it last saw. Pointer x values are viewport
//! pixels, converted to track pixels with the input's scroll offset.

use crate::error::Result;
use crate::project::{Clip, ClipId, ClipPosition};
use crate::timeline::{
    autoscroll_target, generate_markers, playhead_x, seek_time_for_click, Interaction, Marker,
    TimeMapper, TrimSide, Viewport, Zoom, AUTOSCROLL_MARGIN,
};

/// Width of the grab zone at each clip edge, in pixels
pub const HANDLE_WIDTH: f64 = 8.0;

#[derive(Debug, Clone, Copy)]
pub struct TimelineInput<'a> {
    pub clip: Option<&'a Clip>,
    /// Relative to the clip's trimmed window
    pub current_time: f64,
    pub is_playing: bool,
    pub zoom: Zoom,
    pub container_width: f64,
    pub scroll_offset: f64,
}

impl TimelineInput<'_> {
    fn mapper(&self) -> Option<TimeMapper> {
        self.clip
            .map(|clip| TimeMapper::new(self.zoom, clip.original_duration, self.container_width))
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.scroll_offset, self.container_width)
    }
}

/// Update requests for the host to commit
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    TimeUpdate(f64),
    PositionChange(ClipPosition),
    ZoomChange(Zoom),
    ScrollTo(f64),
    /// A trim or move drag began; the host records an undo snapshot here
    InteractionStarted,
    InteractionEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    TrimHandle(TrimSide),
    ClipBody,
    Track,
}

/// Clip edges in track pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSpan {
    pub left: f64,
    pub right: f64,
}

impl ClipSpan {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn hit_test(&self, x: f64) -> HitTarget {
        if x < self.left || x > self.right {
            return HitTarget::Track;
        }
        // Narrow clips split the handles at the midpoint
        let handle = HANDLE_WIDTH.min(self.width() / 2.0);
        if x <= self.left + handle {
            HitTarget::TrimHandle(TrimSide::Left)
        } else if x >= self.right - handle {
            HitTarget::TrimHandle(TrimSide::Right)
        } else {
            HitTarget::ClipBody
        }
    }
}

/// Everything the widget needs to paint one frame
#[derive(Debug, Clone)]
pub struct TimelineLayout {
    pub mapper: TimeMapper,
    pub markers: Vec<Marker>,
    pub clip_span: ClipSpan,
    pub playhead_x: f64,
    pub viewport: Viewport,
}

impl TimelineLayout {
    pub fn content_width(&self) -> f64 {
        self.mapper.content_width()
    }
}

#[derive(Debug, Clone)]
pub struct TimelineEngine {
    interaction: Interaction,
    clip_id: Option<ClipId>,
    autoscroll_margin: f64,
    events: Vec<TimelineEvent>,
}

impl TimelineEngine {
    pub fn new(autoscroll_margin: f64) -> Self {
        Self {
            interaction: Interaction::Idle,
            clip_id: None,
            autoscroll_margin,
            events: Vec::new(),
        }
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_active()
    }

    /// Reset view state when the clip identity changes. Returns true on reset.
    pub fn sync_clip(&mut self, clip: Option<&Clip>) -> bool {
        let id = clip.map(|c| c.id);
        if id == self.clip_id {
            return false;
        }
        self.clip_id = id;
        if self.interaction.release() {
            self.events.push(TimelineEvent::InteractionEnded);
        }
        self.events.push(TimelineEvent::TimeUpdate(0.0));
        true
    }

    /// Derive the frame's geometry. `None` when there is no clip.
    pub fn layout(&self, input: &TimelineInput<'_>) -> Option<TimelineLayout> {
        let clip = input.clip?;
        let mapper = input.mapper()?;
        let position = clip.position;
        Some(TimelineLayout {
            markers: generate_markers(&mapper),
            clip_span: ClipSpan {
                left: mapper.pixel_of_time(position.start_time),
                right: mapper.pixel_of_time(position.end_time),
            },
            playhead_x: playhead_x(&mapper, position, input.current_time),
            viewport: input.viewport(),
            mapper,
        })
    }

    pub fn hit_test(&self, x: f64, input: &TimelineInput<'_>) -> HitTarget {
        match self.layout(input) {
            Some(layout) => layout.clip_span.hit_test(x + input.scroll_offset),
            None => HitTarget::Track,
        }
    }

    /// Start a trim or move depending on what is under the pointer.
    /// Pressing the bare track starts nothing.
    pub fn pointer_down(&mut self, x: f64, input: &TimelineInput<'_>) -> Result<HitTarget> {
        let Some(clip) = input.clip else {
            return Ok(HitTarget::Track);
        };
        let target = self.hit_test(x, input);
        let track_x = x + input.scroll_offset;
        match target {
            HitTarget::TrimHandle(side) => self.interaction.begin_trim(side, track_x, clip.position)?,
            HitTarget::ClipBody => self.interaction.begin_move(track_x, clip.position)?,
            HitTarget::Track => return Ok(target),
        }
        log::debug!("timeline drag started: {:?}", self.interaction);
        self.events.push(TimelineEvent::InteractionStarted);
        Ok(target)
    }

    /// Emit a position for the active drag, if any
    pub fn pointer_move(&mut self, x: f64, input: &TimelineInput<'_>) {
        let Some(mapper) = input.mapper() else {
            return;
        };
        if let Some(position) = self
            .interaction
            .position_at(x + input.scroll_offset, &mapper)
        {
            self.events.push(TimelineEvent::PositionChange(position));
        }
    }

    pub fn pointer_up(&mut self) {
        if self.interaction.release() {
            self.events.push(TimelineEvent::InteractionEnded);
        }
    }

    /// Pointer released elsewhere or focus lost: end the drag with the last
    /// emitted position left in place
    pub fn pointer_capture_lost(&mut self) {
        if self.interaction.is_active() {
            log::debug!("timeline drag cancelled: pointer capture lost");
        }
        self.pointer_up();
    }

    /// Click-to-seek on the track background
    pub fn click(&mut self, x: f64, input: &TimelineInput<'_>) {
        if self.interaction.is_active() {
            return;
        }
        let (Some(clip), Some(mapper)) = (input.clip, input.mapper()) else {
            return;
        };
        let time = seek_time_for_click(x, input.scroll_offset, &mapper, clip.position);
        self.events.push(TimelineEvent::TimeUpdate(time));
    }

    /// Keep the playhead visible while playing
    pub fn on_time_update(&mut self, input: &TimelineInput<'_>) {
        if !input.is_playing || self.interaction.is_active() {
            return;
        }
        let Some(layout) = self.layout(input) else {
            return;
        };
        if let Some(target) = autoscroll_target(
            layout.playhead_x,
            layout.viewport,
            layout.content_width(),
            self.autoscroll_margin,
        ) {
            self.events.push(TimelineEvent::ScrollTo(target));
        }
    }

    pub fn set_zoom(&mut self, current: Zoom, level: f64) {
        let next = Zoom::new(level);
        if next != current {
            self.events.push(TimelineEvent::ZoomChange(next));
        }
    }

    pub fn zoom_in(&mut self, current: Zoom) {
        self.set_zoom(current, current.zoom_in().level());
    }

    pub fn zoom_out(&mut self, current: Zoom) {
        self.set_zoom(current, current.zoom_out().level());
    }

    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new(AUTOSCROLL_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::project::MediaAsset;
    use approx::assert_relative_eq;

    fn clip(duration: f64, start: f64, end: f64) -> Clip {
        let mut clip = Clip::from_asset(&MediaAsset::test_asset("clip.mp4", duration)).unwrap();
        clip.position = ClipPosition::new(start, end);
        clip
    }

    /// Zoom 1.0 over a 1000 px container: content is 1000 px wide
    fn input(clip: &Clip) -> TimelineInput<'_> {
        TimelineInput {
            clip: Some(clip),
            current_time: 0.0,
            is_playing: false,
            zoom: Zoom::default(),
            container_width: 1000.0,
            scroll_offset: 0.0,
        }
    }

    #[test]
    fn test_clip_change_resets_view_state() {
        let a = clip(10.0, 0.0, 10.0);
        let b = clip(10.0, 0.0, 10.0);
        let mut engine = TimelineEngine::default();

        assert!(engine.sync_clip(Some(&a)));
        assert_eq!(engine.drain_events(), vec![TimelineEvent::TimeUpdate(0.0)]);
        assert!(!engine.sync_clip(Some(&a)));
        assert!(engine.drain_events().is_empty());

        engine.pointer_down(500.0, &input(&a)).unwrap();
        engine.drain_events();
        assert!(engine.sync_clip(Some(&b)));
        assert!(!engine.is_interacting());
        assert_eq!(
            engine.drain_events(),
            vec![
                TimelineEvent::InteractionEnded,
                TimelineEvent::TimeUpdate(0.0)
            ]
        );
    }

    #[test]
    fn test_layout_geometry() {
        let c = clip(20.0, 5.0, 15.0);
        let mut inp = input(&c);
        inp.current_time = 2.0;
        let layout = TimelineEngine::default().layout(&inp).unwrap();
        assert_relative_eq!(layout.content_width(), 1000.0);
        assert_relative_eq!(layout.clip_span.left, 250.0);
        assert_relative_eq!(layout.clip_span.right, 750.0);
        assert_relative_eq!(layout.playhead_x, 350.0);
        assert!(!layout.markers.is_empty());
    }

    #[test]
    fn test_no_layout_without_clip() {
        let engine = TimelineEngine::default();
        let inp = TimelineInput {
            clip: None,
            current_time: 0.0,
            is_playing: false,
            zoom: Zoom::default(),
            container_width: 800.0,
            scroll_offset: 0.0,
        };
        assert!(engine.layout(&inp).is_none());
        assert_eq!(engine.hit_test(10.0, &inp), HitTarget::Track);
    }

    #[test]
    fn test_hit_targets() {
        let c = clip(10.0, 2.0, 8.0);
        let engine = TimelineEngine::default();
        let inp = input(&c);
        assert_eq!(engine.hit_test(100.0, &inp), HitTarget::Track);
        assert_eq!(
            engine.hit_test(203.0, &inp),
            HitTarget::TrimHandle(TrimSide::Left)
        );
        assert_eq!(engine.hit_test(500.0, &inp), HitTarget::ClipBody);
        assert_eq!(
            engine.hit_test(797.0, &inp),
            HitTarget::TrimHandle(TrimSide::Right)
        );
        assert_eq!(engine.hit_test(900.0, &inp), HitTarget::Track);
    }

    #[test]
    fn test_narrow_clip_splits_handles() {
        let span = ClipSpan {
            left: 100.0,
            right: 106.0,
        };
        assert_eq!(span.hit_test(102.0), HitTarget::TrimHandle(TrimSide::Left));
        assert_eq!(span.hit_test(105.0), HitTarget::TrimHandle(TrimSide::Right));
    }

    #[test]
    fn test_trim_drag_emits_every_move() {
        let c = clip(10.0, 0.0, 10.0);
        let mut engine = TimelineEngine::default();
        let inp = input(&c);

        let target = engine.pointer_down(2.0, &inp).unwrap();
        assert_eq!(target, HitTarget::TrimHandle(TrimSide::Left));
        engine.pointer_move(102.0, &inp);
        engine.pointer_move(302.0, &inp);
        engine.pointer_up();

        let events = engine.drain_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], TimelineEvent::InteractionStarted);
        match (&events[1], &events[2]) {
            (TimelineEvent::PositionChange(first), TimelineEvent::PositionChange(second)) => {
                assert_relative_eq!(first.start_time, 1.0);
                assert_relative_eq!(second.start_time, 3.0);
                assert_eq!(second.end_time, 10.0);
            }
            other => panic!("unexpected events {:?}", other),
        }
        assert_eq!(events[3], TimelineEvent::InteractionEnded);
    }

    #[test]
    fn test_move_drag_respects_scroll_offset() {
        let c = clip(30.0, 10.0, 20.0);
        let mut engine = TimelineEngine::default();
        let mut inp = input(&c);
        inp.zoom = Zoom::new(1.5);
        // Content is 1500 px (50 px/s); the body sits at 500..1000
        inp.scroll_offset = 400.0;

        assert_eq!(engine.pointer_down(300.0, &inp).unwrap(), HitTarget::ClipBody);
        engine.pointer_move(400.0, &inp);
        match engine.drain_events().last() {
            Some(TimelineEvent::PositionChange(pos)) => {
                assert_relative_eq!(pos.start_time, 12.0, epsilon = 1e-9);
                assert_relative_eq!(pos.end_time, 22.0, epsilon = 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_second_drag_is_rejected() {
        let c = clip(10.0, 0.0, 10.0);
        let mut engine = TimelineEngine::default();
        let inp = input(&c);
        engine.pointer_down(500.0, &inp).unwrap();
        assert!(matches!(
            engine.pointer_down(2.0, &inp),
            Err(EditorError::InteractionBusy)
        ));
        assert!(matches!(engine.interaction(), Interaction::Dragging { .. }));
    }

    #[test]
    fn test_capture_lost_ends_drag() {
        let c = clip(10.0, 0.0, 10.0);
        let mut engine = TimelineEngine::default();
        let inp = input(&c);
        engine.pointer_down(500.0, &inp).unwrap();
        engine.pointer_capture_lost();
        assert!(!engine.is_interacting());

        engine.drain_events();
        engine.pointer_move(700.0, &inp);
        engine.pointer_capture_lost();
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_click_seeks_relative_to_window() {
        let c = clip(10.0, 2.0, 8.0);
        let mut engine = TimelineEngine::default();
        let inp = input(&c);
        engine.click(500.0, &inp);
        engine.click(50.0, &inp);
        engine.click(950.0, &inp);
        let times: Vec<f64> = engine
            .drain_events()
            .into_iter()
            .map(|e| match e {
                TimelineEvent::TimeUpdate(t) => t,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_relative_eq!(times[0], 3.0);
        assert_eq!(times[1], 0.0);
        assert_relative_eq!(times[2], 6.0);
    }

    #[test]
    fn test_click_ignored_while_dragging() {
        let c = clip(10.0, 0.0, 10.0);
        let mut engine = TimelineEngine::default();
        let inp = input(&c);
        engine.pointer_down(500.0, &inp).unwrap();
        engine.drain_events();
        engine.click(100.0, &inp);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_click_without_mapping_reports_zero() {
        let c = clip(10.0, 2.0, 8.0);
        let mut engine = TimelineEngine::default();
        let mut inp = input(&c);
        inp.container_width = 0.0;
        engine.click(300.0, &inp);
        assert_eq!(engine.drain_events(), vec![TimelineEvent::TimeUpdate(0.0)]);
    }

    #[test]
    fn test_autoscroll_only_while_playing() {
        let c = clip(30.0, 0.0, 30.0);
        let mut engine = TimelineEngine::default();
        let mut inp = input(&c);
        inp.zoom = Zoom::new(1.75);
        inp.current_time = 19.5;
        // 1500 px content, playhead at 975 px, viewport 0..1000

        engine.on_time_update(&inp);
        assert!(engine.drain_events().is_empty());

        inp.is_playing = true;
        engine.on_time_update(&inp);
        assert_eq!(engine.drain_events(), vec![TimelineEvent::ScrollTo(500.0)]);
    }

    #[test]
    fn test_zoom_events() {
        let mut engine = TimelineEngine::default();
        engine.zoom_in(Zoom::default());
        engine.set_zoom(Zoom::new(1.75), 3.0);
        engine.set_zoom(Zoom::default(), 0.0);
        assert_eq!(
            engine.drain_events(),
            vec![
                TimelineEvent::ZoomChange(Zoom::new(1.1)),
                TimelineEvent::ZoomChange(Zoom::new(0.25)),
            ]
        );
    }
}
