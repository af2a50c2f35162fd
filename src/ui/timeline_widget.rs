use crate::project::Clip;
use crate::timeline::{
    HitTarget, TimelineEngine, TimelineInput, TimelineLayout, TrimSide, Zoom, HANDLE_WIDTH,
    MAX_ZOOM, MIN_ZOOM,
};
use crate::utils::format_time;
use eframe::egui;

const RULER_HEIGHT: f32 = 24.0;
const TRACK_HEIGHT: f32 = 56.0;
const TIMELINE_HEIGHT: f32 = RULER_HEIGHT + TRACK_HEIGHT + 8.0;

const CLIP_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 149, 237);
const PLAYHEAD_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 80, 80);

/// Timeline panel: zoom toolbar, ruler, the clip with its trim handles and
/// the playhead. All geometry and drag logic lives in `TimelineEngine`; the
/// widget only feeds it pointer positions and paints its layout.
pub struct TimelineWidget<'a> {
    engine: &'a mut TimelineEngine,
    clip: Option<&'a Clip>,
    current_time: f64,
    is_playing: bool,
    zoom: Zoom,
    scroll_offset: f64,
}

pub struct TimelineResponse {
    /// Scroll offset the scroll area ended the frame at
    pub scroll_offset: f64,
    pub is_dragging: bool,
}

impl<'a> TimelineWidget<'a> {
    pub fn new(engine: &'a mut TimelineEngine, clip: Option<&'a Clip>) -> Self {
        Self {
            engine,
            clip,
            current_time: 0.0,
            is_playing: false,
            zoom: Zoom::default(),
            scroll_offset: 0.0,
        }
    }

    pub fn current_time(mut self, time: f64) -> Self {
        self.current_time = time;
        self
    }

    pub fn playing(mut self, is_playing: bool) -> Self {
        self.is_playing = is_playing;
        self
    }

    pub fn zoom(mut self, zoom: Zoom) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn scroll(mut self, offset: f64) -> Self {
        self.scroll_offset = offset;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> TimelineResponse {
        let TimelineWidget {
            engine,
            clip,
            current_time,
            is_playing,
            zoom,
            scroll_offset,
        } = self;

        render_toolbar(engine, ui, clip, current_time, zoom);

        let input = TimelineInput {
            clip,
            current_time,
            is_playing,
            zoom,
            container_width: ui.available_width() as f64,
            scroll_offset,
        };
        engine.on_time_update(&input);

        let Some(layout) = engine.layout(&input) else {
            ui.vertical_centered(|ui| {
                ui.add_space(TIMELINE_HEIGHT / 3.0);
                ui.label("No clip on the timeline");
                ui.small("Import a video or drop one onto the window");
            });
            return TimelineResponse {
                scroll_offset: 0.0,
                is_dragging: false,
            };
        };

        let output = egui::ScrollArea::horizontal()
            .id_salt("timeline_scroll")
            .horizontal_scroll_offset(scroll_offset as f32)
            .drag_to_scroll(false)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                let (rect, response) = ui.allocate_exact_size(
                    egui::vec2(layout.content_width() as f32, TIMELINE_HEIGHT),
                    egui::Sense::click_and_drag(),
                );

                // Viewport pixels, which is what the engine expects
                let to_view_x = |pos: egui::Pos2| (pos.x - rect.left()) as f64 - scroll_offset;

                if response.drag_started() {
                    let origin = ui.input(|i| i.pointer.press_origin());
                    if let Some(pos) = origin.or(response.interact_pointer_pos()) {
                        if let Err(e) = engine.pointer_down(to_view_x(pos), &input) {
                            log::debug!("Ignoring drag start: {}", e);
                        }
                    }
                }
                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        engine.pointer_move(to_view_x(pos), &input);
                    }
                }
                if response.drag_stopped() {
                    engine.pointer_up();
                }
                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        engine.click(to_view_x(pos), &input);
                    }
                }

                if let Some(pos) = response.hover_pos() {
                    let cursor = match engine.interaction().trim_side() {
                        Some(_) => egui::CursorIcon::ResizeHorizontal,
                        None if engine.is_interacting() => egui::CursorIcon::Grabbing,
                        None => match engine.hit_test(to_view_x(pos), &input) {
                            HitTarget::TrimHandle(_) => egui::CursorIcon::ResizeHorizontal,
                            HitTarget::ClipBody => egui::CursorIcon::Grab,
                            HitTarget::Track => egui::CursorIcon::PointingHand,
                        },
                    };
                    ui.ctx().set_cursor_icon(cursor);

                    // Ctrl+wheel zooms the timeline
                    let zoom_delta = ui.input(|i| i.zoom_delta());
                    if zoom_delta > 1.0 {
                        engine.zoom_in(zoom);
                    } else if zoom_delta < 1.0 {
                        engine.zoom_out(zoom);
                    }
                }

                if ui.is_rect_visible(rect) {
                    paint_timeline(ui.painter(), rect, &layout, clip, engine);
                }
            });

        TimelineResponse {
            scroll_offset: output.state.offset.x as f64,
            is_dragging: engine.is_interacting(),
        }
    }
}

fn render_toolbar(
    engine: &mut TimelineEngine,
    ui: &mut egui::Ui,
    clip: Option<&Clip>,
    current_time: f64,
    zoom: Zoom,
) {
    ui.horizontal(|ui| {
        ui.strong("Timeline");
        ui.separator();

        if ui
            .add_enabled(zoom.can_zoom_out(), egui::Button::new("-"))
            .on_hover_text("Zoom out (Ctrl+-)")
            .clicked()
        {
            engine.zoom_out(zoom);
        }

        let mut level = zoom.level();
        let slider = egui::Slider::new(&mut level, MIN_ZOOM..=MAX_ZOOM)
            .step_by(0.05)
            .show_value(false);
        if ui.add(slider).changed() {
            engine.set_zoom(zoom, level);
        }

        if ui
            .add_enabled(zoom.can_zoom_in(), egui::Button::new("+"))
            .on_hover_text("Zoom in (Ctrl+=)")
            .clicked()
        {
            engine.zoom_in(zoom);
        }
        ui.label(format!("{}%", zoom.percent()));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(clip) = clip {
                ui.label(format!(
                    "{} / {}",
                    format_time(current_time),
                    format_time(clip.duration())
                ));
                ui.separator();
                ui.label(format!(
                    "In {}  Out {}",
                    format_time(clip.position.start_time),
                    format_time(clip.position.end_time)
                ));
            }
        });
    });
}

fn paint_timeline(
    painter: &egui::Painter,
    rect: egui::Rect,
    layout: &TimelineLayout,
    clip: Option<&Clip>,
    engine: &TimelineEngine,
) {
    let x_of = |x: f64| rect.left() + x as f32;

    painter.rect_filled(rect, 4.0, egui::Color32::from_gray(30));

    // Ruler
    let ruler_rect = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), RULER_HEIGHT));
    painter.rect_filled(ruler_rect, 0.0, egui::Color32::from_gray(35));
    for marker in &layout.markers {
        let x = x_of(marker.x);
        let tick_height = if marker.is_main() { 12.0 } else { 5.0 };
        painter.line_segment(
            [
                egui::pos2(x, ruler_rect.bottom() - tick_height),
                egui::pos2(x, ruler_rect.bottom()),
            ],
            egui::Stroke::new(1.0, egui::Color32::GRAY),
        );
        if let Some(ref label) = marker.label {
            painter.text(
                egui::pos2(x + 2.0, ruler_rect.top() + 2.0),
                egui::Align2::LEFT_TOP,
                label,
                egui::FontId::proportional(10.0),
                egui::Color32::LIGHT_GRAY,
            );
        }
    }

    // Whole source, dimmed; the trimmed window drawn over it
    let track_rect = egui::Rect::from_min_size(
        rect.min + egui::vec2(0.0, RULER_HEIGHT + 4.0),
        egui::vec2(rect.width(), TRACK_HEIGHT),
    );
    painter.rect_filled(track_rect, 2.0, egui::Color32::from_gray(40));

    let span = layout.clip_span;
    let clip_rect = egui::Rect::from_min_max(
        egui::pos2(x_of(span.left), track_rect.top()),
        egui::pos2(x_of(span.right), track_rect.bottom()),
    );
    let active = engine.is_interacting();
    let fill_alpha = if active { 170 } else { 130 };
    let [r, g, b, _] = CLIP_COLOR.to_array();
    painter.rect_filled(
        clip_rect,
        3.0,
        egui::Color32::from_rgba_unmultiplied(r, g, b, fill_alpha),
    );
    painter.rect_stroke(clip_rect, 3.0, egui::Stroke::new(1.5, CLIP_COLOR));

    if let Some(clip) = clip {
        if clip_rect.width() > 40.0 {
            painter.text(
                clip_rect.left_top() + egui::vec2(HANDLE_WIDTH as f32 + 4.0, 4.0),
                egui::Align2::LEFT_TOP,
                &clip.name,
                egui::FontId::proportional(11.0),
                egui::Color32::WHITE,
            );
        }
    }

    // Trim handles
    let handle_width = (HANDLE_WIDTH as f32).min(clip_rect.width() / 2.0);
    let active_side = engine.interaction().trim_side();
    for side in [TrimSide::Left, TrimSide::Right] {
        let handle = match side {
            TrimSide::Left => egui::Rect::from_min_size(
                clip_rect.left_top(),
                egui::vec2(handle_width, clip_rect.height()),
            ),
            TrimSide::Right => egui::Rect::from_min_max(
                egui::pos2(clip_rect.right() - handle_width, clip_rect.top()),
                clip_rect.right_bottom(),
            ),
        };
        let color = if active_side == Some(side) {
            egui::Color32::from_rgb(255, 210, 90)
        } else {
            egui::Color32::from_gray(220)
        };
        painter.rect_filled(handle, 2.0, color);
    }

    // Playhead
    let x = x_of(layout.playhead_x);
    painter.line_segment(
        [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
        egui::Stroke::new(4.0, egui::Color32::from_rgba_unmultiplied(255, 80, 80, 60)),
    );
    painter.line_segment(
        [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
        egui::Stroke::new(2.0, PLAYHEAD_COLOR),
    );
    painter.add(egui::Shape::convex_polygon(
        vec![
            egui::pos2(x, rect.top() + 14.0),
            egui::pos2(x - 8.0, rect.top()),
            egui::pos2(x + 8.0, rect.top()),
        ],
        PLAYHEAD_COLOR,
        egui::Stroke::new(1.0, egui::Color32::WHITE),
    ));
}
