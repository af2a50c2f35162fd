use crate::app::EditorApp;
use crate::player::PlaybackState;
use crate::project::Transform;
use crate::utils::format_time;
use eframe::egui;

/// Where the frame lands inside the canvas before rotation: fitted to the
/// canvas, scaled, then offset by fractions of the canvas size.
pub fn frame_rect(canvas: egui::Rect, frame_aspect: f32, transform: &Transform) -> egui::Rect {
    let canvas_aspect = canvas.width() / canvas.height();
    let fitted = if frame_aspect > canvas_aspect {
        egui::vec2(canvas.width(), canvas.width() / frame_aspect)
    } else {
        egui::vec2(canvas.height() * frame_aspect, canvas.height())
    };
    let center = canvas.center()
        + egui::vec2(transform.x * canvas.width(), transform.y * canvas.height());
    egui::Rect::from_center_size(center, fitted * transform.scale)
}

pub fn render_canvas_area(app: &mut EditorApp, ui: &mut egui::Ui) {
    let available = ui.available_size();
    let area_height = (available.y - 70.0).max(120.0);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_height(area_height);
        ui.set_max_height(area_height);

        let area = ui.available_rect_before_wrap();
        let (width, height) = app.project.aspect_ratio.fit(area.width() - 8.0, area.height() - 8.0);
        let canvas = egui::Rect::from_center_size(area.center(), egui::vec2(width, height));
        ui.allocate_rect(area, egui::Sense::hover());

        let painter = ui.painter_at(canvas);
        painter.rect_filled(canvas, 0.0, egui::Color32::BLACK);

        match (app.project.clip(), &app.preview_texture) {
            (Some(clip), Some(texture)) => {
                let size = texture.size_vec2();
                let rect = frame_rect(canvas, size.x / size.y, &clip.transform);
                let alpha = (clip.transform.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

                let mut mesh = egui::Mesh::with_texture(texture.id());
                mesh.add_rect_with_uv(
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::from_white_alpha(alpha),
                );
                mesh.rotate(
                    egui::emath::Rot2::from_angle(clip.transform.rotation.to_radians()),
                    rect.center(),
                );
                painter.add(egui::Shape::mesh(mesh));
            }
            (Some(clip), None) => {
                painter.text(
                    canvas.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}\nLoading preview...", clip.name),
                    egui::FontId::proportional(14.0),
                    egui::Color32::GRAY,
                );
            }
            (None, _) => {
                painter.text(
                    canvas.center(),
                    egui::Align2::CENTER_CENTER,
                    "No video on the timeline\nDrag & drop or File > Open Video...",
                    egui::FontId::proportional(14.0),
                    egui::Color32::GRAY,
                );
            }
        }

        if let Some(error) = app.player.as_ref().and_then(|p| p.decode_error()) {
            painter.rect_filled(
                canvas,
                0.0,
                egui::Color32::from_rgba_unmultiplied(60, 0, 0, 200),
            );
            painter.text(
                canvas.center(),
                egui::Align2::CENTER_CENTER,
                format!("Cannot play this video\n{}", error),
                egui::FontId::proportional(14.0),
                egui::Color32::from_rgb(255, 160, 160),
            );
        }

        painter.text(
            canvas.right_bottom() - egui::vec2(6.0, 4.0),
            egui::Align2::RIGHT_BOTTOM,
            app.project.aspect_ratio.name(),
            egui::FontId::proportional(10.0),
            egui::Color32::from_gray(120),
        );
    });
}

pub fn render_playback_controls(app: &mut EditorApp, ui: &mut egui::Ui) {
    let duration = app.project.clip().map(|c| c.duration()).unwrap_or(0.0);
    let can_play = app
        .player
        .as_ref()
        .is_some_and(|p| p.decode_error().is_none());
    let state = app
        .player
        .as_ref()
        .map(|p| p.state())
        .unwrap_or(PlaybackState::Stopped);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(can_play, egui::Button::new("|<"))
            .on_hover_text("Start")
            .clicked()
        {
            app.seek(0.0);
        }

        let play_pause_text = match state {
            PlaybackState::Playing => "||",
            _ => ">",
        };
        if ui
            .add_enabled(can_play, egui::Button::new(play_pause_text))
            .on_hover_text("Play/Pause (Space)")
            .clicked()
        {
            app.toggle_play_pause();
        }

        if ui.add_enabled(can_play, egui::Button::new("[]")).on_hover_text("Stop").clicked() {
            app.stop_player();
        }

        ui.separator();
        ui.label(format!(
            "{} / {}",
            format_time(app.current_time),
            format_time(duration)
        ));
    });

    ui.horizontal(|ui| {
        let mut current = app.current_time;
        ui.style_mut().spacing.slider_width = ui.available_width() - 20.0;
        let slider = egui::Slider::new(&mut current, 0.0..=duration.max(0.001))
            .show_value(false)
            .trailing_fill(true);
        if ui.add_enabled(can_play, slider).changed() {
            app.seek(current);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(160.0, 90.0))
    }

    #[test]
    fn test_matching_aspect_fills_canvas() {
        let rect = frame_rect(canvas(), 16.0 / 9.0, &Transform::default());
        assert!((rect.width() - 160.0).abs() < 1e-3);
        assert!((rect.height() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_portrait_frame_is_pillarboxed() {
        let rect = frame_rect(canvas(), 9.0 / 16.0, &Transform::default());
        assert!((rect.height() - 90.0).abs() < 1e-3);
        assert!((rect.width() - 50.625).abs() < 1e-3);
        assert!((rect.center().x - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_scale_and_offset() {
        let transform = Transform {
            x: 0.25,
            y: -0.5,
            scale: 0.5,
            ..Transform::default()
        };
        let rect = frame_rect(canvas(), 16.0 / 9.0, &transform);
        assert!((rect.width() - 80.0).abs() < 1e-3);
        assert!((rect.center().x - 120.0).abs() < 1e-3);
        assert!((rect.center().y - 0.0).abs() < 1e-3);
    }
}
