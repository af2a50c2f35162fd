use crate::app::EditorApp;
use crate::project::{AspectRatio, AudioSettings, ClipPosition, Effects, Transform};
use crate::utils::{format_time, parse_time};
use eframe::egui;

/// Whether this widget response opens a new undoable edit.
/// A drag counts once, on its first frame.
fn begins_edit(response: &egui::Response) -> bool {
    response.drag_started() || (response.changed() && !response.dragged())
}

/// Tracks a group of widgets editing one parameter bag
#[derive(Default)]
struct BagEdit {
    changed: bool,
    record: bool,
}

impl BagEdit {
    fn track(&mut self, response: egui::Response) {
        self.record |= begins_edit(&response);
        self.changed |= response.changed();
    }
}

pub fn render_properties_panel(app: &mut EditorApp, ui: &mut egui::Ui) {
    ui.heading("Properties");
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .id_salt("properties_scroll")
        .show(ui, |ui| {
            render_canvas_settings(app, ui);
            ui.separator();

            let Some(clip) = app.project.clip().cloned() else {
                ui.label("No clip selected.");
                ui.small("Place a library video on the timeline to edit it.");
                return;
            };

            ui.label(egui::RichText::new(&clip.name).strong());
            ui.small(format!("Source: {}", format_time(clip.original_duration)));
            ui.add_space(4.0);

            render_position(app, ui, clip.position, clip.original_duration);
            ui.separator();
            render_transform(app, ui, clip.transform);
            ui.separator();
            render_effects(app, ui, clip.effects);
            ui.separator();
            render_audio(app, ui, clip.audio);
        });
}

fn render_canvas_settings(app: &mut EditorApp, ui: &mut egui::Ui) {
    ui.label("Canvas:");
    ui.indent("aspect_ratio_indent", |ui| {
        for ratio in AspectRatio::all() {
            let is_selected = app.project.aspect_ratio == *ratio;
            if ui.radio(is_selected, ratio.name()).clicked() && !is_selected {
                app.set_aspect_ratio(*ratio);
            }
            if is_selected {
                ui.indent("ratio_desc", |ui| {
                    ui.small(ratio.description());
                });
            }
        }
    });
}

fn render_position(app: &mut EditorApp, ui: &mut egui::Ui, position: ClipPosition, original: f64) {
    ui.label("Trim:");
    let mut start = position.start_time;
    let mut end = position.end_time;
    let mut edit = BagEdit::default();

    egui::Grid::new("trim_grid").num_columns(2).show(ui, |ui| {
        ui.label("Start");
        edit.track(ui.add(time_value(&mut start, 0.0..=original)));
        ui.end_row();

        ui.label("End");
        edit.track(ui.add(time_value(&mut end, 0.0..=original)));
        ui.end_row();
    });
    ui.small(format!("Length {}", format_time(position.duration())));

    if edit.changed {
        app.update_position(ClipPosition::new(start, end), edit.record);
    }
}

fn time_value(value: &mut f64, range: std::ops::RangeInclusive<f64>) -> egui::DragValue<'_> {
    egui::DragValue::new(value)
        .range(range)
        .speed(0.05)
        .custom_formatter(|v, _| format_time(v))
        .custom_parser(parse_time)
}

fn render_transform(app: &mut EditorApp, ui: &mut egui::Ui, mut transform: Transform) {
    ui.label("Transform:");
    let mut edit = BagEdit::default();
    egui::Grid::new("transform_grid").num_columns(2).show(ui, |ui| {
        ui.label("X");
        edit.track(ui.add(egui::Slider::new(&mut transform.x, Transform::OFFSET_RANGE)));
        ui.end_row();
        ui.label("Y");
        edit.track(ui.add(egui::Slider::new(&mut transform.y, Transform::OFFSET_RANGE)));
        ui.end_row();
        ui.label("Scale");
        edit.track(ui.add(egui::Slider::new(&mut transform.scale, Transform::SCALE_RANGE)));
        ui.end_row();
        ui.label("Rotation");
        edit.track(ui.add(
            egui::Slider::new(&mut transform.rotation, Transform::ROTATION_RANGE).suffix("°"),
        ));
        ui.end_row();
        ui.label("Opacity");
        edit.track(ui.add(egui::Slider::new(&mut transform.opacity, Transform::OPACITY_RANGE)));
        ui.end_row();
    });
    if ui.small_button("Reset transform").clicked() {
        transform = Transform::default();
        edit.changed = true;
        edit.record = true;
    }

    if edit.changed {
        app.update_transform(transform, edit.record);
    }
}

fn render_effects(app: &mut EditorApp, ui: &mut egui::Ui, mut effects: Effects) {
    ui.label("Effects:");
    let mut edit = BagEdit::default();
    egui::Grid::new("effects_grid").num_columns(2).show(ui, |ui| {
        ui.label("Brightness");
        edit.track(ui.add(egui::Slider::new(&mut effects.brightness, Effects::ADJUST_RANGE)));
        ui.end_row();
        ui.label("Contrast");
        edit.track(ui.add(egui::Slider::new(&mut effects.contrast, Effects::ADJUST_RANGE)));
        ui.end_row();
        ui.label("Saturation");
        edit.track(ui.add(egui::Slider::new(&mut effects.saturation, Effects::ADJUST_RANGE)));
        ui.end_row();
        ui.label("Blur");
        edit.track(ui.add(
            egui::Slider::new(&mut effects.blur, Effects::BLUR_RANGE).step_by(1.0),
        ));
        ui.end_row();
    });
    if ui
        .add_enabled(!effects.is_identity(), egui::Button::new("Clear effects").small())
        .clicked()
    {
        effects = Effects::default();
        edit.changed = true;
        edit.record = true;
    }

    if edit.changed {
        app.update_effects(effects, edit.record);
    }
}

fn render_audio(app: &mut EditorApp, ui: &mut egui::Ui, mut audio: AudioSettings) {
    ui.label("Audio:");
    let mut edit = BagEdit::default();
    egui::Grid::new("audio_grid").num_columns(2).show(ui, |ui| {
        ui.label("Volume");
        edit.track(ui.add_enabled(
            !audio.muted,
            egui::Slider::new(&mut audio.volume, AudioSettings::VOLUME_RANGE),
        ));
        ui.end_row();
        ui.label("Mute");
        edit.track(ui.checkbox(&mut audio.muted, ""));
        ui.end_row();
        ui.label("Speed");
        edit.track(ui.add(
            egui::Slider::new(&mut audio.speed, AudioSettings::SPEED_RANGE)
                .step_by(0.25)
                .suffix("x"),
        ));
        ui.end_row();
    });

    if edit.changed {
        app.update_audio(audio, edit.record);
    }
}
