use crate::app::EditorApp;
use crate::ui::{
    render_canvas_area, render_library_panel, render_playback_controls, render_projects_section,
    render_properties_panel, TimelineWidget,
};
use eframe::egui;

/// Seconds an auto-scroll or scroll reset takes to settle
const SCROLL_ANIMATION_TIME: f32 = 0.2;

pub fn render_main_window(app: &mut EditorApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        render_menu_bar(app, ui);
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        render_status_bar(app, ui);
    });

    egui::TopBottomPanel::bottom("timeline_panel")
        .resizable(true)
        .min_height(110.0)
        .default_height(140.0)
        .show(ctx, |ui| {
            render_timeline_panel(app, ui);
        });

    egui::SidePanel::left("library_panel")
        .resizable(true)
        .default_width(220.0)
        .min_width(160.0)
        .max_width(360.0)
        .show(ctx, |ui| {
            render_projects_section(app, ui);
            ui.separator();
            render_library_panel(app, ui);
        });

    egui::SidePanel::right("properties_panel")
        .resizable(true)
        .default_width(260.0)
        .min_width(200.0)
        .show(ctx, |ui| {
            render_properties_panel(app, ui);
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        render_canvas_area(app, ui);
        ui.separator();
        render_playback_controls(app, ui);
    });
}

fn render_menu_bar(app: &mut EditorApp, ui: &mut egui::Ui) {
    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Open Video... (Ctrl+O)").clicked() {
                ui.close_menu();
                app.open_files_dialog();
            }
            if ui.button("Save (Ctrl+S)").clicked() {
                app.save();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Exit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Edit", |ui| {
            if ui
                .add_enabled(app.history.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                .clicked()
            {
                app.undo();
                ui.close_menu();
            }
            if ui
                .add_enabled(app.history.can_redo(), egui::Button::new("Redo (Ctrl+Y)"))
                .clicked()
            {
                app.redo();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(app.project.clip().is_some(), egui::Button::new("Remove Clip (Del)"))
                .clicked()
            {
                app.remove_clip();
                ui.close_menu();
            }
        });

        ui.menu_button("Project", |ui| {
            if ui.button("New").clicked() {
                app.new_project();
                ui.close_menu();
            }
            if ui.button("Duplicate").clicked() {
                app.duplicate_project();
                ui.close_menu();
            }
            if ui.button("Delete").clicked() {
                app.delete_project();
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui| {
            if ui
                .add_enabled(app.zoom.can_zoom_in(), egui::Button::new("Zoom In (Ctrl+=)"))
                .clicked()
            {
                app.zoom_in();
                ui.close_menu();
            }
            if ui
                .add_enabled(app.zoom.can_zoom_out(), egui::Button::new("Zoom Out (Ctrl+-)"))
                .clicked()
            {
                app.zoom_out();
                ui.close_menu();
            }
        });
    });
}

fn render_status_bar(app: &EditorApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label(&app.status_message);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let saved = if app.store.is_saved(&app.project) {
                "saved"
            } else {
                "unsaved"
            };
            ui.label(format!("{} ({})", app.project.name, saved));
            ui.separator();
            ui.label(format!("{} video(s)", app.library.len()));
            ui.separator();
            ui.label(format!("{}%", app.zoom.percent()));
        });
    });
}

fn render_timeline_panel(app: &mut EditorApp, ui: &mut egui::Ui) {
    let is_playing = app.player.as_ref().is_some_and(|p| p.is_playing());

    // `app.scroll_offset` is where the view is heading; the widget shows
    // the eased value
    let shown = ui.ctx().animate_value_with_time(
        egui::Id::new("timeline_scroll_target"),
        app.scroll_offset as f32,
        SCROLL_ANIMATION_TIME,
    ) as f64;

    let response = TimelineWidget::new(&mut app.timeline, app.project.clip())
        .current_time(app.current_time)
        .playing(is_playing)
        .zoom(app.zoom)
        .scroll(shown)
        .show(ui);

    app.scroll_offset = settle_scroll_target(app.scroll_offset, shown, response.scroll_offset);
    if response.is_dragging {
        ui.ctx().request_repaint();
    }
}

/// New scroll target after a frame. A scroll area ending somewhere other than
/// where it was told to be means the user scrolled (or it clamped), and that
/// wins over the old target.
fn settle_scroll_target(target: f64, shown: f64, reported: f64) -> f64 {
    if (reported - shown).abs() > 0.5 {
        reported
    } else {
        target
    }
}
