use crate::app::EditorApp;
use crate::project::AssetId;
use crate::utils::format_size;
use eframe::egui;

const THUMB_SIZE: egui::Vec2 = egui::vec2(64.0, 36.0);

pub fn render_library_panel(app: &mut EditorApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.heading("Media");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("+").on_hover_text("Open Video... (Ctrl+O)").clicked() {
                app.open_files_dialog();
            }
        });
    });

    ui.separator();

    for pending in &app.imports {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.add(
                egui::ProgressBar::new(pending.progress)
                    .text(&pending.name)
                    .desired_width(ui.available_width()),
            );
        });
    }

    if app.library.is_empty() && app.imports.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.label("No videos imported");
            ui.small("Drag & drop or File > Open");
        });
        return;
    }

    let mut place: Option<AssetId> = None;
    let mut remove: Option<AssetId> = None;
    let on_timeline = app.project.clip().map(|c| c.asset_id);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .id_salt("library_scroll")
        .show(ui, |ui| {
            for asset in app.library.assets() {
                let is_placed = on_timeline == Some(asset.id);

                ui.horizontal(|ui| {
                    match app.thumbnails.get(&asset.id) {
                        Some(texture) => {
                            ui.image((texture.id(), THUMB_SIZE));
                        }
                        None => {
                            let (rect, _) = ui.allocate_exact_size(THUMB_SIZE, egui::Sense::hover());
                            ui.painter().rect_filled(rect, 2.0, egui::Color32::from_gray(50));
                            ui.painter().text(
                                rect.center(),
                                egui::Align2::CENTER_CENTER,
                                ">",
                                egui::FontId::proportional(16.0),
                                egui::Color32::from_gray(140),
                            );
                        }
                    }

                    ui.vertical(|ui| {
                        let response = ui.selectable_label(
                            is_placed,
                            egui::RichText::new(&asset.name).small(),
                        );
                        if response.double_clicked() {
                            place = Some(asset.id);
                        }
                        response.on_hover_text(format!(
                            "{}\n{} | {} | {}",
                            asset.path.display(),
                            asset.resolution_string(),
                            asset.duration_string(),
                            format_size(asset.byte_size),
                        ));

                        ui.horizontal(|ui| {
                            ui.small(asset.duration_string());
                            if !asset.decode_ok {
                                ui.small(egui::RichText::new("unreadable").color(egui::Color32::LIGHT_RED));
                            }
                            if ui
                                .add_enabled(!is_placed, egui::Button::new("Use").small())
                                .on_hover_text("Place on the timeline")
                                .clicked()
                            {
                                place = Some(asset.id);
                            }
                            if ui.small_button("x").on_hover_text("Remove from library").clicked() {
                                remove = Some(asset.id);
                            }
                        });
                    });
                });
            }
        });

    if let Some(id) = place {
        app.place_asset(id);
    }
    if let Some(id) = remove {
        app.remove_asset(id);
    }

    ui.separator();
    ui.small(format!(
        "{} video(s), {}",
        app.library.len(),
        format_size(app.library.total_bytes())
    ));
}

pub fn render_projects_section(app: &mut EditorApp, ui: &mut egui::Ui) {
    egui::CollapsingHeader::new("Projects")
        .default_open(false)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Name:");
                let mut name = app.project.name.clone();
                let response = ui.text_edit_singleline(&mut name);
                if response.lost_focus() && name != app.project.name {
                    app.rename_project(&name);
                }
            });

            let current = app.project.id;
            let mut open = None;
            for project in app.store.projects() {
                let label = if project.id == current && !app.store.is_saved(&app.project) {
                    format!("{} *", project.name)
                } else {
                    project.name.clone()
                };
                if ui.selectable_label(project.id == current, label).clicked() && project.id != current {
                    open = Some(project.id);
                }
            }
            if let Some(id) = open {
                app.open_project(id);
            }

            ui.horizontal(|ui| {
                if ui.small_button("New").clicked() {
                    app.new_project();
                }
                if ui.small_button("Duplicate").clicked() {
                    app.duplicate_project();
                }
                if ui.small_button("Delete").clicked() {
                    app.delete_project();
                }
            });
        });
}
