use crate::config::EditorConfig;
use crate::effects::apply_effects;
use crate::error::{EditorError, Result};
use crate::hotkeys::{commands_this_frame, EditorCommand};
use crate::media::{FfmpegTools, ImportEvent, ImportId, Importer, VIDEO_EXTENSIONS};
use crate::player::PreviewPlayer;
use crate::project::{
    AspectRatio, AssetId, AudioSettings, ClipPosition, Effects, History, MediaLibrary, Project,
    ProjectId, ProjectStore, Thumbnail, Transform, UNTITLED_PROJECT,
};
use crate::timeline::{TimelineEngine, TimelineEvent, Zoom};
use crate::ui::Toasts;
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// An import still running in the background
#[derive(Debug, Clone)]
pub struct PendingImport {
    pub id: ImportId,
    pub name: String,
    pub progress: f32,
}

pub struct EditorApp {
    pub config: EditorConfig,
    tools: FfmpegTools,
    importer: Option<Importer>,
    pub status_message: String,

    // Projects
    pub store: ProjectStore,
    /// Working copy of the open project; `save` commits it to the store
    pub project: Project,
    pub history: History<Project>,

    // Library
    pub library: MediaLibrary,
    pub thumbnails: HashMap<AssetId, egui::TextureHandle>,
    pub imports: Vec<PendingImport>,

    // Timeline state
    pub timeline: TimelineEngine,
    pub zoom: Zoom,
    pub scroll_offset: f64,
    /// Seconds into the clip's trimmed window
    pub current_time: f64,

    // Preview
    pub player: Option<PreviewPlayer>,
    player_audio: Option<AudioSettings>,
    pub preview_texture: Option<egui::TextureHandle>,
    last_frame_pts: f64,
    last_effects: Effects,

    pub toasts: Toasts,
}

impl EditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        // Ctrl+=/- belong to the timeline zoom
        cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);

        let tools = FfmpegTools::from_config(&config);
        let mut toasts = Toasts::default();
        if !tools.is_available() {
            log::warn!("ffmpeg not found at '{}'", config.ffmpeg_path);
            toasts.error("ffmpeg was not found; imports and preview will fail");
        }

        let importer = match Importer::new(tools.clone(), config.thumbnail_time) {
            Ok(importer) => Some(importer),
            Err(e) => {
                log::error!("Cannot start the import runtime: {}", e);
                toasts.error(format!("Imports disabled: {}", e));
                None
            }
        };

        let mut store = ProjectStore::new();
        let mut project = store.first().clone();
        project.set_aspect_ratio(config.default_aspect_ratio);
        store.save(&project);

        Self {
            tools,
            importer,
            status_message: String::from("Ready"),

            store,
            project,
            history: History::new(config.undo_depth),

            library: MediaLibrary::new(),
            thumbnails: HashMap::new(),
            imports: Vec::new(),

            timeline: TimelineEngine::new(config.autoscroll_margin),
            zoom: config.default_zoom,
            scroll_offset: 0.0,
            current_time: 0.0,

            player: None,
            player_audio: None,
            preview_texture: None,
            last_frame_pts: -1.0,
            last_effects: Effects::default(),

            toasts,
            config,
        }
    }

    fn report_error(&mut self, action: &str, error: EditorError) {
        log::warn!("{} failed: {}", action, error);
        self.status_message = format!("{} failed", action);
        self.toasts.error(format!("{}: {}", action, error));
    }

    /// Apply one edit to the working copy. The pre-edit state goes on the
    /// undo stack only when `record` is set and the edit succeeds.
    fn edit_project(
        &mut self,
        action: &str,
        record: bool,
        edit: impl FnOnce(&mut Project) -> Result<()>,
    ) -> bool {
        match apply_edit(&mut self.project, &mut self.history, record, edit) {
            Ok(()) => true,
            Err(e) => {
                self.report_error(action, e);
                false
            }
        }
    }

    // ---- Import ----

    pub fn open_files_dialog(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Video", VIDEO_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_files()
        {
            self.add_files(paths);
        }
    }

    pub fn add_files(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            let Some(ref importer) = self.importer else {
                self.toasts.error("Imports are unavailable");
                return;
            };
            if let Err(e) = importer.import(path) {
                self.report_error("Import", e);
            }
        }
    }

    /// Drain import events and commit finished assets
    pub fn poll_imports(&mut self, ctx: &egui::Context) {
        let events = self
            .importer
            .as_ref()
            .map(|importer| importer.poll())
            .unwrap_or_default();

        for event in events {
            match event {
                ImportEvent::Started { id, name } => {
                    self.imports.push(PendingImport {
                        id,
                        name,
                        progress: 0.0,
                    });
                }
                ImportEvent::Progress { id, fraction } => {
                    if let Some(pending) = self.imports.iter_mut().find(|p| p.id == id) {
                        pending.progress = fraction;
                    }
                }
                ImportEvent::Finished { id, asset } => {
                    self.imports.retain(|p| p.id != id);
                    if asset.thumbnail.is_placeholder() {
                        log::debug!("No thumbnail for {}", asset.name);
                    } else if let Some(texture) =
                        thumbnail_texture(ctx, asset.id, &asset.thumbnail)
                    {
                        self.thumbnails.insert(asset.id, texture);
                    }
                    if asset.decode_ok {
                        self.toasts.info(format!("Imported {}", asset.name));
                    } else {
                        self.toasts.error(format!(
                            "{} could not be read; using a placeholder",
                            asset.name
                        ));
                    }
                    self.status_message = format!("Imported: {}", asset.name);

                    let asset_id = asset.id;
                    self.library.add(asset);
                    if self.project.clip().is_none() {
                        self.place_asset(asset_id);
                    }
                }
                ImportEvent::Failed { id, name, error } => {
                    self.imports.retain(|p| p.id != id);
                    self.status_message = format!("Import failed: {}", name);
                    self.toasts.error(format!("Import of {} failed: {}", name, error));
                }
            }
        }

        if !self.imports.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    // ---- Library / clip ----

    pub fn place_asset(&mut self, id: AssetId) {
        let Some(asset) = self.library.get(id).cloned() else {
            return;
        };
        if self.edit_project("Place clip", true, |p| p.place_asset(&asset).map(|_| ())) {
            self.status_message = format!("On timeline: {}", asset.name);
        }
    }

    /// Drop an asset from the library, taking its clip off the timeline too
    pub fn remove_asset(&mut self, id: AssetId) {
        if self.project.clip().is_some_and(|c| c.asset_id == id) {
            self.remove_clip();
        }
        if let Some(asset) = self.library.remove(id) {
            self.thumbnails.remove(&id);
            self.status_message = format!("Removed: {}", asset.name);
        }
    }

    pub fn remove_clip(&mut self) {
        if self.project.clip().is_none() {
            return;
        }
        self.history.record(self.project.clone());
        if let Some(clip) = self.project.remove_clip() {
            self.status_message = format!("Removed from timeline: {}", clip.name);
        }
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        if self.project.aspect_ratio == aspect_ratio {
            return;
        }
        self.edit_project("Aspect ratio", true, |p| {
            p.set_aspect_ratio(aspect_ratio);
            Ok(())
        });
    }

    pub fn update_position(&mut self, position: ClipPosition, record: bool) {
        self.edit_project("Trim", record, |p| p.set_position(position));
    }

    pub fn update_transform(&mut self, transform: Transform, record: bool) {
        self.edit_project("Transform", record, |p| p.set_transform(transform));
    }

    pub fn update_effects(&mut self, effects: Effects, record: bool) {
        self.edit_project("Effects", record, |p| p.set_effects(effects));
    }

    pub fn update_audio(&mut self, audio: AudioSettings, record: bool) {
        self.edit_project("Audio", record, |p| p.set_audio(audio));
    }

    // ---- History ----

    pub fn undo(&mut self) {
        if self.timeline.is_interacting() {
            self.timeline.pointer_capture_lost();
        }
        match self.history.undo(self.project.clone()) {
            Some(previous) => {
                self.project = restore_snapshot(&self.project, previous);
                log::info!("Undo ({} step(s) left)", self.history.undo_len());
                self.status_message = "Undo".to_string();
            }
            None => self.status_message = "Nothing to undo".to_string(),
        }
    }

    pub fn redo(&mut self) {
        if self.timeline.is_interacting() {
            self.timeline.pointer_capture_lost();
        }
        match self.history.redo(self.project.clone()) {
            Some(next) => {
                self.project = restore_snapshot(&self.project, next);
                log::info!("Redo");
                self.status_message = "Redo".to_string();
            }
            None => self.status_message = "Nothing to redo".to_string(),
        }
    }

    // ---- Projects ----

    pub fn save(&mut self) {
        self.store.save(&self.project);
        log::info!("Saved project '{}'", self.project.name);
        self.status_message = format!("Saved: {}", self.project.name);
        self.toasts.info(format!("Saved {}", self.project.name));
    }

    /// Switch to another stored project. The current working copy is
    /// committed first; undo history does not carry across projects.
    pub fn open_project(&mut self, id: ProjectId) {
        self.store.save(&self.project);
        match self.store.get(id).cloned() {
            Some(project) => self.load_project(project),
            None => self.report_error("Open project", EditorError::ProjectNotFound),
        }
    }

    fn load_project(&mut self, project: Project) {
        log::info!("Opened project '{}'", project.name);
        self.status_message = format!("Project: {}", project.name);
        self.project = project;
        self.history.clear();
        self.scroll_offset = 0.0;
    }

    pub fn new_project(&mut self) {
        let id = self
            .store
            .create(UNTITLED_PROJECT, self.config.default_aspect_ratio);
        self.open_project(id);
    }

    pub fn duplicate_project(&mut self) {
        self.store.save(&self.project);
        match self.store.duplicate(self.project.id) {
            Ok(id) => self.open_project(id),
            Err(e) => self.report_error("Duplicate project", e),
        }
    }

    pub fn delete_project(&mut self) {
        let name = self.project.name.clone();
        if let Err(e) = self.store.delete(self.project.id) {
            self.report_error("Delete project", e);
            return;
        }
        log::info!("Deleted project '{}'", name);
        self.toasts.info(format!("Deleted {}", name));
        let next = self.store.first().clone();
        self.load_project(next);
    }

    /// Renames apply to the stored project straight away and are not undoable
    pub fn rename_project(&mut self, name: &str) {
        self.project.rename(name);
        if let Err(e) = self.store.rename(self.project.id, name) {
            self.report_error("Rename project", e);
        }
    }

    // ---- Playback ----

    pub fn seek(&mut self, time: f64) {
        let duration = self.project.clip().map(|c| c.duration()).unwrap_or(0.0);
        let clamped = time.clamp(0.0, duration.max(0.0));
        if let Some(ref player) = self.player {
            player.seek(clamped);
        }
        self.current_time = clamped;
        // Reset so the next frame is always uploaded to the texture
        self.last_frame_pts = -1.0;
    }

    pub fn toggle_play_pause(&mut self) {
        let result = match self.player {
            Some(ref player) => player.toggle_play_pause(),
            None => return,
        };
        if let Err(e) = result {
            self.report_error("Playback", e);
        }
    }

    pub fn stop_player(&mut self) {
        if let Some(ref player) = self.player {
            player.stop();
        }
        self.current_time = 0.0;
        self.last_frame_pts = -1.0;
    }

    pub fn zoom_in(&mut self) {
        self.timeline.zoom_in(self.zoom);
    }

    pub fn zoom_out(&mut self) {
        self.timeline.zoom_out(self.zoom);
    }

    /// Keep the preview player on the timeline clip
    fn sync_player(&mut self) {
        let Some(clip) = self.project.clip() else {
            if self.player.take().is_some() {
                self.preview_texture = None;
                self.player_audio = None;
                self.current_time = 0.0;
            }
            return;
        };

        match self.player {
            Some(ref player) if player.clip_id() == clip.id => {
                player.set_window(clip.position);
                if self.player_audio != Some(clip.audio) {
                    player.set_audio(&clip.audio);
                    self.player_audio = Some(clip.audio);
                }
            }
            _ => {
                let (width, height) = self
                    .library
                    .get(clip.asset_id)
                    .map(|a| (a.width, a.height))
                    .unwrap_or((0, 0));
                log::info!("Loading preview for {}", clip.name);
                self.player = Some(PreviewPlayer::new(&self.tools, clip, width, height));
                self.player_audio = Some(clip.audio);
                self.preview_texture = None;
                self.current_time = 0.0;
                self.last_frame_pts = -1.0;
            }
        }
    }

    /// Pull time and frame from the player. The texture is only rebuilt when
    /// the frame or the effects changed.
    fn update_player(&mut self, ctx: &egui::Context) {
        let Some(ref player) = self.player else {
            return;
        };
        self.current_time = player.current_time();

        let effects = self
            .project
            .clip()
            .map(|c| c.effects)
            .unwrap_or_default();
        if let Some(frame) = player.current_frame() {
            let new_frame = (frame.pts - self.last_frame_pts).abs() > 0.001;
            if new_frame || effects != self.last_effects {
                self.last_frame_pts = frame.pts;
                self.last_effects = effects;
                let frame = apply_effects(&frame, &effects);
                let size = [frame.width as usize, frame.height as usize];
                if frame.data.len() == size[0] * size[1] * 4 {
                    let image = egui::ColorImage::from_rgba_unmultiplied(size, &frame.data);
                    self.preview_texture =
                        Some(ctx.load_texture("video_frame", image, egui::TextureOptions::LINEAR));
                }
            }
        }

        if player.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(30));
        } else {
            // Seeks decode in the background
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    /// Commit everything the timeline asked for this frame
    fn apply_timeline_events(&mut self) {
        for event in self.timeline.drain_events() {
            if let Err(e) = commit_timeline_edit(&mut self.project, &mut self.history, &event) {
                self.report_error("Trim", e);
            }
            match event {
                TimelineEvent::TimeUpdate(time) => self.seek(time),
                TimelineEvent::PositionChange(_) => {
                    if let (Some(player), Some(clip)) = (&self.player, self.project.clip()) {
                        player.set_window(clip.position);
                    }
                }
                TimelineEvent::ZoomChange(zoom) => self.zoom = zoom,
                // Eased in by the timeline panel
                TimelineEvent::ScrollTo(offset) => self.scroll_offset = offset,
                TimelineEvent::InteractionStarted => {}
                TimelineEvent::InteractionEnded => {
                    log::debug!("Timeline interaction ended");
                }
            }
        }
    }

    /// Handle keyboard shortcuts
    pub fn handle_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let commands = ctx.input(commands_this_frame);
        for command in commands {
            match command {
                EditorCommand::Undo => self.undo(),
                EditorCommand::Redo => self.redo(),
                EditorCommand::Save => self.save(),
                EditorCommand::TogglePlayback => self.toggle_play_pause(),
                EditorCommand::RemoveClip => self.remove_clip(),
                EditorCommand::ZoomIn => self.zoom_in(),
                EditorCommand::ZoomOut => self.zoom_out(),
                EditorCommand::OpenFiles => self.open_files_dialog(),
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.add_files(dropped);
        }
    }

    /// End a drag whose release egui never reported to the widget
    fn check_capture_lost(&mut self, ctx: &egui::Context) {
        if !self.timeline.is_interacting() {
            return;
        }
        let (released, focused) = ctx.input(|i| (!i.pointer.any_down(), i.focused));
        if released || !focused {
            self.timeline.pointer_capture_lost();
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_input(ctx);
        self.poll_imports(ctx);

        // A new clip identity resets the timeline view
        self.sync_player();
        if self.timeline.sync_clip(self.project.clip()) {
            self.scroll_offset = 0.0;
        }
        self.apply_timeline_events();

        self.update_player(ctx);

        crate::ui::render_main_window(self, ctx);

        self.apply_timeline_events();
        self.check_capture_lost(ctx);
        self.apply_timeline_events();

        self.toasts.show(ctx);

        if self.timeline.is_interacting() {
            ctx.request_repaint();
        }
    }
}

/// Run `edit` against `project`. The pre-edit state goes on the undo stack
/// only when `record` is set and the edit succeeds; a failed edit leaves both
/// the project and the history as they were.
pub fn apply_edit(
    project: &mut Project,
    history: &mut History<Project>,
    record: bool,
    edit: impl FnOnce(&mut Project) -> Result<()>,
) -> Result<()> {
    let before = project.clone();
    match edit(project) {
        Ok(()) => {
            if record {
                history.record(before);
            }
            Ok(())
        }
        Err(e) => {
            *project = before;
            Err(e)
        }
    }
}

/// Project side of one timeline event. A whole drag is a single undo step,
/// recorded when it starts; the position updates it streams are not.
pub fn commit_timeline_edit(
    project: &mut Project,
    history: &mut History<Project>,
    event: &TimelineEvent,
) -> Result<()> {
    match event {
        TimelineEvent::InteractionStarted => {
            history.record(project.clone());
            Ok(())
        }
        TimelineEvent::PositionChange(position) => {
            let position = *position;
            apply_edit(project, history, false, |p| p.set_position(position))
        }
        _ => Ok(()),
    }
}

/// State to show after undo or redo. The name is not part of the history.
fn restore_snapshot(current: &Project, snapshot: Project) -> Project {
    Project {
        name: current.name.clone(),
        ..snapshot
    }
}

fn thumbnail_texture(
    ctx: &egui::Context,
    id: AssetId,
    thumbnail: &Thumbnail,
) -> Option<egui::TextureHandle> {
    match thumbnail {
        Thumbnail::Frame {
            width,
            height,
            rgba,
        } => {
            let size = [*width as usize, *height as usize];
            if rgba.len() != size[0] * size[1] * 4 {
                log::warn!("Thumbnail buffer size mismatch for {}", id);
                return None;
            }
            let image = egui::ColorImage::from_rgba_unmultiplied(size, rgba);
            Some(ctx.load_texture(format!("thumb-{}", id), image, egui::TextureOptions::LINEAR))
        }
        Thumbnail::Placeholder => None,
    }
}
