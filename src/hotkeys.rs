use eframe::egui::{Key, Modifiers};

/// Editor actions reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Undo,
    Redo,
    Save,
    TogglePlayback,
    RemoveClip,
    ZoomIn,
    ZoomOut,
    OpenFiles,
}

/// Map one key press to a command. `modifiers.command` is Ctrl, or Cmd on macOS.
pub fn command_for(key: Key, modifiers: Modifiers) -> Option<EditorCommand> {
    let command = modifiers.command;
    match key {
        Key::Z if command && modifiers.shift => Some(EditorCommand::Redo),
        Key::Z if command => Some(EditorCommand::Undo),
        Key::Y if command => Some(EditorCommand::Redo),
        Key::S if command => Some(EditorCommand::Save),
        Key::O if command => Some(EditorCommand::OpenFiles),
        Key::Equals | Key::Plus if command => Some(EditorCommand::ZoomIn),
        Key::Minus if command => Some(EditorCommand::ZoomOut),
        Key::Space if !command => Some(EditorCommand::TogglePlayback),
        Key::Delete if !command => Some(EditorCommand::RemoveClip),
        _ => None,
    }
}

/// Commands for every key pressed this frame
pub fn commands_this_frame(input: &eframe::egui::InputState) -> Vec<EditorCommand> {
    input
        .events
        .iter()
        .filter_map(|event| match event {
            eframe::egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => command_for(*key, *modifiers),
            _ => None,
        })
        .collect()
}
