mod canvas;
mod library;
mod main_window;
mod properties;
mod timeline_widget;
mod toasts;

pub use canvas::*;
pub use library::*;
pub use main_window::*;
pub use properties::*;
pub use timeline_widget::*;
pub use toasts::*;
