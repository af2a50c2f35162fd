//! Timeline interaction engine: pixel/time mapping, ruler markers, drag
//! state machines, playhead scrolling and zoom.

mod engine;
mod interaction;
mod mapper;
mod markers;
mod playhead;
mod zoom;

pub use engine::*;
pub use interaction::*;
pub use mapper::*;
pub use markers::*;
pub use playhead::*;
pub use zoom::*;
