mod canvas;
mod clip;
mod history;
mod media;
#[allow(clippy::module_inception)]
mod project;
mod store;

pub use canvas::*;
pub use clip::*;
pub use history::*;
pub use media::*;
pub use project::*;
pub use store::*;
