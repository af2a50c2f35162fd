mod frame;
mod import;
mod probe;
mod thumbnail;
mod tools;

pub use frame::*;
pub use import::*;
pub use probe::*;
pub use thumbnail::*;
pub use tools::*;
