//! Domain models for the Farm Advisory service

mod advisory;
mod context;
mod location;
mod prompt;
mod soil;
mod weather;

pub use advisory::*;
pub use context::*;
pub use location::*;
pub use prompt::*;
pub use soil::*;
pub use weather::*;
