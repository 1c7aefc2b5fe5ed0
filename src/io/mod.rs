pub mod loader;
pub mod output;

pub use loader::*;
pub use output::*;
