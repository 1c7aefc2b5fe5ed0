pub mod pace;
pub mod sentiment;
pub mod summary;
pub mod word_match;

pub use pace::*;
pub use sentiment::*;
pub use summary::*;
pub use word_match::*;
