pub mod record;
pub mod rubric;
pub mod transcript;
pub mod verdict;

pub use record::*;
pub use rubric::*;
pub use transcript::*;
pub use verdict::*;
