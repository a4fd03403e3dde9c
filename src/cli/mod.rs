pub mod capacity;
pub mod extract;
pub mod hide;
pub mod source;

pub use capacity::*;
pub use extract::*;
pub use hide::*;
pub use source::*;
