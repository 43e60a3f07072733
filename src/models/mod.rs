pub mod preferences;
pub mod schedule;
pub mod section;
pub mod time;


pub use preferences::*;
pub use schedule::*;
pub use section::*;
