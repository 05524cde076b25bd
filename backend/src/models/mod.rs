pub mod reference;
pub mod schedule;
pub mod time;

pub use reference::*;
pub use schedule::*;
pub use time::*;
