mod contribute;
mod map;
mod stations;

pub use contribute::*;
pub use map::*;
pub use stations::*;
