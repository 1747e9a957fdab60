pub mod gfr;
pub mod staging;

pub use gfr::*;
pub use staging::*;
