pub mod assessment;
pub mod enums;
pub mod features;
pub mod record;

pub use assessment::*;
pub use enums::*;
pub use features::*;
pub use record::*;
