pub mod decision;
pub mod extraction;
pub mod features;
pub mod processor;
pub mod renal;
