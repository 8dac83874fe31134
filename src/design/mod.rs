pub mod classifier;
pub mod decode;
pub mod demo;
pub mod design_model;
