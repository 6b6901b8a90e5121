//! Small helpers shared by the classifiers.

pub mod text;
pub mod value;
