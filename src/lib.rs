pub mod error;
pub mod file;
pub mod gui;
pub mod math;
pub mod model;

pub use error::{OrreryError, Result};
pub use model::Orrery;
