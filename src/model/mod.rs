pub mod orrery;

pub use orrery::Orrery;
