pub mod ambient;
pub mod blob;
pub mod brush;
pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod session;

pub use error::{ClayError, Result};
