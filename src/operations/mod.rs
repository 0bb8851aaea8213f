pub mod blob;
pub mod sculpt;
