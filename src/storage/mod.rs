//! src/storage/mod.rs
mod local;
pub use local::{LocalStorage, SUCCESS_MARKER};
