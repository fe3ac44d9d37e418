//! Data models for Decora

mod chat;
mod design;
mod selection;

pub use chat::*;
pub use design::*;
pub use selection::*;
