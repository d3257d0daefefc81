//! Utility module

pub mod identifier;
pub mod timestamp;
pub mod url;
