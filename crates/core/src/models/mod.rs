//! Domain models shared across media catalog services

pub mod content;

pub use content::{ContentRecord, ContentTag, SourceType};
