//! Exercise catalog.
//!
//! Supplies the session's audio exercises: a built-in set shipped with the
//! app plus exercises scanned from a directory of audio/script/subtitle
//! file triples.

pub mod builtin;
pub mod scan;

pub use builtin::{builtin_exercises, builtin_video_exercises};
pub use scan::{scan, CatalogDirs, CatalogError};
