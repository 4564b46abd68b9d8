//! Core data models for SaveWarden
//!
//! Save slot profiles and backup snapshot metadata.

pub mod profile;
pub mod save_file;

pub use profile::Profile;
pub use save_file::SaveFileInfo;
