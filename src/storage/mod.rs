//! Storage layer for SaveWarden
//!
//! Raw byte and JSON file access with atomic writes. Backups, restores and
//! settings all go through here.

pub mod file_io;

pub use file_io::{read_bytes, read_json, write_bytes_atomic, write_bytes_new, write_json_atomic};
