//! Directory and file access
//!
//! Thin async wrappers over directory enumeration and file reads.

pub mod operations;

pub use operations::{directory_listing, find_entry, list_entries, open_file, render_listing};
