//! Shared helpers for the bundler.

pub mod checksum;
pub mod fs;
pub mod shortname;
