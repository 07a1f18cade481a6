//! INF-format script generation.
//!
//! - [`document`]: ordered section-keyed text documents
//! - [`script`]: install script assembly, volume labels and quoting

pub mod document;
pub mod script;

pub use document::{CRLF, InfDocument};
pub use script::{DiskSet, InstallScript, quoted};
