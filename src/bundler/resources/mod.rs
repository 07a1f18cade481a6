//! Resources shipped alongside the packaging tool.

pub mod bootstrapper;
