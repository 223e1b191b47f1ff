//! geosite.dat Catalog Format and Loader
//!
//! This module provides the protobuf wire messages for geosite.dat and the
//! loader that turns them into owned category records.

mod format;
mod loader;

pub use format::*;
pub use loader::*;
