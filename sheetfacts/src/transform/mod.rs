//! Transformation module.
//!
//! - Projection: Virtual sheets derived from a table
//! - Pipeline: The host modules built on top of reader, extractor and writer

pub mod pipeline;
pub mod projection;

pub use pipeline::*;
pub use projection::*;
