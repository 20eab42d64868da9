//! Core data types shared by analysis and reporting.
//!
//! ## Module Structure
//!
//! - `source`: Source code location types (SourceContext, SourceLocation)

pub mod source;

pub use source::{SourceContext, SourceLocation};
