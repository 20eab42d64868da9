//! Rule implementations for modref.
//!
//! ## Module Structure
//!
//! - `module_reference`: documentation of the modules a class or defined
//!   type depends on

pub mod module_reference;

pub use module_reference::{ModuleReferenceRule, check_module_reference_issues};
