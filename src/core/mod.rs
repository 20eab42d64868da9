//! Core analysis engine.
//!
//! ## Pipeline
//!
//! 1. `lexer`: manifest source to [`Token`]s
//! 2. `declarations`: class and defined type definitions in the token stream
//! 3. `body`: where a declaration's body starts
//! 4. `extract`: ordered dependency references of a body
//! 5. `comments`: annotation lines of the header above a declaration
//! 6. `validate`: annotation checks against the references
//!
//! `directives`, `file_scanner` and `context` support the pipeline.

pub mod body;
pub mod comments;
pub mod context;
pub mod data;
pub mod declarations;
pub mod directives;
pub mod extract;
pub mod file_scanner;
pub mod lexer;
pub mod token;
pub mod validate;

pub use context::{CheckContext, SourceFile};
pub use data::{SourceContext, SourceLocation};
pub use extract::{Reference, ReferenceKind, ReferencePolicy};
pub use token::{Token, TokenKind};
pub use validate::{AnnotationValidator, Violation};
