//! modref - module reference documentation checker for Puppet manifests
//!
//! modref is a CLI tool and library that checks that every class and defined
//! type documents, in the comment header above it, the modules its body
//! depends on: internal `role::` / `profile::` classes, external components
//! from the Puppet forge, and feature classes enabled through
//! `role::include_features`.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Tokenizer, reference extraction and annotation validation
//! - `issues`: Issue type definitions and reporting
//! - `rules`: The module reference rule applied to each manifest

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;
