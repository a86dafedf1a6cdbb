//! Utility functions for code generation and URL processing.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - Target URL completion and validation

pub mod code_generator;
pub mod url_normalizer;
