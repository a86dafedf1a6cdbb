//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without persistence concerns.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to its target URL, with a click counter
//! - [`NewLink`] - Input for creating a link once a free code is secured

pub mod link;

pub use link::{Link, NewLink};
