//! Refs module - Rewrite documentation cross-references into links
//!
//! A reference is a doc role with an explicit title and target:
//! :doc:`Label<target>`  ->  [Label](target)

pub mod error;
pub mod pattern;
pub mod role;
