//! Backends module - Command runners
//!
//! Provides:
//! - scan: Documentation tree traversal and reference listing
//! - apply: Rewriting references across a tree
//! - text: Rewriting and role rendering for free-standing text

pub mod apply;
pub mod scan;
pub mod text;
