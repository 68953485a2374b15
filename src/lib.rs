//! doclink - Rewrite :doc: cross-references into plain links
//!
//! The core is a single pure function:
//!
//! ```
//! assert_eq!(
//!     doclink::rewrite("See :doc:`Guide<guide.md>` for details."),
//!     "See [Guide](guide.md) for details."
//! );
//! ```
//!
//! Rendering pipelines that dispatch inline roles by name can bind it through
//! a [`RoleRegistry`] instead.

pub mod backends;
pub mod cli;
pub mod core;
pub mod logging;
pub mod refs;

pub use refs::error::{RewriteError, RoleError};
pub use refs::pattern::{count_references, find_references, rewrite, rewrite_bytes, Reference};
pub use refs::role::{render_roles, InlineNode, RoleRegistry};
