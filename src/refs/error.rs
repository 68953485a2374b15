use thiserror::Error;

/// Errors raised at the boundary of the reference rewriter.
///
/// The rewrite itself cannot fail; these only describe inputs that never
/// reach it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("input must be textual: {reason}")]
    InvalidInputKind { reason: String },
}

/// Errors raised by the inline role registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("unknown role: {name}")]
    UnknownRole { name: String },

    #[error("role already registered: {name}")]
    DuplicateRole { name: String },

    #[error("invalid role name: {name:?}")]
    InvalidName { name: String },
}
