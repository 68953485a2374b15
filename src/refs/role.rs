//! Inline role registry
//!
//! A rendering pipeline owns a `RoleRegistry` and looks roles up by name when
//! it meets inline markup such as :doc:`Guide<guide.md>`. Nothing is
//! registered behind the caller's back: a registry starts empty, and
//! `with_defaults` is the only place the `doc` role gets bound.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::refs::error::RoleError;
use crate::refs::pattern::rewrite;

/// Name of the cross-reference role bound by `RoleRegistry::with_defaults`
pub const DOC_ROLE: &str = "doc";

/// Static regex for generic inline roles
/// Format: :name:`body`
pub static ROLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s):([A-Za-z][A-Za-z0-9_.+-]*):`([^`]*)`").expect("Invalid ROLE_RE regex")
});

static ROLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_.+-]*$").expect("Invalid ROLE_NAME_RE regex")
});

/// A role transform: complete role markup in, inline markup out
pub type RoleTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Inline markup produced by a role, keeping the markup it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineNode {
    /// The role markup as it appeared in the source
    pub rawtext: String,

    /// Rendered content
    pub content: String,
}

/// Named inline role transforms
#[derive(Clone, Default)]
pub struct RoleRegistry {
    roles: BTreeMap<String, RoleTransform>,
}

impl fmt::Debug for RoleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleRegistry")
            .field("roles", &self.names())
            .finish()
    }
}

impl RoleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the `doc` role bound to the reference rewriter
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.replace(DOC_ROLE, rewrite);
        registry
    }

    /// Register a role, refusing to shadow an existing one
    pub fn register<F>(&mut self, name: &str, transform: F) -> Result<(), RoleError>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        if !ROLE_NAME_RE.is_match(name) {
            return Err(RoleError::InvalidName {
                name: name.to_string(),
            });
        }
        if self.roles.contains_key(name) {
            return Err(RoleError::DuplicateRole {
                name: name.to_string(),
            });
        }
        self.roles.insert(name.to_string(), Arc::new(transform));
        Ok(())
    }

    /// Register a role, overwriting any previous binding.
    /// Returns true when an existing role was replaced.
    pub fn replace<F>(&mut self, name: &str, transform: F) -> bool
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.roles
            .insert(name.to_string(), Arc::new(transform))
            .is_some()
    }

    /// Remove a role
    pub fn unregister(&mut self, name: &str) -> Option<RoleTransform> {
        self.roles.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Registered role names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.roles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Apply the role `name` to its raw markup
    pub fn invoke(&self, name: &str, rawtext: &str) -> Result<InlineNode, RoleError> {
        let transform = self.roles.get(name).ok_or_else(|| RoleError::UnknownRole {
            name: name.to_string(),
        })?;

        Ok(InlineNode {
            rawtext: rawtext.to_string(),
            content: transform(rawtext.trim()),
        })
    }
}

/// Render every registered inline role in `text`.
///
/// Roles the registry does not know are left as written.
pub fn render_roles(text: &str, registry: &RoleRegistry) -> String {
    ROLE_RE
        .replace_all(text, |caps: &Captures| {
            match registry.invoke(&caps[1], &caps[0]) {
                Ok(node) => node.content,
                Err(e) => {
                    tracing::debug!("leaving role as written: {}", e);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = RoleRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains(DOC_ROLE));
    }

    #[test]
    fn test_with_defaults_binds_doc() {
        let registry = RoleRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["doc"]);

        let node = registry.invoke("doc", ":doc:`Guide<guide.md>`").unwrap();
        assert_eq!(node.content, "[Guide](guide.md)");
        assert_eq!(node.rawtext, ":doc:`Guide<guide.md>`");
    }

    #[test]
    fn test_invoke_trims_rawtext() {
        let registry = RoleRegistry::with_defaults();
        let node = registry.invoke("doc", "  :doc:`A<a>`\n").unwrap();
        assert_eq!(node.content, "[A](a)");
        assert_eq!(node.rawtext, "  :doc:`A<a>`\n");
    }

    #[test]
    fn test_invoke_unknown_role() {
        let registry = RoleRegistry::new();
        let err = registry.invoke("doc", ":doc:`A<a>`").unwrap_err();
        assert_eq!(
            err,
            RoleError::UnknownRole {
                name: "doc".to_string()
            }
        );
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = RoleRegistry::with_defaults();
        let err = registry.register("doc", |s| s.to_uppercase()).unwrap_err();
        assert!(matches!(err, RoleError::DuplicateRole { .. }));

        // The original binding survives
        let node = registry.invoke("doc", ":doc:`A<a>`").unwrap();
        assert_eq!(node.content, "[A](a)");
    }

    #[test]
    fn test_register_invalid_name() {
        let mut registry = RoleRegistry::new();
        assert!(matches!(
            registry.register("", |s| s.to_string()),
            Err(RoleError::InvalidName { .. })
        ));
        assert!(matches!(
            registry.register("has space", |s| s.to_string()),
            Err(RoleError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_replace_and_unregister() {
        let mut registry = RoleRegistry::with_defaults();
        assert!(registry.replace("doc", |_| "x".to_string()));
        assert_eq!(registry.invoke("doc", ":doc:`A<a>`").unwrap().content, "x");

        assert!(registry.unregister("doc").is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = RoleRegistry::with_defaults();
        registry.register("abbr", |s| s.to_string()).unwrap();
        registry.register("kbd", |s| s.to_string()).unwrap();
        assert_eq!(registry.names(), vec!["abbr", "doc", "kbd"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_render_roles_default_registry() {
        let registry = RoleRegistry::with_defaults();
        let text = "See :doc:`Guide<guide.md>` and :ref:`other` too.";
        assert_eq!(
            render_roles(text, &registry),
            "See [Guide](guide.md) and :ref:`other` too."
        );
    }

    #[test]
    fn test_render_roles_custom_role() {
        let mut registry = RoleRegistry::new();
        registry
            .register("kbd", |raw| {
                let body = raw.trim_start_matches(":kbd:`").trim_end_matches('`');
                format!("<kbd>{}</kbd>", body)
            })
            .unwrap();

        assert_eq!(
            render_roles("Press :kbd:`Ctrl+C` now", &registry),
            "Press <kbd>Ctrl+C</kbd> now"
        );
    }

    #[test]
    fn test_render_roles_doc_without_target() {
        // The role is registered, but the body is not a reference
        let registry = RoleRegistry::with_defaults();
        assert_eq!(render_roles(":doc:`intro`", &registry), ":doc:`intro`");
    }

    #[test]
    fn test_render_roles_empty_registry_is_identity() {
        let registry = RoleRegistry::new();
        let text = ":doc:`A<a>` :ref:`b`";
        assert_eq!(render_roles(text, &registry), text);
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RoleRegistry>();
    }

    #[test]
    fn test_invoke_from_many_threads() {
        let registry = RoleRegistry::with_defaults();
        let inputs: Vec<String> = (0..16)
            .map(|i| format!("  :doc:`Page {i}<page-{i}.md>`  "))
            .collect();
        let serial: Vec<String> = inputs
            .iter()
            .map(|input| registry.invoke(DOC_ROLE, input).unwrap().content)
            .collect();

        let shared = &registry;
        let threaded: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|input| scope.spawn(move || shared.invoke(DOC_ROLE, input).unwrap().content))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(threaded, serial);
        assert_eq!(threaded[3], "[Page 3](page-3.md)");
    }

    #[test]
    fn test_debug_lists_names() {
        let registry = RoleRegistry::with_defaults();
        assert!(format!("{:?}", registry).contains("doc"));
    }
}
