//! Unified Result Model
//!
//! Every command maps what it found or changed to this model before
//! rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A documentation file that was (or would be) rewritten
    File,
    /// A single cross-reference found in a file
    Reference,
    /// Text rewritten from an argument or stdin
    Rewrite,
    /// A registered inline role
    Role,
    Error,
}

/// Where the input of a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Walking a documentation tree
    Scan,
    /// An argument or stdin
    Text,
    /// The role registry
    Registry,
}

/// Line-based range (1-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLine {
    pub start: u32,
    pub end: u32,
}

impl RangeLine {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Size in bytes of the rewritten content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// XXH3 hash of the rewritten content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Whether the rewritten content was written back to disk
    #[serde(default)]
    pub written: bool,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Line range within the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeLine>,

    /// Text payload: the rewritten text, or the reference markup as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured data payload (label/target, reference counts, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// How this result was obtained
    pub source_mode: SourceMode,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn base(kind: Kind, source_mode: SourceMode) -> Self {
        Self {
            kind,
            path: None,
            range: None,
            excerpt: None,
            data: None,
            source_mode,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new file result
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::base(Kind::File, SourceMode::Scan)
        }
    }

    /// Create a new reference result
    pub fn reference(path: impl Into<String>, range: RangeLine, excerpt: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            range: Some(range),
            excerpt: Some(excerpt.into()),
            ..Self::base(Kind::Reference, SourceMode::Scan)
        }
    }

    /// Create a new rewrite result for free-standing text
    pub fn rewrite(output: impl Into<String>) -> Self {
        Self {
            excerpt: Some(output.into()),
            ..Self::base(Kind::Rewrite, SourceMode::Text)
        }
    }

    /// Create a new role result
    pub fn role(name: impl Into<String>) -> Self {
        Self {
            excerpt: Some(name.into()),
            ..Self::base(Kind::Role, SourceMode::Registry)
        }
    }

    /// Create a new error result
    pub fn error(error: ItemError) -> Self {
        Self {
            errors: vec![error],
            ..Self::base(Kind::Error, SourceMode::Scan)
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set the path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Sort items by path and range start for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| match (&a.range, &b.range) {
                (Some(ra), Some(rb)) => ra.start.cmp(&rb.start),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items of the given kind
    pub fn count_kind(&self, kind: Kind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_item_file() {
        let item = ResultItem::file("docs/index.rst");
        assert_eq!(item.kind, Kind::File);
        assert_eq!(item.path, Some("docs/index.rst".to_string()));
        assert_eq!(item.source_mode, SourceMode::Scan);
    }

    #[test]
    fn test_result_item_reference() {
        let item = ResultItem::reference("a.rst", RangeLine::new(3, 3), ":doc:`A<a>`");
        assert_eq!(item.kind, Kind::Reference);
        assert_eq!(item.range, Some(RangeLine::new(3, 3)));
        assert_eq!(item.excerpt.as_deref(), Some(":doc:`A<a>`"));
    }

    #[test]
    fn test_result_item_rewrite() {
        let item = ResultItem::rewrite("[A](a)");
        assert_eq!(item.kind, Kind::Rewrite);
        assert_eq!(item.source_mode, SourceMode::Text);
        assert!(item.path.is_none());
    }

    #[test]
    fn test_result_item_error() {
        let item = ResultItem::error(ItemError::new("BINARY_FILE", "binary"))
            .with_path("img.png");
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors[0].code, "BINARY_FILE");
        assert_eq!(item.path.as_deref(), Some("img.png"));
    }

    #[test]
    fn test_result_set_sort() {
        let mut set = ResultSet::new();
        set.push(ResultItem::reference("b.md", RangeLine::new(1, 1), "x"));
        set.push(ResultItem::reference("a.md", RangeLine::new(9, 9), "x"));
        set.push(ResultItem::reference("a.md", RangeLine::new(2, 2), "x"));
        set.sort();

        let order: Vec<_> = set
            .items
            .iter()
            .map(|i| (i.path.clone().unwrap(), i.range.unwrap().start))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.md".to_string(), 2),
                ("a.md".to_string(), 9),
                ("b.md".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_result_item_data_serialization() {
        let item = ResultItem::rewrite("[A](a)").with_data(serde_json::json!({"references": 1}));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"rewrite\""));
        assert!(json.contains("\"data\":{\"references\":1}"));
        assert!(!json.contains("\"errors\""));
    }

    #[test]
    fn test_count_kind() {
        let set: ResultSet = vec![
            ResultItem::file("a.md"),
            ResultItem::error(ItemError::new("E", "e")),
            ResultItem::file("b.md"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.count_kind(Kind::File), 2);
        assert_eq!(set.count_kind(Kind::Error), 1);
        assert_eq!(set.len(), 3);
    }
}
