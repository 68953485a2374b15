//! Documentation tree scanning
//!
//! Uses the ignore crate for traversal, so .gitignore and friends are
//! honoured unless disabled.

use anyhow::{bail, Result};
use ignore::WalkBuilder;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::core::file_reader::{read_text_file, DEFAULT_MAX_FILE_SIZE};
use crate::core::model::{RangeLine, ResultItem, ResultSet};
use crate::core::paths::{has_extension, make_relative, normalize_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::refs::pattern::find_references;

/// Extensions scanned when none are given
pub const DEFAULT_EXTENSIONS: &[&str] = &["rst", "md", "txt"];

/// Which files of a tree take part in a run
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Limit scanning to a subdirectory (or single file) under root
    pub scope: Option<PathBuf>,

    /// File extensions to include, without the dot
    pub extensions: Vec<String>,

    /// Include hidden files and directories
    pub hidden: bool,

    /// Respect .gitignore and other ignore files
    pub respect_ignore: bool,

    /// Files larger than this are skipped with a warning
    pub max_file_size: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            scope: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            hidden: false,
            respect_ignore: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// List documentation files under root, sorted
pub fn doc_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let scan_path = match &options.scope {
        Some(scope) => resolve(root, scope),
        None => root.to_path_buf(),
    };

    if !scan_path.exists() {
        bail!("Scope does not exist: {}", scan_path.display());
    }

    // An explicit file scope is taken as is, whatever its extension
    if scan_path.is_file() {
        return Ok(vec![scan_path]);
    }

    let mut builder = WalkBuilder::new(&scan_path);
    builder
        .hidden(!options.hidden)
        .ignore(options.respect_ignore)
        .git_ignore(options.respect_ignore)
        .git_global(options.respect_ignore)
        .git_exclude(options.respect_ignore)
        .require_git(false);

    let mut files = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if !has_extension(path, &options.extensions) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    tracing::debug!(
        "found {} documentation files under {}",
        files.len(),
        scan_path.display()
    );
    Ok(files)
}

/// Path shown in results: relative to root when possible
pub fn display_path(path: &Path, root: &Path) -> String {
    make_relative(path, root).unwrap_or_else(|| normalize_path(path))
}

/// Collect every reference in the documentation tree
pub fn collect_references(root: &Path, options: &ScanOptions) -> Result<ResultSet> {
    let mut result_set = ResultSet::new();

    for path in doc_files(root, options)? {
        let relative = display_path(&path, root);

        let content = match read_text_file(&path, options.max_file_size) {
            Ok(content) => content,
            Err(warning) => {
                tracing::warn!("{}: {}", relative, warning.message);
                result_set.push(warning.with_path(relative).to_result_item());
                continue;
            }
        };

        for reference in find_references(&content) {
            let range = RangeLine::new(
                reference.line,
                reference.line + reference.line_span() - 1,
            );
            let item = ResultItem::reference(relative.clone(), range, reference.raw.clone())
                .with_data(json!({
                    "label": reference.label,
                    "target": reference.target,
                    "link": reference.to_link(),
                }));
            result_set.push(item);
        }
    }

    result_set.sort();
    Ok(result_set)
}

/// Run the refs command
pub fn run_refs(root: &Path, options: &ScanOptions, config: RenderConfig) -> Result<()> {
    let result_set = collect_references(root, options)?;
    tracing::info!("{} references found", result_set.len());

    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;
    Ok(())
}
