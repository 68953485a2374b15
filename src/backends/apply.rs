//! Apply backend - Rewrite references across a documentation tree

use anyhow::{bail, Result};
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::backends::scan::{display_path, doc_files, ScanOptions};
use crate::core::file_reader::{read_text_file, FileWarning, WarningCode};
use crate::core::model::{Kind, Meta, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::hash_bytes;
use crate::refs::pattern::{count_references, rewrite_cow};

/// What to do with rewritten content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Report what would change
    #[default]
    DryRun,
    /// Write changed files back
    Write,
}

/// Rewrite a single file. Returns None when the file has no references.
pub fn apply_file(path: &Path, root: &Path, mode: ApplyMode, max_file_size: u64) -> Option<ResultItem> {
    let relative = display_path(path, root);

    let content = match read_text_file(path, max_file_size) {
        Ok(content) => content,
        Err(warning) => {
            tracing::warn!("{}: {}", relative, warning.message);
            return Some(warning.with_path(relative).to_result_item());
        }
    };

    let references = count_references(&content);
    if references == 0 {
        return None;
    }

    let rewritten = rewrite_cow(&content);

    let mut meta = Meta {
        size: Some(rewritten.len() as u64),
        hash: Some(hash_bytes(rewritten.as_bytes())),
        written: false,
    };

    if mode == ApplyMode::Write {
        if let Err(e) = write_atomic(path, rewritten.as_bytes()) {
            let warning = FileWarning::new(
                WarningCode::FileWriteFailed,
                format!("Cannot write file: {}", e),
            );
            tracing::warn!("{}: {}", relative, warning.message);
            return Some(warning.with_path(relative).to_result_item());
        }
        tracing::debug!("rewrote {} references in {}", references, relative);
        meta.written = true;
    }

    Some(
        ResultItem::file(relative)
            .with_meta(meta)
            .with_data(json!({ "references": references })),
    )
}

/// Replace `path` with `contents` via a sibling temp file and rename,
/// keeping the original permissions.
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn apply_files(files: &[PathBuf], root: &Path, mode: ApplyMode, max_file_size: u64) -> Vec<ResultItem> {
    #[cfg(feature = "parallel")]
    let iter = files.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = files.iter();

    iter.filter_map(|path| apply_file(path, root, mode, max_file_size))
        .collect()
}

/// Rewrite every documentation file under root
pub fn apply_tree(root: &Path, options: &ScanOptions, mode: ApplyMode) -> Result<ResultSet> {
    let files = doc_files(root, options)?;

    let mut result_set = ResultSet::new();
    result_set.extend(apply_files(&files, root, mode, options.max_file_size));
    result_set.sort();
    Ok(result_set)
}

/// Run the apply command
pub fn run_apply(
    root: &Path,
    options: &ScanOptions,
    mode: ApplyMode,
    check: bool,
    config: RenderConfig,
) -> Result<()> {
    let result_set = apply_tree(root, options, mode)?;

    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;

    let changed = result_set.count_kind(Kind::File);
    let failed = result_set.count_kind(Kind::Error);
    tracing::info!("{} files with references, {} skipped", changed, failed);

    if check && changed > 0 && mode == ApplyMode::DryRun {
        for item in result_set.items.iter().filter(|i| i.kind == Kind::File) {
            if let Some(path) = &item.path {
                eprintln!("{} {}", "would rewrite".yellow(), path.as_str().bold());
            }
        }
        bail!("{} file(s) contain :doc: references", changed);
    }

    Ok(())
}
