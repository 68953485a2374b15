//! Golden tests for doclink
//!
//! These tests run the binary against the fixture documentation tree and
//! pin the exact results, so output format and reference detection stay
//! stable across versions.

use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get the path to the sample documentation tree
fn sample_docs() -> PathBuf {
    fixtures_dir().join("sample_docs")
}

/// Create a command for running the doclink binary
fn doclink_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("doclink"))
}

/// Parse JSONL output into a vector of JSON values
fn parse_jsonl(output: &str) -> Vec<Value> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str::<Value>(l).ok())
        .collect()
}

/// Copy a directory tree (fixtures must never be rewritten in place)
fn copy_tree(from: &Path, to: &Path) {
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Refs Tests ====================

    #[test]
    fn golden_refs_sample_docs() {
        let output = doclink_cmd()
            .arg("--root")
            .arg(sample_docs())
            .arg("refs")
            .output()
            .expect("failed to execute");
        assert!(output.status.success());

        let items = parse_jsonl(&String::from_utf8_lossy(&output.stdout));
        let expected = vec![
            json!({
                "kind": "reference",
                "path": "guide/setup.md",
                "range": {"start": 3, "end": 3},
                "excerpt": ":doc:`Home<../index.rst>`",
                "data": {"label": "Home", "target": "../index.rst", "link": "[Home](../index.rst)"},
                "source_mode": "scan",
                "meta": {"written": false}
            }),
            json!({
                "kind": "reference",
                "path": "index.rst",
                "range": {"start": 4, "end": 4},
                "excerpt": ":doc:`Installation<guide/install.md>`",
                "data": {
                    "label": "Installation",
                    "target": "guide/install.md",
                    "link": "[Installation](guide/install.md)"
                },
                "source_mode": "scan",
                "meta": {"written": false}
            }),
            json!({
                "kind": "reference",
                "path": "index.rst",
                "range": {"start": 5, "end": 5},
                "excerpt": ":doc:`the setup guide<guide/setup.md>`",
                "data": {
                    "label": "the setup guide",
                    "target": "guide/setup.md",
                    "link": "[the setup guide](guide/setup.md)"
                },
                "source_mode": "scan",
                "meta": {"written": false}
            }),
        ];
        assert_eq!(items, expected);
    }

    #[test]
    fn golden_refs_extension_filter() {
        let output = doclink_cmd()
            .arg("--root")
            .arg(sample_docs())
            .args(["refs", "--ext", "md"])
            .output()
            .expect("failed to execute");

        let items = parse_jsonl(&String::from_utf8_lossy(&output.stdout));
        let paths: Vec<_> = items.iter().filter_map(|i| i["path"].as_str()).collect();
        assert_eq!(paths, vec!["guide/setup.md"]);
    }

    #[test]
    fn golden_refs_markdown() {
        let output = doclink_cmd()
            .arg("--root")
            .arg(sample_docs())
            .args(["--format", "md", "refs", "--scope", "guide"])
            .output()
            .expect("failed to execute");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(
            stdout,
            "## References\n\n- `guide/setup.md`:3: `:doc:`Home<../index.rst>`` -> [Home](../index.rst)\n\n"
        );
    }

    // ==================== Apply Tests ====================

    #[test]
    fn golden_apply_dry_run() {
        let output = doclink_cmd()
            .arg("--root")
            .arg(sample_docs())
            .arg("apply")
            .output()
            .expect("failed to execute");
        assert!(output.status.success());

        let items = parse_jsonl(&String::from_utf8_lossy(&output.stdout));
        let summary: Vec<_> = items
            .iter()
            .map(|i| (i["path"].as_str().unwrap(), i["data"]["references"].as_u64().unwrap()))
            .collect();
        assert_eq!(summary, vec![("guide/setup.md", 1), ("index.rst", 2)]);
        assert!(items.iter().all(|i| i["meta"]["written"] == false));
    }

    #[test]
    fn golden_apply_write_output() {
        let temp = tempfile::tempdir().unwrap();
        copy_tree(&sample_docs(), temp.path());

        doclink_cmd()
            .arg("--root")
            .arg(temp.path())
            .args(["apply", "--write"])
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(temp.path().join("index.rst")).unwrap(),
            "Welcome\n=======\n\n\
Start with [Installation](guide/install.md) and then read\n\
[the setup guide](guide/setup.md).\n\n\
See also :ref:`glossary` and :doc:`Broken<missing-close`.\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("guide/setup.md")).unwrap(),
            "# Setup\n\nBack to [Home](../index.rst).\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("notes.cfg")).unwrap(),
            fs::read_to_string(sample_docs().join("notes.cfg")).unwrap()
        );
    }

    #[test]
    fn golden_rewrite_matches_apply() {
        let source = fs::read_to_string(sample_docs().join("index.rst")).unwrap();

        let output = doclink_cmd()
            .args(["rewrite", "--format", "raw"])
            .write_stdin(source.clone())
            .output()
            .expect("failed to execute");

        assert_eq!(
            String::from_utf8_lossy(&output.stdout),
            doclink::rewrite(&source)
        );
    }
}
