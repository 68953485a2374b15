//! doclink - rewrite documentation cross-references into links
//!
//! doclink provides:
//! - Rewriting of text from arguments or stdin
//! - Reference listing across a documentation tree
//! - In-place rewriting of a documentation tree
//! - Inline role rendering through an explicit role registry
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;

use doclink::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
