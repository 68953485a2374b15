//! Common utilities

use anyhow::{Context, Result};
use std::io::Read;
use xxhash_rust::xxh3::xxh3_64;

use crate::refs::pattern::into_text;

/// Compute the XXH3 hash of bytes as 16 hex digits
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}

/// Use `text` if given, otherwise read all of stdin
pub fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read stdin")?;
            let text = into_text(buffer).context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
