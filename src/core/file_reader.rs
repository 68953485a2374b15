//! Reading documentation files for rewriting
//!
//! Files that get rewritten in place must round-trip exactly, so there is no
//! lossy decoding and no truncation here: a file is either valid UTF-8 text
//! or it is skipped with a warning.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::model::{ItemError, ResultItem};
use crate::refs::pattern::into_text;

/// Default maximum file size in bytes (16 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Bytes inspected for NUL when sniffing binary content
const BINARY_SNIFF_LEN: usize = 8192;

/// Warning codes for file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCode {
    /// File could not be opened or read
    FileUnreadable,
    /// File exceeds the size limit
    FileSkippedSize,
    /// File is not valid UTF-8
    FileSkippedEncoding,
    /// File appears to be binary
    BinaryFile,
    /// File could not be written back
    FileWriteFailed,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::FileUnreadable => "FILE_UNREADABLE",
            WarningCode::FileSkippedSize => "FILE_SKIPPED_SIZE",
            WarningCode::FileSkippedEncoding => "FILE_SKIPPED_ENCODING",
            WarningCode::BinaryFile => "BINARY_FILE",
            WarningCode::FileWriteFailed => "FILE_WRITE_FAILED",
        }
    }
}

/// A structured warning about a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWarning {
    pub code: WarningCode,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FileWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Convert to a ResultItem (Kind::Error with warning info)
    pub fn to_result_item(&self) -> ResultItem {
        let item = ResultItem::error(ItemError::new(self.code.as_str(), &self.message));
        match &self.path {
            Some(path) => item.with_path(path.clone()),
            None => item,
        }
    }
}

/// Read a text file, or explain why it was skipped
pub fn read_text_file(path: &Path, max_file_size: u64) -> Result<String, FileWarning> {
    let metadata = fs::metadata(path).map_err(|e| {
        FileWarning::new(
            WarningCode::FileUnreadable,
            format!("Cannot read metadata: {}", e),
        )
    })?;

    if metadata.len() > max_file_size {
        return Err(FileWarning::new(
            WarningCode::FileSkippedSize,
            format!(
                "File exceeds size limit ({} > {} bytes)",
                metadata.len(),
                max_file_size
            ),
        ));
    }

    let bytes = fs::read(path).map_err(|e| {
        FileWarning::new(WarningCode::FileUnreadable, format!("Cannot read file: {}", e))
    })?;

    decode_text(bytes)
}

/// Decode file bytes, rejecting binary and non-UTF-8 content
pub fn decode_text(bytes: Vec<u8>) -> Result<String, FileWarning> {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(FileWarning::new(
            WarningCode::BinaryFile,
            "File appears to be binary (contains null bytes)",
        ));
    }

    into_text(bytes).map_err(|e| FileWarning::new(WarningCode::FileSkippedEncoding, e.to_string()))
}
