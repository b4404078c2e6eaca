//! Input document loading.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("text file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read text file: {0}")]
    ReadError(#[from] std::io::Error),
}

/// Read a UTF-8 text file into memory
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String, DocumentError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), chars = text.chars().count(), "read input text");
    Ok(text)
}

/// First `max_chars` characters of `text`, cut on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
