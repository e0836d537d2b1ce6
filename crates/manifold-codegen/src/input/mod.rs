//! Schema loading: documents in, validated IR out.
//!
//! Sources are JSON documents composed with the merge operator in
//! [`crate::merge`], then parsed and validated in one pass. Validation is
//! pure; nothing downstream runs until the whole IR is known good, and a
//! [`SchemaError`] always carries the exact field path that failed.

mod document;

pub use document::load_ir;

use std::path::{Path, PathBuf};

/// A malformed or inconsistent schema. Unrecoverable: the run aborts before
/// any per-language work starts.
#[derive(Debug, Clone, thiserror::Error)]
#[error("schema error at {path}: expected {expected}, got {actual}")]
pub struct SchemaError {
    /// Exact field path, e.g. `endpoints.checkWallet.response.exists`.
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl SchemaError {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Failure reading or parsing a schema document from disk.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read schema documents from files and/or directories.
///
/// A directory contributes its `*.json` files in filename order, which is
/// also the merge order; numbering files (`00-defaults.json`,
/// `20-endpoints.json`) makes layering explicit.
pub fn read_documents(sources: &[PathBuf]) -> Result<Vec<serde_json::Value>, DocumentError> {
    let mut files = Vec::new();
    for source in sources {
        if source.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(source)
                .map_err(|e| DocumentError::Io { path: source.clone(), source: e })?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(source.clone());
        }
    }

    let mut documents = Vec::with_capacity(files.len());
    for file in &files {
        documents.push(read_one(file)?);
    }
    Ok(documents)
}

fn read_one(path: &Path) -> Result<serde_json::Value, DocumentError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DocumentError::Io { path: path.to_path_buf(), source: e })?;
    serde_json::from_str(&text)
        .map_err(|e| DocumentError::Parse { path: path.to_path_buf(), source: e })
}
