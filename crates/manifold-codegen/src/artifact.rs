//! Generated artifacts and atomic writes.
//!
//! Artifact paths are deterministic (`<language>/<file>` under the output
//! root) and regeneration from unchanged IR produces byte-identical text,
//! so CI can detect drift with a plain `git diff`. Each file is written to
//! a temp file in its target directory and renamed into place; an
//! interrupted run never leaves a half-written artifact.

use std::io::Write;
use std::path::{Path, PathBuf};

/// What a generated file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    ClientSource,
    TypeDeclarations,
    TestScaffold,
}

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Language id, also the output subdirectory.
    pub language: String,
    pub kind: ArtifactKind,
    /// Path relative to the output root.
    pub path: PathBuf,
    pub text: String,
}

impl GeneratedArtifact {
    pub fn new(
        language: impl Into<String>,
        kind: ArtifactKind,
        file: &str,
        text: String,
    ) -> Self {
        let language = language.into();
        let path = Path::new(&language).join(file);
        Self { language, kind, path, text }
    }
}

/// Failure writing an artifact to disk.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", .path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Write all artifacts under `root`. Writes are independent per path, so a
/// failure for one artifact cannot corrupt another.
pub fn write_artifacts(root: &Path, artifacts: &[GeneratedArtifact]) -> Result<(), WriteError> {
    for artifact in artifacts {
        let target = root.join(&artifact.path);
        write_atomic(&target, &artifact.text)
            .map_err(|e| WriteError { path: target.clone(), source: e })?;
    }
    Ok(())
}

fn write_atomic(path: &Path, text: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_keyed_by_language_and_file() {
        let artifact = GeneratedArtifact::new(
            "go",
            ArtifactKind::ClientSource,
            "client.go",
            "package x\n".into(),
        );
        assert_eq!(artifact.path, PathBuf::from("go/client.go"));
    }

    #[test]
    fn atomic_write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = vec![GeneratedArtifact::new(
            "python",
            ArtifactKind::ClientSource,
            "client.py",
            "print('v1')\n".into(),
        )];
        write_artifacts(dir.path(), &artifacts).unwrap();

        let rewritten = vec![GeneratedArtifact::new(
            "python",
            ArtifactKind::ClientSource,
            "client.py",
            "print('v2')\n".into(),
        )];
        write_artifacts(dir.path(), &rewritten).unwrap();

        let text = std::fs::read_to_string(dir.path().join("python/client.py")).unwrap();
        assert_eq!(text, "print('v2')\n");
        // No stray temp files left behind.
        let extra: Vec<_> = std::fs::read_dir(dir.path().join("python"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(extra.len(), 1);
    }
}
