//! Output writing: atomic canonical file plus best-effort sibling copies.
//!
//! The canonical write goes through a temp file and rename in the destination
//! directory, so a crash or full disk never leaves a torn artifact behind.
//! Sibling copies are independent byte copies of the canonical file: each
//! consumer deployment gets an identical private snapshot, and one failed
//! copy logs a warning without aborting the run. A destination that resolves
//! to the canonical file itself is skipped, never overwritten.

use std::path::{Path, PathBuf};

use crate::envelope::KnowledgeBaseEnvelope;
use crate::error::WriteError;

/// Paths written by one run.
#[derive(Debug)]
pub struct WriteOutcome {
    pub canonical: PathBuf,
    /// Sibling destinations that were actually written.
    pub copies_written: Vec<PathBuf>,
}

/// Validate the envelope, write it to `canonical`, then copy to `copies`.
pub fn write_envelope(
    envelope: &KnowledgeBaseEnvelope,
    canonical: &Path,
    copies: &[PathBuf],
) -> Result<WriteOutcome, WriteError> {
    envelope.validate()?;

    let json = serde_json::to_string_pretty(envelope).map_err(|e| WriteError::Serialize {
        message: e.to_string(),
    })?;

    ensure_parent(canonical).map_err(|e| WriteError::Io { message: e })?;

    let tmp = canonical.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| WriteError::Io {
        message: format!("write {}: {e}", tmp.display()),
    })?;
    std::fs::rename(&tmp, canonical).map_err(|e| WriteError::Io {
        message: format!("rename {} -> {}: {e}", tmp.display(), canonical.display()),
    })?;

    tracing::info!(
        path = %canonical.display(),
        chunks = envelope.total_chunks,
        "knowledge base written"
    );

    // Copy destinations are compared against the resolved canonical path.
    // fs::copy truncates its destination before reading the source, so a
    // destination aliasing the canonical file would wipe the artifact just
    // written.
    let canonical_resolved = match canonical.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(
                path = %canonical.display(),
                error = %e,
                "cannot resolve canonical path, skipping sibling copies"
            );
            return Ok(WriteOutcome {
                canonical: canonical.to_path_buf(),
                copies_written: Vec::new(),
            });
        }
    };

    let mut copies_written = Vec::new();
    for copy in copies {
        if let Err(e) = ensure_parent(copy) {
            tracing::warn!(path = %copy.display(), error = %e, "skipping sibling copy");
            continue;
        }
        // Only an existing file can alias the canonical; a destination that
        // fails to resolve is a distinct, not-yet-created file.
        if copy.canonicalize().is_ok_and(|resolved| resolved == canonical_resolved) {
            tracing::warn!(path = %copy.display(), "copy destination is the canonical file, skipping");
            continue;
        }
        match std::fs::copy(canonical, copy) {
            Ok(_) => {
                tracing::info!(path = %copy.display(), "synced sibling copy");
                copies_written.push(copy.clone());
            }
            Err(e) => {
                tracing::warn!(path = %copy.display(), error = %e, "failed to write sibling copy");
            }
        }
    }

    Ok(WriteOutcome {
        canonical: canonical.to_path_buf(),
        copies_written,
    })
}

fn ensure_parent(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
