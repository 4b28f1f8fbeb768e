//! Scratch file allocation and release

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use uuid::Uuid;

/// Suffix for scratch files handed to the PDF tools
pub const PDF_SUFFIX: &str = ".pdf";

/// Allocates scratch files under a single directory.
///
/// Cloning is cheap; clones share the in-use counter.
#[derive(Clone, Debug)]
pub struct ScratchWorkspace {
    inner: Arc<WorkspaceInner>,
}

#[derive(Debug)]
struct WorkspaceInner {
    dir: PathBuf,
    in_use: AtomicUsize,
}

impl ScratchWorkspace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(WorkspaceInner {
                dir: dir.into(),
                in_use: AtomicUsize::new(0),
            }),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Number of scratch files allocated but not yet released
    pub fn in_use(&self) -> usize {
        self.inner.in_use.load(Ordering::SeqCst)
    }

    /// Create an empty, uniquely named scratch file ending in `suffix`.
    pub async fn allocate(&self, suffix: &str) -> io::Result<ScratchFile> {
        let path = self.inner.dir.join(format!("{}{}", Uuid::new_v4(), suffix));

        tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        self.inner.in_use.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path = %path.display(), "Scratch file allocated");

        Ok(ScratchFile {
            path,
            pending: true,
            workspace: Arc::clone(&self.inner),
        })
    }
}

/// Handle to one allocated scratch file.
///
/// The file is deleted by [`ScratchFile::release`], or by `Drop` if the
/// handle goes away while still pending.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    pending: bool,
    workspace: Arc<WorkspaceInner>,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. Never fails; deletion errors are logged.
    ///
    /// If this future is dropped before the removal completes, `Drop`
    /// finishes the release synchronously.
    pub async fn release(mut self) {
        let result = tokio::fs::remove_file(&self.path).await;
        self.finish(result);
    }

    fn finish(&mut self, result: io::Result<()>) {
        if !self.pending {
            return;
        }
        self.pending = false;
        self.workspace.in_use.fetch_sub(1, Ordering::SeqCst);

        match result {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Scratch file released");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Scratch file already gone");
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove scratch file"
                );
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.pending {
            let result = std::fs::remove_file(&self.path);
            self.finish(result);
        }
    }
}
