//! # Document Store
//!
//! Persists generated PDFs. Every save gets a unique, timestamped name so
//! two invoices generated on the same day never overwrite each other.
//!
//! ```text
//! save("AlbanManage_Invoice_2026-10-19", bytes)
//!      │
//!      ▼
//! <documents_dir>/AlbanManage_Invoice_2026-10-19 1792400000000.pdf
//! ```
//!
//! All paths handed back in are checked to resolve directly inside the
//! store directory before anything is read or removed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use alban_core::PDF_MIME_TYPE;

use crate::error::{StorageError, StorageResult};

const PDF_EXTENSION: &str = "pdf";

/// A document on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
    pub mime_type: &'static str,
}

/// Where generated documents go.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `bytes` as `"{base_name} {unix_millis}.pdf"`.
    async fn save(&self, base_name: &str, bytes: Vec<u8>) -> StorageResult<StoredDocument>;

    /// Stored PDFs, newest first.
    async fn list(&self) -> StorageResult<Vec<StoredDocument>>;

    /// Reads a stored document.
    async fn open(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Removes a stored document. Returns false when it was already gone.
    async fn delete(&self, path: &Path) -> StorageResult<bool>;
}

/// File-system document store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Opens the store, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        if !fs::try_exists(&root).await? {
            fs::create_dir_all(&root).await?;
        }
        let root = fs::canonicalize(&root).await?;

        info!(root = %root.display(), "Document store ready");
        Ok(FsDocumentStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` to a file directly inside the store directory.
    async fn contain(&self, path: &Path) -> StorageResult<PathBuf> {
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let outside = || StorageError::OutsideStore(candidate.clone());
        let file_name = candidate.file_name().ok_or_else(outside)?;
        let parent = candidate.parent().ok_or_else(outside)?;
        let parent = fs::canonicalize(parent).await.map_err(|_| outside())?;

        if parent != self.root {
            return Err(outside());
        }
        Ok(parent.join(file_name))
    }

    async fn describe(&self, path: PathBuf) -> StorageResult<StoredDocument> {
        let meta = fs::metadata(&path).await?;
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(StoredDocument {
            file_name,
            path,
            size_bytes: meta.len(),
            modified_at: DateTime::<Utc>::from(modified),
            mime_type: PDF_MIME_TYPE,
        })
    }
}

/// Replaces path separators; rejects names with nothing left.
fn sanitize_base_name(base_name: &str) -> StorageResult<String> {
    let cleaned: String = base_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(StorageError::InvalidName(base_name.to_string()));
    }
    Ok(cleaned)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
        .unwrap_or(false)
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn save(&self, base_name: &str, bytes: Vec<u8>) -> StorageResult<StoredDocument> {
        let base = sanitize_base_name(base_name)?;

        // Names carry the save time. The file is created exclusively, so a
        // concurrent save that wins the name makes this one bump it.
        let mut millis = Utc::now().timestamp_millis();
        let (path, mut file) = loop {
            let candidate = self.root.join(format!("{} {}.{}", base, millis, PDF_EXTENSION));
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(e.into()),
            }
        };

        if let Err(e) = write_fully(&mut file, &bytes).await {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial document");
            }
            return Err(e.into());
        }
        drop(file);

        info!(path = %path.display(), size = bytes.len(), "Document saved");

        self.describe(path).await
    }

    async fn list(&self) -> StorageResult<Vec<StoredDocument>> {
        let mut documents = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if !is_pdf(&path) || !entry.file_type().await?.is_file() {
                continue;
            }
            documents.push(self.describe(path).await?);
        }

        documents.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });

        debug!(count = documents.len(), "Listed stored documents");
        Ok(documents)
    }

    async fn open(&self, path: &Path) -> StorageResult<Vec<u8>> {
        let path = self.contain(path).await?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(path)),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &Path) -> StorageResult<bool> {
        let path = self.contain(path).await?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Document deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_fully(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}
