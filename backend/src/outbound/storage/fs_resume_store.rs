//! Filesystem-backed `ResumeStore`.
//!
//! Uploads are written under one capability-scoped directory as
//! `<uuid>.<ext>`; the file name is the [`ResumeRef`]. The client's file name
//! only contributes the extension, which must be on the allowlist.

use std::io::{self, Write};
use std::path::{Component, Path};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ResumeRef;
use crate::domain::ports::{ResumeStore, ResumeStoreError, ResumeUpload};

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "odt", "rtf", "txt"];
const DEFAULT_EXTENSION: &str = "pdf";

/// Stores resumes as files in a single directory.
#[derive(Clone)]
pub struct FsResumeStore {
    dir: Arc<Dir>,
}

impl FsResumeStore {
    /// Open `root`, creating it when missing.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

fn extension_for(file_name: Option<&str>) -> Result<String, ResumeStoreError> {
    let Some(name) = file_name else {
        return Ok(DEFAULT_EXTENSION.to_owned());
    };
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ResumeStoreError::rejected("file name has no extension"))?;
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(ResumeStoreError::rejected(format!(
            "unsupported file type .{extension}; expected one of {}",
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}

/// A reference must name a single file directly inside the store.
fn stored_name(resume: &ResumeRef) -> Option<&str> {
    let raw = resume.as_ref();
    let mut components = Path::new(raw).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(raw),
        _ => None,
    }
}

fn write_new(dir: &Dir, name: &str, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(name, &options)?;
    let written = file.write_all(bytes).and_then(|()| file.sync_all());
    if written.is_err() {
        drop(file);
        drop(dir.remove_file(name));
    }
    written
}

fn io_error(err: impl std::fmt::Display) -> ResumeStoreError {
    ResumeStoreError::io(err.to_string())
}

#[async_trait]
impl ResumeStore for FsResumeStore {
    async fn store(&self, upload: ResumeUpload) -> Result<ResumeRef, ResumeStoreError> {
        if upload.bytes.is_empty() {
            return Err(ResumeStoreError::rejected("resume is empty"));
        }
        let extension = extension_for(upload.file_name.as_deref())?;
        let name = format!("{}.{extension}", Uuid::new_v4());
        let resume = ResumeRef::new(&name).map_err(io_error)?;

        let dir = Arc::clone(&self.dir);
        let size = upload.bytes.len();
        tokio::task::spawn_blocking(move || write_new(&dir, &name, &upload.bytes))
            .await
            .map_err(io_error)?
            .map_err(io_error)?;
        debug!(resume = %resume.as_ref(), size, "resume stored");
        Ok(resume)
    }

    async fn discard(&self, resume: &ResumeRef) -> Result<(), ResumeStoreError> {
        let Some(name) = stored_name(resume).map(str::to_owned) else {
            warn!(resume = %resume.as_ref(), "refusing to discard resume outside the store");
            return Err(ResumeStoreError::rejected("resume reference is not a stored file"));
        };
        let dir = Arc::clone(&self.dir);
        let removed = tokio::task::spawn_blocking(move || dir.remove_file(&name))
            .await
            .map_err(io_error)?;
        match removed {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(err)),
        }
    }
}
