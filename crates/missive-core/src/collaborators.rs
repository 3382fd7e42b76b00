//! Side-effect seams used during composition.
//!
//! The composer touches the outside world only through these traits: a
//! temp-file store for decoded inline attachments, filesystem existence checks
//! and MIME type lookup. Local implementations are provided; tests swap in
//! fakes.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Temporary file storage for decoded attachment payloads.
pub trait Storage {
    /// Creates an empty, uniquely named temporary file and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    fn create_temp_file(&self, prefix: &str) -> io::Result<PathBuf>;

    /// Writes `bytes` to `path`, returning the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Filesystem queries.
pub trait FileSystem {
    /// Returns true if something exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// MIME type lookup.
pub trait MimeGuesser {
    /// Guesses a MIME type from a file name or path.
    fn guess_mime(&self, path: &Path) -> String;
}

/// Stores temporary files in a directory, the system temp dir by default.
///
/// Files are kept after creation; cleaning them up is the caller's concern.
#[derive(Debug, Clone)]
pub struct TempDirStorage {
    dir: PathBuf,
}

impl TempDirStorage {
    /// Stores files in `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory files are created in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for TempDirStorage {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl Storage for TempDirStorage {
    fn create_temp_file(&self, prefix: &str) -> io::Result<PathBuf> {
        let path = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(&self.dir)?
            .into_temp_path()
            .keep()
            .map_err(io::Error::from)?;
        debug!(path = %path.display(), "Created temporary file");
        Ok(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
        std::fs::write(path, bytes)?;
        Ok(path.to_path_buf())
    }
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Guesses MIME types from file extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionGuesser;

impl MimeGuesser for ExtensionGuesser {
    fn guess_mime(&self, path: &Path) -> String {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// The set of collaborators a composer works with.
pub struct Collaborators {
    /// Temp-file store.
    pub storage: Box<dyn Storage>,
    /// Filesystem queries.
    pub filesystem: Box<dyn FileSystem>,
    /// MIME lookup.
    pub mime: Box<dyn MimeGuesser>,
}

impl Collaborators {
    /// Replaces the storage.
    #[must_use]
    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    /// Replaces the filesystem.
    #[must_use]
    pub fn with_filesystem(mut self, filesystem: impl FileSystem + 'static) -> Self {
        self.filesystem = Box::new(filesystem);
        self
    }

    /// Replaces the MIME guesser.
    #[must_use]
    pub fn with_mime(mut self, mime: impl MimeGuesser + 'static) -> Self {
        self.mime = Box::new(mime);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            storage: Box::new(TempDirStorage::default()),
            filesystem: Box::new(LocalFileSystem),
            mime: Box::new(ExtensionGuesser),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
