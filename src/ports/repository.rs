//! Repository port for archive checkpoint persistence.
//!
//! This module defines the trait boundary between the domain and
//! infrastructure layers for checkpoint storage and retrieval. The archive
//! is the only component requiring persistence.

use std::path::Path;

use crate::{Result, archive::SavedArchive};

/// Port for persisting and loading archive checkpoints.
///
/// This trait abstracts the storage mechanism, allowing different
/// implementations (MessagePack files, in-memory test doubles, databases)
/// without coupling the domain logic to specific serialization formats.
///
/// # Examples
///
/// ```no_run
/// use morl::archive::SavedArchive;
/// use morl::ports::ArchiveRepository;
/// use std::path::Path;
///
/// fn checkpoint<R: ArchiveRepository>(
///     repo: &R,
///     saved: &SavedArchive,
///     path: &Path,
/// ) -> morl::Result<()> {
///     repo.save(saved, path)
/// }
/// ```
pub trait ArchiveRepository {
    /// Save a checkpoint to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization
    /// fails.
    fn save(&self, archive: &SavedArchive, path: &Path) -> Result<()>;

    /// Load a checkpoint from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or the
    /// format is invalid.
    fn load(&self, path: &Path) -> Result<SavedArchive>;
}
