//! MessagePack implementation of the archive repository.
//!
//! This adapter implements the ArchiveRepository port using rmp_serde for
//! compact binary serialization.

use std::{fs::File, path::Path};

use crate::{Result, archive::SavedArchive, error::Error, ports::ArchiveRepository};

/// MessagePack-based archive repository.
///
/// Provides persistent checkpoint storage using the MessagePack binary
/// format via rmp_serde. This format offers good compression and fast
/// serialization/deserialization.
///
/// # Examples
///
/// ```no_run
/// use morl::adapters::MsgPackRepository;
/// use morl::archive::{ArchiveConfig, CheckpointMetadata, PolicyArchive, SavedArchive};
/// use morl::ports::ArchiveRepository;
/// use morl::types::VectorReturn;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let config = ArchiveConfig::new(10, VectorReturn::new(vec![0.0, 0.0])?);
/// let archive = PolicyArchive::new(config)?;
/// let saved = SavedArchive::from_archive(&archive, CheckpointMetadata::default());
///
/// repo.save(&saved, Path::new("run.msgpack"))?;
/// let loaded = repo.load(Path::new("run.msgpack"))?;
/// # Ok::<(), morl::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveRepository for MsgPackRepository {
    fn save(&self, archive: &SavedArchive, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        rmp_serde::encode::write(&mut file, archive).map_err(|e| Error::SerializationContext {
            operation: "serialize archive checkpoint to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedArchive> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let archive =
            rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
                operation: "deserialize archive checkpoint from MessagePack".to_string(),
                message: e.to_string(),
            })?;

        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        archive::{ArchiveConfig, CheckpointMetadata, PolicyArchive},
        identifiers::PolicyId,
        types::VectorReturn,
    };

    fn saved_archive() -> SavedArchive {
        let config = ArchiveConfig::new(3, VectorReturn::new(vec![0.0, 0.0]).unwrap());
        let mut archive = PolicyArchive::new(config).unwrap();
        archive
            .submit(PolicyId::new("p0"), VectorReturn::new(vec![3.0, 1.0]).unwrap())
            .unwrap();
        archive
            .submit(PolicyId::new("p1"), VectorReturn::new(vec![1.0, 3.0]).unwrap())
            .unwrap();
        SavedArchive::from_archive(&archive, CheckpointMetadata::default())
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test_archive.msgpack");

        let repo = MsgPackRepository::new();
        let saved = saved_archive();

        repo.save(&saved, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded.entries, saved.entries);
        assert_eq!(loaded.capacity, saved.capacity);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.load(Path::new("/tmp/nonexistent_12345.msgpack"));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.save(&saved_archive(), Path::new("/invalid_dir_12345/file.msgpack"));
        assert!(result.is_err());
    }
}
