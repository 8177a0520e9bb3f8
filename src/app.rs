//! Dependency injection container for the MORL toolkit.
//!
//! This module provides centralized dependency management following
//! hexagonal architecture principles. The container owns infrastructure
//! dependencies (checkpoint repository, default seeding) and provides
//! factory methods for creating coordinators and archives.

use std::{path::Path, sync::Arc};

use crate::{
    Result,
    adapters::MsgPackRepository,
    archive::{CheckpointMetadata, PolicyArchive, SavedArchive},
    pipeline::{RunConfig, TrainingCoordinator},
    ports::ArchiveRepository,
};

/// Application with dependency injection.
///
/// Centralizes creation and wiring of dependencies. All infrastructure
/// dependencies are owned by the app and injected into domain objects.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use morl::app::App;
/// use morl::pipeline::RunConfig;
/// use morl::types::VectorReturn;
///
/// let app = App::new();
/// let config = RunConfig::new(VectorReturn::new(vec![0.0, 0.0])?).with_seed(42);
/// let coordinator = app.create_coordinator(config)?;
/// # Ok::<(), morl::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use morl::adapters::InMemoryRepository;
/// use morl::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for archive checkpoint persistence
    archive_repository: Arc<dyn ArchiveRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for checkpoint persistence
    /// - No default seed (non-deterministic weight sampling)
    pub fn new() -> Self {
        Self {
            archive_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing an app with custom dependencies.
    ///
    /// Primarily used for testing with in-memory dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the checkpoint repository.
    pub fn archive_repository(&self) -> Arc<dyn ArchiveRepository + Send + Sync> {
        Arc::clone(&self.archive_repository)
    }

    /// Create a coordinator with an empty archive.
    ///
    /// The app's default seed applies when the configuration does not carry
    /// one of its own.
    pub fn create_coordinator(&self, mut config: RunConfig) -> Result<TrainingCoordinator> {
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        TrainingCoordinator::new(config)
    }

    /// Create a coordinator resuming from a checkpoint on disk.
    pub fn resume_coordinator(
        &self,
        mut config: RunConfig,
        path: &Path,
    ) -> Result<TrainingCoordinator> {
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        let archive = self.load_archive(path)?;
        TrainingCoordinator::from_archive(config, archive)
    }

    /// Checkpoint an archive through the configured repository.
    pub fn save_archive(
        &self,
        archive: &PolicyArchive,
        metadata: CheckpointMetadata,
        path: &Path,
    ) -> Result<()> {
        let saved = SavedArchive::from_archive(archive, metadata);
        self.archive_repository.save(&saved, path)
    }

    /// Load an archive from a checkpoint through the configured repository.
    pub fn load_archive(&self, path: &Path) -> Result<PolicyArchive> {
        let saved = self.archive_repository.load(path)?;
        saved
            .to_archive()
            .map_err(|e| crate::Error::SerializationContext {
                operation: "restore archive from checkpoint".to_string(),
                message: e.to_string(),
            })
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing an app with custom dependencies.
pub struct AppBuilder {
    archive_repository: Option<Arc<dyn ArchiveRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            archive_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom checkpoint repository.
    pub fn with_repository<R: ArchiveRepository + Send + Sync + 'static>(
        mut self,
        repo: R,
    ) -> Self {
        self.archive_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all coordinators created by this app.
    ///
    /// Useful for creating deterministic tests.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            archive_repository: self
                .archive_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
