//! # Artifact Inventory
//!
//! Read-only view of which generated artifacts exist on disk. Every call
//! re-reads the filesystem: the codegen tool is the only writer, so nothing
//! is cached between calls.
//!
//! All three artifact classes share a stem derived from the service name:
//!
//! ```text
//! proto/widget.proto      (protocol definition)
//! services/widget.go      (service stub)
//! models/widget.go        (model)
//! ```

use crate::config::ProjectConfig;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;


/// The classes of files the inventory knows how to count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactClass {
    Protocol,
    ServiceStub,
    Model,
    /// Build-generated bindings; counted, never inspected individually
    Binding,
}

/// Artifacts present for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSet {
    /// Service name as requested, or the file stem when listing
    pub name: String,
    pub stem: String,
    pub protocol_path: PathBuf,
    pub service_path: PathBuf,
    pub model_path: PathBuf,
    pub has_protocol: bool,
    pub has_service: bool,
    pub has_model: bool,
}

impl ArtifactSet {
    /// All three artifacts present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.has_protocol && self.has_service && self.has_model
    }

    /// No artifact present at all
    #[must_use]
    pub fn is_absent(&self) -> bool {
        !(self.has_protocol || self.has_service || self.has_model)
    }
}

/// Result of [`ArtifactInventory::list_services`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryListing {
    pub services: Vec<ArtifactSet>,
    /// `false` when the protocol directory hasn't been created yet
    pub protocol_dir_present: bool,
}

/// File stem shared by a service's artifacts
#[must_use]
pub fn artifact_stem(service_name: &str) -> String {
    service_name.to_ascii_lowercase()
}

/// Filesystem-backed artifact inventory
#[derive(Debug, Clone)]
pub struct ArtifactInventory {
    config: ProjectConfig,
}

impl ArtifactInventory {
    #[must_use]
    pub fn new(config: &ProjectConfig) -> Self {
        ArtifactInventory {
            config: config.clone(),
        }
    }

    /// Every non-reserved protocol definition, sorted by stem
    ///
    /// Each set's `name` is the file stem, which is lower-cased. It will not
    /// match the spelling passed to [`exists`](Self::exists), so compare
    /// `stem` fields instead.
    #[must_use]
    pub fn list_services(&self) -> InventoryListing {
        let proto_dir = self.config.proto_dir();
        let Some(mut stems) = stems_with_extension(&proto_dir, &self.config.layout.proto_extension)
        else {
            debug!(dir = %proto_dir.display(), "protocol directory not present");
            return InventoryListing {
                services: Vec::new(),
                protocol_dir_present: false,
            };
        };

        stems.retain(|stem| !self.config.layout.reserved.iter().any(|r| r == stem));
        stems.sort();

        InventoryListing {
            services: stems
                .into_iter()
                .map(|stem| self.probe(stem.clone(), stem))
                .collect(),
            protocol_dir_present: true,
        }
    }

    /// Artifact set for a single service name
    ///
    /// `name` keeps the caller's spelling; `stem` is the lower-cased form
    /// used for the files.
    #[must_use]
    pub fn exists(&self, service_name: &str) -> ArtifactSet {
        self.probe(service_name.to_string(), artifact_stem(service_name))
    }

    /// Number of files of one class; a missing directory counts as zero
    #[must_use]
    pub fn count(&self, class: ArtifactClass) -> usize {
        let layout = &self.config.layout;
        let (dir, ext) = match class {
            ArtifactClass::Protocol => (self.config.proto_dir(), &layout.proto_extension),
            ArtifactClass::ServiceStub => (self.config.services_dir(), &layout.source_extension),
            ArtifactClass::Model => (self.config.models_dir(), &layout.source_extension),
            ArtifactClass::Binding => (self.config.bindings_dir(), &layout.source_extension),
        };
        stems_with_extension(&dir, ext).map_or(0, |s| s.len())
    }

    fn probe(&self, name: String, stem: String) -> ArtifactSet {
        let layout = &self.config.layout;
        let protocol_path = self
            .config
            .proto_dir()
            .join(format!("{stem}.{}", layout.proto_extension));
        let service_path = self
            .config
            .services_dir()
            .join(format!("{stem}.{}", layout.source_extension));
        let model_path = self
            .config
            .models_dir()
            .join(format!("{stem}.{}", layout.source_extension));

        ArtifactSet {
            has_protocol: protocol_path.is_file(),
            has_service: service_path.is_file(),
            has_model: model_path.is_file(),
            name,
            stem,
            protocol_path,
            service_path,
            model_path,
        }
    }
}

/// Stems of regular files in `dir` with the given extension
///
/// `None` if the directory can't be read.
fn stems_with_extension(dir: &Path, extension: &str) -> Option<Vec<String>> {
    let entries = fs::read_dir(dir).ok()?;
    Some(
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|e| e == extension))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .collect(),
    )
}
