//! # Status Reporter
//!
//! Advisory snapshot of a project: how many artifacts of each class exist and
//! whether a running instance answers its health endpoint. The probe and the
//! counts are independent reads and are not consistent with each other.

use crate::config::ProjectConfig;
use crate::inventory::{ArtifactClass, ArtifactInventory};
use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Upper bound for the liveness probe; not configurable per call
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of the liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    /// Health endpoint answered 200
    Running,
    /// Health endpoint answered with any other status
    Error,
    /// Connection failed or timed out
    Unreachable,
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Liveness::Running => write!(f, "running"),
            Liveness::Error => write!(f, "error"),
            Liveness::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Point-in-time project status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSnapshot {
    pub protocol_count: usize,
    pub service_stub_count: usize,
    pub model_count: usize,
    pub generated_binding_count: usize,
    pub server_liveness: Liveness,
    pub project_root: PathBuf,
}

/// Builds [`ProjectSnapshot`]s for one project
#[derive(Debug, Clone)]
pub struct StatusReporter {
    inventory: ArtifactInventory,
    health_url: String,
    project_root: PathBuf,
}

impl StatusReporter {
    #[must_use]
    pub fn new(config: &ProjectConfig) -> Self {
        StatusReporter {
            inventory: ArtifactInventory::new(config),
            health_url: config.health_url.clone(),
            project_root: config.project_root.clone(),
        }
    }

    /// Probe and count concurrently, then assemble the snapshot
    #[must_use]
    pub fn snapshot(&self) -> ProjectSnapshot {
        thread::scope(|scope| {
            let probe = scope.spawn(|| probe_liveness(&self.health_url));

            let protocol_count = self.inventory.count(ArtifactClass::Protocol);
            let service_stub_count = self.inventory.count(ArtifactClass::ServiceStub);
            let model_count = self.inventory.count(ArtifactClass::Model);
            let generated_binding_count = self.inventory.count(ArtifactClass::Binding);

            // panicked probe counts as unreachable
            let server_liveness = probe.join().unwrap_or(Liveness::Unreachable);

            ProjectSnapshot {
                protocol_count,
                service_stub_count,
                model_count,
                generated_binding_count,
                server_liveness,
                project_root: self.project_root.clone(),
            }
        })
    }
}

/// `GET url` with a [`PROBE_TIMEOUT`] bound, classified into a [`Liveness`]
#[must_use]
pub fn probe_liveness(url: &str) -> Liveness {
    let client = match reqwest::blocking::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "failed to build probe client");
            return Liveness::Unreachable;
        }
    };

    match client.get(url).send() {
        Ok(resp) if resp.status() == StatusCode::OK => Liveness::Running,
        Ok(resp) => {
            debug!(url, status = %resp.status(), "health endpoint returned non-200");
            Liveness::Error
        }
        Err(e) => {
            debug!(url, error = %e, "health endpoint unreachable");
            Liveness::Unreachable
        }
    }
}
