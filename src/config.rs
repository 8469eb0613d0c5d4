//! # Project Configuration
//!
//! Every component is constructed from a [`ProjectConfig`]: the project root,
//! the artifact directory layout, the external executables and the health
//! endpoint. Nothing here is global.
//!
//! ## Resolution order
//!
//! 1. Defaults derived from the project root
//! 2. `protosmith.toml` at the project root, or an explicit `--config` path
//! 3. Environment overrides
//!
//! ## Environment Variables
//!
//! - `PROTOSMITH_ROOT` - project root (default: current directory)
//! - `PROTOSMITH_CODEGEN` - codegen executable (default: `<root>/gen_service.sh`)
//! - `PROTOSMITH_BUILD_TOOL` - build tool program (default: `make`)
//! - `PROTOSMITH_HEALTH_URL` - liveness endpoint (default: `http://localhost:8080/health`)
//!
//! ## Example `protosmith.toml`
//!
//! ```toml
//! codegen = "scripts/gen_service.sh"
//! health_url = "http://localhost:9090/health"
//! strict_types = true
//!
//! [layout]
//! proto_dir = "api/proto"
//! source_extension = "go"
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

/// File name looked up at the project root when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "protosmith.toml";

const DEFAULT_HEALTH_URL: &str = "http://localhost:8080/health";

/// Where each artifact class lives, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub proto_dir: PathBuf,
    pub services_dir: PathBuf,
    pub models_dir: PathBuf,
    pub bindings_dir: PathBuf,
    /// Extension of protocol definitions, without the dot
    pub proto_extension: String,
    /// Extension of stubs, models and generated bindings, without the dot
    pub source_extension: String,
    /// Protocol stems that belong to infrastructure, never listed as services
    pub reserved: Vec<String>,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        ArtifactLayout {
            proto_dir: PathBuf::from("proto"),
            services_dir: PathBuf::from("services"),
            models_dir: PathBuf::from("models"),
            bindings_dir: PathBuf::from("pb"),
            proto_extension: "proto".to_string(),
            source_extension: "go".to_string(),
            reserved: vec!["health".to_string()],
        }
    }
}

/// Everything a component needs to know about the project it manages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub project_root: PathBuf,
    pub layout: ArtifactLayout,
    /// Codegen executable (create / remove / add-rpc modes)
    pub codegen: PathBuf,
    /// Build tool program and its fixed regeneration target
    pub build_tool: PathBuf,
    pub build_target: String,
    pub health_url: String,
    /// Validate message-type references against existing services
    pub strict_types: bool,
}

impl ProjectConfig {
    /// Defaults for a project rooted at `root`
    ///
    /// A relative root is made absolute against the current directory, since
    /// external tools run with the root as their working directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let project_root = std::path::absolute(&root).unwrap_or(root);
        ProjectConfig {
            codegen: project_root.join("gen_service.sh"),
            project_root,
            layout: ArtifactLayout::default(),
            build_tool: PathBuf::from("make"),
            build_target: "proto".to_string(),
            health_url: DEFAULT_HEALTH_URL.to_string(),
            strict_types: false,
        }
    }

    /// Absolute protocol-definition directory
    #[must_use]
    pub fn proto_dir(&self) -> PathBuf {
        self.project_root.join(&self.layout.proto_dir)
    }

    #[must_use]
    pub fn services_dir(&self) -> PathBuf {
        self.project_root.join(&self.layout.services_dir)
    }

    #[must_use]
    pub fn models_dir(&self) -> PathBuf {
        self.project_root.join(&self.layout.models_dir)
    }

    #[must_use]
    pub fn bindings_dir(&self) -> PathBuf {
        self.project_root.join(&self.layout.bindings_dir)
    }

    /// Apply a parsed config file on top of the current values
    ///
    /// Relative paths in the file are resolved against the project root.
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(codegen) = file.codegen {
            self.codegen = self.project_root.join(codegen);
        }
        if let Some(tool) = file.build_tool {
            self.build_tool = tool;
        }
        if let Some(target) = file.build_target {
            self.build_target = target;
        }
        if let Some(url) = file.health_url {
            self.health_url = url;
        }
        if let Some(strict) = file.strict_types {
            self.strict_types = strict;
        }
        let layout = file.layout;
        let l = &mut self.layout;
        if let Some(v) = layout.proto_dir {
            l.proto_dir = v;
        }
        if let Some(v) = layout.services_dir {
            l.services_dir = v;
        }
        if let Some(v) = layout.models_dir {
            l.models_dir = v;
        }
        if let Some(v) = layout.bindings_dir {
            l.bindings_dir = v;
        }
        if let Some(v) = layout.proto_extension {
            l.proto_extension = v;
        }
        if let Some(v) = layout.source_extension {
            l.source_extension = v;
        }
        if let Some(v) = layout.reserved {
            l.reserved = v;
        }
    }

    /// Apply `PROTOSMITH_*` overrides (other than the root)
    pub fn apply_env(&mut self) {
        if let Ok(codegen) = env::var("PROTOSMITH_CODEGEN") {
            self.codegen = self.project_root.join(codegen);
        }
        if let Ok(tool) = env::var("PROTOSMITH_BUILD_TOOL") {
            self.build_tool = PathBuf::from(tool);
        }
        if let Ok(url) = env::var("PROTOSMITH_HEALTH_URL") {
            self.health_url = url;
        }
    }

    /// Check values that would otherwise only fail at first use
    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.health_url)
            .with_context(|| format!("Invalid health URL: {}", self.health_url))?;
        Ok(())
    }

    /// Full resolution: root, optional file, environment
    ///
    /// `root` falls back to `PROTOSMITH_ROOT`, then the current directory.
    /// An explicit `config_path` must exist; the default file is optional.
    pub fn resolve(root: Option<&Path>, config_path: Option<&Path>) -> anyhow::Result<Self> {
        let root = match root {
            Some(r) => r.to_path_buf(),
            None => match env::var("PROTOSMITH_ROOT") {
                Ok(r) => PathBuf::from(r),
                Err(_) => env::current_dir().context("Failed to read current directory")?,
            },
        };
        let mut config = ProjectConfig::new(root);

        let file = match config_path {
            Some(path) => Some(
                load_config_file(path)?
                    .with_context(|| format!("Config file not found: {}", path.display()))?,
            ),
            None => load_config_file(&config.project_root.join(CONFIG_FILE_NAME))?,
        };
        if let Some(file) = file {
            config.apply_file(file);
        }
        config.apply_env();
        config.validate()?;
        Ok(config)
    }
}

/// On-disk shape of `protosmith.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub codegen: Option<PathBuf>,
    pub build_tool: Option<PathBuf>,
    pub build_target: Option<String>,
    pub health_url: Option<String>,
    pub strict_types: Option<bool>,
    #[serde(default)]
    pub layout: LayoutFile,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LayoutFile {
    pub proto_dir: Option<PathBuf>,
    pub services_dir: Option<PathBuf>,
    pub models_dir: Option<PathBuf>,
    pub bindings_dir: Option<PathBuf>,
    pub proto_extension: Option<String>,
    pub source_extension: Option<String>,
    pub reserved: Option<Vec<String>>,
}

/// Load a config file
///
/// Returns `Ok(None)` if the file doesn't exist (not an error), `Err` if it
/// exists but can't be read or parsed.
pub fn load_config_file(path: &Path) -> anyhow::Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_follow_root() {
        let config = ProjectConfig::new("/srv/app");
        assert_eq!(config.proto_dir(), PathBuf::from("/srv/app/proto"));
        assert_eq!(config.services_dir(), PathBuf::from("/srv/app/services"));
        assert_eq!(config.models_dir(), PathBuf::from("/srv/app/models"));
        assert_eq!(config.bindings_dir(), PathBuf::from("/srv/app/pb"));
        assert_eq!(config.codegen, PathBuf::from("/srv/app/gen_service.sh"));
        assert_eq!(config.build_tool, PathBuf::from("make"));
        assert_eq!(config.build_target, "proto");
        assert_eq!(config.layout.reserved, vec!["health".to_string()]);
        assert!(!config.strict_types);
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let config = ProjectConfig::new("proj");
        let cwd = env::current_dir().unwrap();
        assert!(config.project_root.is_absolute());
        assert_eq!(config.project_root, cwd.join("proj"));
        assert_eq!(config.codegen, cwd.join("proj/gen_service.sh"));
        assert_eq!(config.proto_dir(), cwd.join("proj/proto"));
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_file(&dir.path().join(CONFIG_FILE_NAME))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
codegen = "scripts/gen.sh"
health_url = "http://127.0.0.1:9999/health"
strict_types = true

[layout]
proto_dir = "api"
reserved = ["health", "admin"]
"#,
        )
        .unwrap();

        let config = ProjectConfig::resolve(Some(dir.path()), None).unwrap();
        assert_eq!(config.codegen, dir.path().join("scripts/gen.sh"));
        assert_eq!(config.health_url, "http://127.0.0.1:9999/health");
        assert!(config.strict_types);
        assert_eq!(config.proto_dir(), dir.path().join("api"));
        assert_eq!(config.models_dir(), dir.path().join("models"));
        assert_eq!(config.layout.reserved.len(), 2);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "unknown_key = 1\n").unwrap();
        assert!(ProjectConfig::resolve(Some(dir.path()), Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(ProjectConfig::resolve(Some(dir.path()), Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_health_url_rejected() {
        let mut config = ProjectConfig::new("/tmp");
        config.health_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
