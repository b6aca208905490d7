//! Finding and loading the proto-lint configuration.
//!
//! The first match wins:
//!
//! 1. the file passed with `--config` (or `PROTO_LINT_CONFIG`), which must exist
//! 2. `proto-lint.toml`, then `.proto-lint.toml`, in the project directory
//! 3. `config.toml` in `$PROTO_LINT_CONFIG_DIR`, else in `~/.proto-lint/`
//! 4. built-in defaults

use anyhow::{bail, Context, Result};
use proto_lint_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["proto-lint.toml", ".proto-lint.toml"];

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Named on the command line or in `PROTO_LINT_CONFIG`.
    Flag,
    /// Found in the project directory.
    Project,
    /// Found in the per-user config directory.
    Global,
    /// No file; built-in defaults.
    Builtin,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "--config",
            Self::Project => "project",
            Self::Global => "global",
            Self::Builtin => "built-in",
        })
    }
}

/// A configuration together with the file it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Parsed configuration.
    pub config: Config,
    /// Where it came from.
    pub origin: Origin,
    /// File it was read from; `None` for [`Origin::Builtin`].
    pub path: Option<PathBuf>,
}

/// Config lookup for one lint run.
#[derive(Debug, Clone)]
pub struct ConfigLookup<'a> {
    project_dir: &'a Path,
    explicit: Option<&'a Path>,
    global_dir: Option<PathBuf>,
}

impl<'a> ConfigLookup<'a> {
    /// Looks in `project_dir` and the user's global directory, unless
    /// `explicit` names a file.
    #[must_use]
    pub fn new(project_dir: &'a Path, explicit: Option<&'a Path>) -> Self {
        Self {
            project_dir,
            explicit,
            global_dir: global_config_dir(),
        }
    }

    #[cfg(test)]
    fn global_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.global_dir = dir;
        self
    }

    /// Files that are read when present, in priority order.
    fn candidates(&self) -> Vec<(Origin, PathBuf)> {
        let project = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| (Origin::Project, self.project_dir.join(name)));
        let global = self
            .global_dir
            .iter()
            .map(|dir| (Origin::Global, dir.join("config.toml")));
        project.chain(global).collect()
    }

    /// Reads the highest-priority configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or if the chosen
    /// file cannot be read or is not valid proto-lint TOML.
    pub fn load(&self) -> Result<LoadedConfig> {
        if let Some(path) = self.explicit {
            if !path.is_file() {
                bail!("Config file given with --config not found: {}", path.display());
            }
            return read(Origin::Flag, path);
        }

        for (origin, path) in self.candidates() {
            if path.is_file() {
                return read(origin, &path);
            }
        }

        tracing::debug!("No config file found, using built-in defaults");
        Ok(LoadedConfig {
            config: Config::default(),
            origin: Origin::Builtin,
            path: None,
        })
    }
}

fn read(origin: Origin, path: &Path) -> Result<LoadedConfig> {
    let config = Config::from_file(path)
        .with_context(|| format!("Failed to load {origin} config {}", path.display()))?;
    if origin == Origin::Global {
        tracing::info!("Using global config: {}", path.display());
    } else {
        tracing::debug!("Using {} config: {}", origin, path.display());
    }
    Ok(LoadedConfig {
        config,
        origin,
        path: Some(path.to_path_buf()),
    })
}

/// `$PROTO_LINT_CONFIG_DIR`, else `~/.proto-lint/`.
fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os("PROTO_LINT_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|h| h.join(".proto-lint")),
    }
}
