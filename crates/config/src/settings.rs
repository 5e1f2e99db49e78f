use crate::error::{ErrorKind, Result};
use crate::pacman::DEFAULT_CONF_PATH;
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// karun's own settings (not pacman's).
///
/// Layered lowest to highest: built-in defaults, `karun.toml` in the user's
/// config directory, an explicitly requested TOML file, then `KARUN_*`
/// environment variables (`KARUN_WORKSPACE_ROOT=/var/tmp/karun`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// pacman.conf to read repositories and database paths from.
    pub pacman_conf: PathBuf,
    /// Parent directory for per-build extraction workspaces.
    pub workspace_root: PathBuf,
    /// Leave the extraction workspace on disk after a build.
    pub keep_workspace: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pacman_conf: PathBuf::from(DEFAULT_CONF_PATH),
            workspace_root: std::env::temp_dir().join("karun"),
            keep_workspace: false,
        }
    }
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "KARUN_";
    pub const FILE_NAME: &'static str = "karun.toml";

    /// Location of the per-user settings file, if the platform has one.
    pub fn user_file() -> Option<PathBuf> {
        ProjectDirs::from("", "", "karun").map(|dirs| dirs.config_dir().join(Self::FILE_NAME))
    }

    /// Loads settings from every layer. An `explicit` file must exist; the
    /// per-user file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_layers(Self::user_file(), explicit)
    }

    fn load_layers(user_file: Option<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user_file) = user_file {
            // Missing files are an empty layer to figment.
            figment = figment.merge(Toml::file(user_file));
        }
        if let Some(explicit) = explicit {
            if !explicit.is_file() {
                exn::bail!(ErrorKind::ConfigPath(explicit.to_path_buf()));
            }
            figment = figment.merge(Toml::file(explicit));
        }
        let settings: Self = figment.merge(Env::prefixed(Self::ENV_PREFIX)).extract().or_raise(|| ErrorKind::Settings)?;
        tracing::trace!(?settings, "Loaded settings");
        Ok(settings)
    }
}
