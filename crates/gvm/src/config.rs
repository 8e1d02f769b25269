use camino::{Utf8Path, Utf8PathBuf};
use gvm_platform::{HostPlatform, UnsupportedPlatformError};
use url::Url;

use crate::shell::Shell;
use crate::store::VersionStore;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Could not find your home directory")]
    #[diagnostic(help("Set GVM_ROOT_DIR or --root-dir to an absolute path"))]
    NoHomeDir,
    #[error("The gvm root directory must be an absolute path, got {path}")]
    RelativeRootDir { path: Utf8PathBuf },
}

type Result<T> = miette::Result<T, Error>;

/// Everything gvm needs to know about its surroundings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory, `~/.gvm` unless overridden.
    pub root: Utf8PathBuf,
    /// Only installs need a supported platform, so detection failures are kept
    /// until something asks for it.
    pub platform: std::result::Result<HostPlatform, UnsupportedPlatformError>,
    /// Replaces each language's default download location.
    pub download_url: Option<Url>,
    /// `PATH` as gvm was started with.
    pub path_env: Option<String>,
    /// `SHELL` as gvm was started with.
    pub shell_env: Option<String>,
}

impl Config {
    pub fn new(root_dir: Option<Utf8PathBuf>, download_url: Option<Url>) -> Result<Self> {
        let root = match root_dir {
            Some(path) if path.is_absolute() => path,
            Some(path) => return Err(Error::RelativeRootDir { path }),
            None => gvm_dirs::user_gvm_dir().ok_or(Error::NoHomeDir)?,
        };

        let platform = HostPlatform::current();
        match &platform {
            Ok(platform) => tracing::debug!("Using root {root} on {}", platform.target_triple()),
            Err(err) => tracing::debug!("Using root {root}: {err}"),
        }

        Ok(Self {
            root,
            platform,
            download_url,
            path_env: std::env::var("PATH").ok(),
            shell_env: std::env::var("SHELL").ok(),
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn store(&self) -> VersionStore {
        VersionStore::new(&self.root)
    }

    /// The platform to download toolchains for.
    pub fn platform(&self) -> std::result::Result<HostPlatform, UnsupportedPlatformError> {
        self.platform.clone()
    }

    /// Whether gvm runs on Windows, even when it is not a platform gvm can install for.
    pub fn is_windows(&self) -> bool {
        match &self.platform {
            Ok(platform) => platform.is_windows(),
            Err(err) => err.platform.contains("windows"),
        }
    }

    /// Separator between entries of the host's `PATH`.
    pub fn path_separator(&self) -> char {
        match &self.platform {
            Ok(platform) => platform.path_separator(),
            Err(_) if self.is_windows() => ';',
            Err(_) => ':',
        }
    }

    /// The shell to render for when none was requested explicitly.
    pub fn default_shell(&self) -> Shell {
        Shell::detect(self.is_windows(), self.shell_env.as_deref())
    }
}

#[cfg(test)]
pub(crate) fn test_config(root: &Utf8Path) -> Config {
    Config {
        root: root.to_owned(),
        platform: Ok(HostPlatform::LinuxX86_64),
        download_url: None,
        path_env: Some("/usr/local/bin:/usr/bin".to_owned()),
        shell_env: Some("/bin/bash".to_owned()),
    }
}
