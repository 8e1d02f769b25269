use std::cmp::Ordering;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use fs_err as fs;
use gvm_version::Version;
use tracing::{debug, instrument};

/// Prefix of the directories installs are unpacked into before being published.
pub const STAGING_PREFIX: &str = ".staging-";

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Invalid {kind} name {name:?}")]
    #[diagnostic(help("Names must be a single path component without separators or a leading dot"))]
    InvalidName { kind: &'static str, name: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

type Result<T> = miette::Result<T, Error>;

/// The on-disk tree of installed toolchains, `<base>/versions/<language>/<version>/`.
///
/// A version counts as installed exactly when its directory exists.
#[derive(Debug, Clone)]
pub struct VersionStore {
    versions_dir: Utf8PathBuf,
}

impl VersionStore {
    pub fn new(base_dir: &Utf8Path) -> Self {
        Self {
            versions_dir: gvm_dirs::versions_dir(base_dir),
        }
    }

    pub fn versions_dir(&self) -> &Utf8Path {
        &self.versions_dir
    }

    pub fn language_dir(&self, language: &str) -> Result<Utf8PathBuf> {
        validate_name("language", language)?;
        Ok(self.versions_dir.join(language))
    }

    pub fn install_path(&self, language: &str, version: &str) -> Result<Utf8PathBuf> {
        validate_name("version", version)?;
        Ok(self.language_dir(language)?.join(version))
    }

    pub fn exists(&self, language: &str, version: &str) -> Result<bool> {
        Ok(self.install_path(language, version)?.is_dir())
    }

    /// Installed versions of `language`, oldest first.
    ///
    /// A language that was never installed has no directory and yields an empty list.
    #[instrument(skip(self))]
    pub fn list(&self, language: &str) -> Result<Vec<String>> {
        let language_dir = self.language_dir(language)?;

        let entries = match fs::read_dir(&language_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No versions directory for {language} at {language_dir}");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                debug!("Skipping non UTF-8 entry in {language_dir}");
                continue;
            };
            // Staging directories and anything else hidden.
            if name.starts_with('.') {
                continue;
            }
            versions.push(name);
        }

        sort_versions(&mut versions);
        Ok(versions)
    }

    /// Creates a hidden directory next to the final install path to unpack into.
    ///
    /// The directory is removed when the handle is dropped unless it was
    /// published first.
    pub fn staging_dir(&self, language: &str) -> Result<Utf8TempDir> {
        let language_dir = self.language_dir(language)?;
        fs::create_dir_all(&language_dir)?;
        let staging = camino_tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&language_dir)?;
        debug!("Staging install in {}", staging.path());
        Ok(staging)
    }

    /// Moves a fully extracted staging directory into place.
    pub fn publish(&self, staging: Utf8TempDir, install_path: &Utf8Path) -> Result<()> {
        fs::rename(staging.path(), install_path)?;
        // The staging path no longer exists, so dropping the handle is a no-op.
        drop(staging);
        Ok(())
    }
}

fn validate_name(kind: &'static str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && Utf8Path::new(name).file_name() == Some(name);

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidName {
            kind,
            name: name.to_owned(),
        })
    }
}

/// Sorts version strings in ascending version order.
///
/// Names that don't parse as versions sort after all that do, lexically.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::new(a), Version::new(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
