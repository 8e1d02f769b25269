use camino::{Utf8Path, Utf8PathBuf};

/// Name of the directory created under the user's home.
pub const DEFAULT_DIR_NAME: &str = ".gvm";

/// Name of the subdirectory holding installed toolchains.
pub const VERSIONS_DIR_NAME: &str = "versions";

/// Returns the user's home directory, if it can be resolved as UTF-8.
pub fn home_dir() -> Option<Utf8PathBuf> {
    etcetera::home_dir()
        .ok()
        .and_then(|path| Utf8PathBuf::try_from(path).ok())
}

/// Returns `$HOME/.gvm`, the base directory used when no root is given.
///
/// Returns `None` if the home directory can't be resolved. Does not check if
/// the directory exists.
pub fn user_gvm_dir() -> Option<Utf8PathBuf> {
    home_dir().map(|home| default_gvm_dir(&home))
}

/// `<home>/.gvm`
pub fn default_gvm_dir(home: &Utf8Path) -> Utf8PathBuf {
    home.join(DEFAULT_DIR_NAME)
}

/// `<base>/versions`
pub fn versions_dir(base: &Utf8Path) -> Utf8PathBuf {
    base.join(VERSIONS_DIR_NAME)
}
