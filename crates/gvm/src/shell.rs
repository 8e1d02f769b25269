use std::borrow::Cow;

use camino::Utf8Path;
use indexmap::{IndexMap, indexmap};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::store::{self, VersionStore};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("{language} {version} is not installed")]
    #[diagnostic(help("Install it first with `gvm install <language> <version>`"))]
    NotInstalled { language: String, version: String },
    #[error("gvm doesn't know where {language} keeps its executables")]
    UnrecognizedLanguage { language: String },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] store::Error),
}

type Result<T> = miette::Result<T, Error>;

/// Directory holding a language's executables, relative to its version directory.
static BIN_SUBDIRS: Lazy<IndexMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    indexmap! {
        "go" => &["go", "bin"][..],
        "python" => &[][..],
    }
});

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Cmd,
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bash => write!(f, "bash"),
            Self::Zsh => write!(f, "zsh"),
            Self::Fish => write!(f, "fish"),
            Self::Powershell => write!(f, "powershell"),
            Self::Cmd => write!(f, "cmd"),
        }
    }
}

impl Shell {
    /// PowerShell on Windows, otherwise whatever `$SHELL` names.
    pub fn detect(windows: bool, shell_env: Option<&str>) -> Self {
        if windows {
            return Self::Powershell;
        }

        let name = shell_env
            .map(Utf8Path::new)
            .and_then(Utf8Path::file_name)
            .unwrap_or_default();
        match name {
            "fish" => Self::Fish,
            "zsh" => Self::Zsh,
            _ => Self::Bash,
        }
    }

    /// Renders a statement that sets `PATH` to `entries` in this shell.
    ///
    /// `separator` is the host's `PATH` separator, whichever shell runs there.
    pub fn render_path(&self, entries: &[String], separator: char) -> String {
        let joined = || entries.join(&separator.to_string());
        match self {
            Self::Bash | Self::Zsh => format!("export PATH={}", escape(&joined())),
            Self::Fish => {
                let entries: Vec<_> = entries.iter().map(escape).collect();
                format!("set -gx PATH {}", entries.join(" "))
            }
            Self::Powershell => format!("$env:PATH = '{}'", joined().replace('\'', "''")),
            Self::Cmd => format!("set \"PATH={}\"", joined()),
        }
    }
}

fn escape(string: &impl AsRef<str>) -> Cow<'_, str> {
    shell_escape::unix::escape(string.as_ref().into())
}

/// `bin_dir` followed by every entry of `path_env` that is non-empty and does
/// not mention `base_dir`.
pub fn compose_path(
    bin_dir: &Utf8Path,
    path_env: &str,
    base_dir: &Utf8Path,
    separator: char,
) -> Vec<String> {
    let base_dir = base_dir.as_str();
    std::iter::once(bin_dir.to_string())
        .chain(
            path_env
                .split(separator)
                .filter(|entry| !entry.is_empty() && !entry.contains(base_dir))
                .map(str::to_owned),
        )
        .collect()
}

/// Builds the shell statement that puts `language` `version` first on `PATH`.
///
/// Any other gvm-managed directory is dropped from `path_env`, which is split
/// and rejoined on `separator`. Nothing in the current process environment is
/// changed.
pub fn compose_use_command(
    store: &VersionStore,
    language: &str,
    version: &str,
    path_env: &str,
    base_dir: &Utf8Path,
    separator: char,
    shell: Shell,
) -> Result<String> {
    let install_path = store.install_path(language, version)?;
    if !store.exists(language, version)? {
        return Err(Error::NotInstalled {
            language: language.to_owned(),
            version: version.to_owned(),
        });
    }

    let subdirs = BIN_SUBDIRS
        .get(language)
        .ok_or_else(|| Error::UnrecognizedLanguage {
            language: language.to_owned(),
        })?;
    let bin_dir = subdirs
        .iter()
        .fold(install_path, |path, subdir| path.join(subdir));
    debug!("Putting {bin_dir} first on PATH for {shell}");

    let entries = compose_path(&bin_dir, path_env, base_dir, separator);
    Ok(shell.render_path(&entries, separator))
}
