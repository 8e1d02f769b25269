use gvm_platform::{Arch, HostPlatform, Os};
use indexmap::{IndexMap, indexmap};
use once_cell::sync::Lazy;
use tracing::debug;
use url::Url;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("gvm doesn't know how to install {language}")]
    UnsupportedLanguage {
        language: String,
        #[help]
        help: String,
    },
    #[error("No {language} downloads are published for {os}")]
    UnsupportedOs { language: String, os: Os },
    #[error("Invalid download URL {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

type Result<T> = miette::Result<T, Error>;

/// How a downloaded archive must be unpacked, decided by the URL suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
    /// Any other suffix. Unpacked as tar+gzip.
    Opaque,
}

impl ArchiveKind {
    pub fn from_url(url: &str) -> Self {
        if url.ends_with(".tar.gz") {
            Self::TarGz
        } else if url.ends_with(".zip") {
            Self::Zip
        } else {
            Self::Opaque
        }
    }

    /// Suffix for temporary files holding an archive of this kind.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::TarGz => ".tar.gz",
            Self::Zip => ".zip",
            Self::Opaque => ".tmp",
        }
    }
}

/// The way a language spells the values it substitutes into its templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interpolation {
    /// `{version}`, `{os}` and `{arch}`, with go's own names for OS and arch.
    Go,
    /// `{version}` only.
    Python,
}

impl Interpolation {
    fn interpolate(&self, template: &str, version: &str, platform: HostPlatform) -> String {
        match self {
            Self::Go => template
                .replace("{version}", version)
                .replace("{os}", go_os(platform.os()))
                .replace("{arch}", go_arch(platform.arch())),
            Self::Python => template.replace("{version}", version),
        }
    }
}

fn go_os(os: Os) -> &'static str {
    match os {
        Os::Linux => "linux",
        Os::Macos => "darwin",
        Os::Windows => "windows",
    }
}

fn go_arch(arch: Arch) -> &'static str {
    match arch {
        Arch::X86_64 => "amd64",
        Arch::Aarch64 => "arm64",
    }
}

#[derive(Debug)]
struct DownloadSource {
    base_url: &'static str,
    interpolation: Interpolation,
    /// Path templates below `base_url`, per OS.
    templates: IndexMap<Os, &'static str>,
}

static SOURCES: Lazy<IndexMap<&'static str, DownloadSource>> = Lazy::new(|| {
    indexmap! {
        "go" => DownloadSource {
            base_url: "https://go.dev/dl",
            interpolation: Interpolation::Go,
            templates: indexmap! {
                Os::Linux => "go{version}.{os}-{arch}.tar.gz",
                Os::Macos => "go{version}.{os}-{arch}.tar.gz",
                Os::Windows => "go{version}.{os}-{arch}.zip",
            },
        },
        "python" => DownloadSource {
            base_url: "https://www.python.org/ftp/python",
            interpolation: Interpolation::Python,
            templates: indexmap! {
                Os::Windows => "{version}/python-{version}-embed-amd64.zip",
            },
        },
    }
});

/// Languages that have at least one download template.
pub fn supported_languages() -> Vec<&'static str> {
    SOURCES.keys().copied().collect()
}

/// Where to fetch a toolchain from and how to unpack it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub url: Url,
    pub kind: ArchiveKind,
}

/// Resolves the download for `language` at `version` on `platform`.
///
/// `download_base` replaces the language's default base URL, which allows
/// installing from a mirror.
pub fn resolve(
    language: &str,
    version: &str,
    platform: HostPlatform,
    download_base: Option<&Url>,
) -> Result<ResolvedDownload> {
    let source = SOURCES
        .get(language)
        .ok_or_else(|| Error::UnsupportedLanguage {
            language: language.to_owned(),
            help: format!(
                "Supported languages are: {}",
                supported_languages().join(", ")
            ),
        })?;

    let os = platform.os();
    let template = source
        .templates
        .get(&os)
        .ok_or_else(|| Error::UnsupportedOs {
            language: language.to_owned(),
            os,
        })?;

    let base = download_base.map_or(source.base_url, Url::as_str);
    let path = source.interpolation.interpolate(template, version, platform);
    let url = format!("{}/{path}", base.trim_end_matches('/'));
    debug!("Resolved {language} {version} for {platform} to {url}");

    let kind = ArchiveKind::from_url(&url);
    let url = Url::parse(&url).map_err(|source| Error::InvalidUrl { url, source })?;

    Ok(ResolvedDownload { url, kind })
}

/// Default base URL of `language`, if gvm can install it.
pub fn default_base_url(language: &str) -> Option<&'static str> {
    SOURCES.get(language).map(|source| source.base_url)
}
