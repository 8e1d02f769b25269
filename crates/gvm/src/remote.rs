use std::collections::BTreeSet;

use gvm_version::Version;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::source;

static PYTHON_RELEASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="([0-9]+\.[0-9]+\.[0-9]+)/""#).unwrap());

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("gvm can't list available versions of {language}")]
    Unsupported { language: String },
    #[error("Failed to fetch available versions from {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to fetch available versions from {url}: server responded with {status}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Could not parse the release index at {url}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("No versions of {language} found at {url}")]
    NoVersionsFound { language: String, url: String },
}

type Result<T> = miette::Result<T, Error>;

/// A release in go's JSON download index.
#[derive(Debug, Deserialize)]
struct GoRelease {
    version: String,
}

/// Lists versions of `language` that can be installed, newest first.
///
/// `download_base` points the lister at a mirror, the same way it does for installs.
#[instrument(skip(client))]
pub async fn available_versions(
    client: &reqwest::Client,
    language: &str,
    download_base: Option<&Url>,
) -> Result<Vec<String>> {
    let parse: fn(&str) -> serde_json::Result<Vec<String>> = match language {
        "python" => |body| Ok(parse_python_index(body)),
        "go" => parse_go_index,
        _ => {
            return Err(Error::Unsupported {
                language: language.to_owned(),
            });
        }
    };

    let url = index_url(language, download_base)?;
    let body = fetch(client, &url).await?;
    let candidates = parse(&body).map_err(|source| Error::Parse {
        url: url.clone(),
        source,
    })?;

    let versions = sort_newest_first(candidates);
    debug!("Found {} {language} versions at {url}", versions.len());
    if versions.is_empty() {
        return Err(Error::NoVersionsFound {
            language: language.to_owned(),
            url,
        });
    }

    Ok(versions)
}

fn index_url(language: &str, download_base: Option<&Url>) -> Result<String> {
    let base = download_base
        .map(Url::as_str)
        .or_else(|| source::default_base_url(language))
        .ok_or_else(|| Error::Unsupported {
            language: language.to_owned(),
        })?
        .trim_end_matches('/');

    Ok(match language {
        "go" => format!("{base}/?mode=json&include=all"),
        _ => format!("{base}/"),
    })
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    let fetch_error = |source| Error::Fetch {
        url: url.to_owned(),
        source,
    };

    let response = client.get(url).send().await.map_err(fetch_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::BadStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(fetch_error)
}

/// Version directories linked from python's FTP index page.
fn parse_python_index(body: &str) -> Vec<String> {
    PYTHON_RELEASE_REGEX
        .captures_iter(body)
        .map(|captures| captures[1].to_owned())
        .collect()
}

/// Versions in go's JSON release index, without the `go` prefix.
fn parse_go_index(body: &str) -> serde_json::Result<Vec<String>> {
    let releases: Vec<GoRelease> = serde_json::from_str(body)?;
    Ok(releases
        .into_iter()
        .map(|release| {
            release
                .version
                .strip_prefix("go")
                .map(str::to_owned)
                .unwrap_or(release.version)
        })
        .collect())
}

/// Drops unparseable and duplicate versions, then sorts newest first.
fn sort_newest_first(candidates: Vec<String>) -> Vec<String> {
    let versions: BTreeSet<Version> = candidates
        .into_iter()
        .filter_map(|candidate| match Version::new(&candidate) {
            Ok(version) => Some(version),
            Err(err) => {
                debug!("Ignoring {candidate:?}: {err}");
                None
            }
        })
        .collect();

    versions.into_iter().rev().map(|v| v.to_string()).collect()
}

/// Keeps only final releases.
pub fn stable_only(versions: Vec<String>) -> Vec<String> {
    versions
        .into_iter()
        .filter(|version| Version::new(version).is_ok_and(|version| !version.is_prerelease()))
        .collect()
}
