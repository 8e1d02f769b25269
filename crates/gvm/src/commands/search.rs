use anstream::println;
use owo_colors::OwoColorize;

use crate::config::Config;
use crate::{download, remote, store};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Remote(#[from] remote::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] store::Error),
    #[error("Could not create an HTTP client")]
    Client(#[from] reqwest::Error),
}

type Result<T> = miette::Result<T, Error>;

/// Prints the versions of `language` that can be installed, newest first.
pub async fn search(config: &Config, language: &str, stable_only: bool) -> Result<()> {
    let client = download::http_client()?;
    let mut versions =
        remote::available_versions(&client, language, config.download_url.as_ref()).await?;
    if stable_only {
        versions = remote::stable_only(versions);
    }

    let installed = config.store().list(language)?;
    for version in versions {
        if installed.contains(&version) {
            println!("{version} {}", "[installed]".green());
        } else {
            println!("{version}");
        }
    }

    Ok(())
}
