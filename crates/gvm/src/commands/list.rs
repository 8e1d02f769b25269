use std::io;

use anstream::println;
use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::store;

#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    StoreError(#[from] store::Error),
}

type Result<T> = miette::Result<T, Error>;

#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
struct VersionEntry {
    version: String,
    path: Utf8PathBuf,
}

/// Lists the installed versions of `language`, oldest first.
pub fn list(config: &Config, language: &str, format: OutputFormat) -> Result<()> {
    let entries = entries(config, language)?;

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), &entries)?;
            println!();
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                warn!("No versions of {language} installed.");
                info!("Try installing one with 'gvm install {language} <version>'");
            }
            for entry in entries {
                println!("{}", entry.version);
            }
        }
    }

    Ok(())
}

fn entries(config: &Config, language: &str) -> Result<Vec<VersionEntry>> {
    let store = config.store();
    store
        .list(language)?
        .into_iter()
        .map(|version| -> Result<VersionEntry> {
            let path = store.install_path(language, &version)?;
            Ok(VersionEntry { version, path })
        })
        .collect()
}
