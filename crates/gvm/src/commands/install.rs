use anstream::println;
use owo_colors::OwoColorize;
use tracing::{debug, info};

use crate::config::Config;
use crate::source::ArchiveKind;
use crate::{archive, download, source, store};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] store::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] source::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Download(#[from] download::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Archive(#[from] archive::Error),
    #[error(transparent)]
    Platform(#[from] gvm_platform::UnsupportedPlatformError),
    #[error("Could not create an HTTP client")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

type Result<T> = miette::Result<T, Error>;

/// Installs `language` at `version` unless it is already there.
///
/// The archive is unpacked into a staging directory and only moved to its
/// final location once extraction succeeded, so an interrupted install never
/// looks installed.
pub async fn install(config: &Config, language: &str, version: &str) -> Result<()> {
    let store = config.store();
    let install_path = store.install_path(language, version)?;

    if store.exists(language, version)? {
        println!(
            "{} {} is already installed at {}",
            language.cyan(),
            version.cyan(),
            install_path.cyan()
        );
        return Ok(());
    }

    let resolved = source::resolve(
        language,
        version,
        config.platform()?,
        config.download_url.as_ref(),
    )?;

    info!("Downloading {language} {version} from {}", resolved.url);
    let client = download::http_client()?;
    let downloaded = download::download(&client, &resolved).await?;

    let staging = store.staging_dir(language)?;
    debug!("Extracting {} as {:?}", downloaded.path(), resolved.kind);
    match resolved.kind {
        ArchiveKind::Zip => archive::extract_zip(downloaded.path(), staging.path())?,
        ArchiveKind::TarGz | ArchiveKind::Opaque => {
            archive::extract_tar(downloaded.reopen()?, staging.path())?
        }
    }
    store.publish(staging, &install_path)?;

    println!(
        "Installed {} {} to {}",
        language.cyan(),
        version.cyan(),
        install_path.cyan()
    );

    Ok(())
}
