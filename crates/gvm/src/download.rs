use std::io::Write;

use camino_tempfile::NamedUtf8TempFile;
use futures_util::StreamExt;
use indicatif::ProgressStyle;
use once_cell::sync::Lazy;
use reqwest::StatusCode;
use tracing::{Instrument, Span, debug, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::source::ResolvedDownload;

static BAR_STYLE: Lazy<ProgressStyle> = Lazy::new(|| {
    ProgressStyle::with_template(
        "{msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
});

static SPINNER_STYLE: Lazy<ProgressStyle> = Lazy::new(|| {
    ProgressStyle::with_template("{spinner} {msg} {bytes} ({bytes_per_sec})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Failed to download {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to download {url}: server responded with {status}")]
    #[diagnostic(help("Check that the version exists and is published for your platform"))]
    HttpStatus { url: String, status: StatusCode },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

type Result<T> = miette::Result<T, Error>;

/// The HTTP client used for every request gvm makes.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(format!("gvm/{}", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Streams `resolved` into a new temporary file, showing a progress bar.
///
/// The file is deleted when the returned handle is dropped.
pub async fn download(
    client: &reqwest::Client,
    resolved: &ResolvedDownload,
) -> Result<NamedUtf8TempFile> {
    let url = resolved.url.as_str();
    debug!("Downloading {url}");

    let network = |source| Error::Network {
        url: url.to_owned(),
        source,
    };

    let response = client
        .get(resolved.url.clone())
        .send()
        .await
        .map_err(network)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(Error::HttpStatus {
            url: url.to_owned(),
            status,
        });
    }

    let mut file = camino_tempfile::Builder::new()
        .prefix("gvm-")
        .suffix(resolved.kind.suffix())
        .tempfile()?;

    let span = info_span!("download", indicatif.pb_show = true);
    match response.content_length().filter(|length| *length > 0) {
        Some(length) => {
            span.pb_set_style(&BAR_STYLE);
            span.pb_set_length(length);
        }
        None => span.pb_set_style(&SPINNER_STYLE),
    }
    span.pb_set_message(file_name(url));

    let written = async {
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(network)?;
            file.write_all(&chunk)?;
            written += chunk.len() as u64;
            Span::current().pb_inc(chunk.len() as u64);
        }
        file.flush()?;
        Ok::<_, Error>(written)
    }
    .instrument(span)
    .await?;

    debug!("Downloaded {written} bytes to {}", file.path());
    Ok(file)
}

fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
