use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::GzDecoder;
use fs_err as fs;
use tracing::{debug, instrument};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Archive entry {entry:?} would be extracted outside of {dest}")]
    #[diagnostic(help("The archive may be corrupt or malicious, nothing was installed"))]
    IllegalPath { entry: String, dest: Utf8PathBuf },
    #[error("Could not read zip archive")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

type Result<T> = miette::Result<T, Error>;

/// Unpacks a gzip-compressed tarball read from `reader` into `dest`.
#[instrument(skip(reader))]
pub fn extract_tar(reader: impl Read, dest: &Utf8Path) -> Result<()> {
    fs::create_dir_all(dest)?;

    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().into_owned();
        let target = enclosed_path(dest, &name)?;
        let entry_type = entry.header().entry_type();
        let mode = entry.header().mode().ok();

        if entry_type.is_dir() {
            create_dir(&target, mode)?;
        } else if entry_type.is_file() {
            write_file(&target, &mut entry, mode)?;
        } else {
            debug!("Skipping {entry_type:?} entry {name}");
        }
    }

    Ok(())
}

/// Unpacks the zip archive at `source` into `dest`.
#[instrument]
pub fn extract_zip(source: &Utf8Path, dest: &Utf8Path) -> Result<()> {
    fs::create_dir_all(dest)?;

    let mut archive = zip::ZipArchive::new(fs::File::open(source)?)?;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_owned();
        let target = enclosed_path(dest, &name)?;
        let mode = entry.unix_mode();

        if entry.is_dir() {
            create_dir(&target, mode)?;
        } else if mode.is_some_and(is_symlink_mode) {
            debug!("Skipping symlink entry {name}");
        } else if entry.is_file() {
            write_file(&target, &mut entry, mode)?;
        } else {
            debug!("Skipping special entry {name}");
        }
    }

    Ok(())
}

/// Joins an archive entry name onto `dest`, refusing anything that would land outside it.
///
/// The name is cleaned lexically: `.` segments are dropped and `..` removes the
/// previous segment. Absolute names and `..` segments that climb above `dest`
/// are rejected with [`Error::IllegalPath`]. Both `/` and `\` separate segments.
pub fn enclosed_path(dest: &Utf8Path, name: &str) -> Result<Utf8PathBuf> {
    let illegal = || Error::IllegalPath {
        entry: name.to_owned(),
        dest: dest.to_owned(),
    };

    if name.starts_with(['/', '\\']) || Utf8Path::new(name).has_root() {
        return Err(illegal());
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(illegal());
                }
            }
            // Drive prefixes such as `C:`.
            segment if cfg!(windows) && segment.contains(':') => return Err(illegal()),
            segment => segments.push(segment),
        }
    }

    let path = segments
        .iter()
        .fold(dest.to_path_buf(), |path, segment| path.join(segment));
    if !path.starts_with(dest) {
        return Err(illegal());
    }

    Ok(path)
}

fn is_symlink_mode(mode: u32) -> bool {
    mode & 0o170000 == 0o120000
}

fn create_dir(path: &Utf8Path, mode: Option<u32>) -> Result<()> {
    fs::create_dir_all(path)?;
    // Keep the owner bits so later entries can still be written below it.
    set_mode(path, mode.map(|mode| mode | 0o700))
}

fn write_file(path: &Utf8Path, reader: &mut impl Read, mode: Option<u32>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    io::copy(reader, &mut file)?;
    set_mode(path, mode)
}

#[cfg(unix)]
fn set_mode(path: &Utf8Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode {
        fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o7777))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Utf8Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}
