//! Add-on archives and unique test data.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use amo_probe::{ProbeError, ProbeResult};

/// Manifest file name, both on disk and inside the archive
pub const MANIFEST_FILE: &str = "manifest.json";

/// Archive written by [`make_addon`]
pub const ADDON_ARCHIVE: &str = "make-addon.zip";

fn fixture_error(e: impl std::fmt::Display) -> ProbeError {
    ProbeError::FixtureError {
        message: e.to_string(),
    }
}

/// Write `manifest` into `dir` and package it as an uploadable archive
///
/// Both `manifest.json` and `make-addon.zip` are overwritten on every call.
/// Returns the archive path.
pub fn make_addon(manifest: &serde_json::Value, dir: &Path) -> ProbeResult<PathBuf> {
    if !manifest.is_object() {
        return Err(fixture_error("manifest must be a JSON object"));
    }
    std::fs::create_dir_all(dir)?;

    let contents = serde_json::to_vec(manifest)?;
    std::fs::write(dir.join(MANIFEST_FILE), &contents)?;

    let archive = dir.join(ADDON_ARCHIVE);
    let mut zip = zip::ZipWriter::new(File::create(&archive)?);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(MANIFEST_FILE, options)
        .map_err(fixture_error)?;
    zip.write_all(&contents)?;
    let _ = zip.finish().map_err(fixture_error)?;

    tracing::debug!(archive = %archive.display(), %manifest, "addon archive written");
    Ok(archive)
}

/// Random lowercase alphanumeric string of `len` characters
#[must_use]
pub fn random_string(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        out.push_str(&uuid::Uuid::new_v4().simple().to_string());
    }
    out.truncate(len);
    out
}

/// Fresh address at `domain`, for newsletter and account scenarios
#[must_use]
pub fn random_email(domain: &str) -> String {
    format!("amo-probe-{}@{domain}", random_string(12))
}
