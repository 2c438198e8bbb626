//! Multi-format subscriber export.
//!
//! An export resolves the matching subscribers, writes them to a uniquely named
//! scratch file and hands the file back as a [`ScratchFile`] guard which
//! removes it once the download is over.

mod format;
mod scratch;
mod writer;

pub use format::ExportFormat;
pub use scratch::ScratchFile;

use crate::{filter::SubscriberFilter, store::SubscriberStore, telemetry::spawn_blocking_with_tracing};
use anyhow::Context;
use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use regex::Regex;
use std::{io::BufWriter, iter::repeat_with, path::Path};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use writer::write_export;

const FILENAME_PREFIX: &str = "newsletter_emails";
const SUFFIX_LENGTH: usize = 8;

/// Which subscribers an export covers. Independent from the dashboard filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportScope {
    All,
    Country(String),
}

impl ExportScope {
    /// A non-blank country always narrows the export; `type=country` without
    /// one is rejected.
    pub fn parse(kind: Option<&str>, country: Option<&str>) -> Result<Self, String> {
        match country.map(str::trim).filter(|c| !c.is_empty()) {
            Some(country) => Ok(Self::Country(country.to_string())),
            None if kind.map(str::trim) == Some("country") => {
                Err("Please select a country when exporting by country".into())
            }
            None => Ok(Self::All),
        }
    }

    pub fn filter(&self) -> SubscriberFilter {
        match self {
            Self::All => SubscriberFilter::everything(),
            Self::Country(country) => SubscriberFilter::by_country(country),
        }
    }

    fn label(&self) -> String {
        static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]+").unwrap());

        match self {
            Self::All => "all".into(),
            Self::Country(country) => UNSAFE_CHARS.replace_all(country, "_").into_owned(),
        }
    }
}

#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub file: ScratchFile,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No emails found to export")]
    NothingToExport,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

#[tracing::instrument(name = "Export subscribers", skip(store))]
pub async fn export(
    store: &dyn SubscriberStore,
    scope: &ExportScope,
    format: ExportFormat,
    scratch_dir: &Path,
) -> Result<ExportFile, ExportError> {
    let subscribers = store
        .all(&scope.filter())
        .await
        .context("Failed to fetch subscribers to export")?;

    if subscribers.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    tokio::fs::create_dir_all(scratch_dir)
        .await
        .with_context(|| format!("Failed to create export directory {}", scratch_dir.display()))?;

    let filename = export_filename(scope, format, OffsetDateTime::now_utc())?;
    let path = scratch_dir.join(&filename);
    let output = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .with_context(|| format!("Failed to create export file {}", path.display()))?
        .into_std()
        .await;
    let file = ScratchFile::adopt(path);

    spawn_blocking_with_tracing(move || write_export(BufWriter::new(output), format, &subscribers))
        .await
        .context("Export writer task failed")?
        .context("Failed to write export file")?;

    tracing::info!("Exported subscribers to `{}`", file.path().display());

    Ok(ExportFile {
        filename,
        content_type: format.content_type(),
        file,
    })
}

/// `newsletter_emails_{scope}_{timestamp}_{suffix}.{ext}`
pub fn export_filename(
    scope: &ExportScope,
    format: ExportFormat,
    exported_at: OffsetDateTime,
) -> Result<String, anyhow::Error> {
    let timestamp = exported_at
        .to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .context("Failed to format export timestamp")?
        .replace([':', '.'], "-");

    let mut rng = thread_rng();
    let suffix: String = repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(SUFFIX_LENGTH)
        .collect();

    Ok(format!(
        "{FILENAME_PREFIX}_{}_{timestamp}_{suffix}.{}",
        scope.label(),
        format.extension()
    ))
}
