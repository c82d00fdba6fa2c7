//! Spreadsheet to trial-manifest conversion.
//!
//! Stages run one after another over the fully loaded sheet: column
//! resolution, row normalisation, per-group trial derivation, then version
//! splitting and file emission.

use anyhow::{Result, bail};
use tracing::info;

use crate::cli::Cli;
use crate::model::RunManifest;
use crate::util::{ensure_directory, sha256_file};

mod city;
mod columns;
mod normalize;
mod sheet;
mod trials;
mod versions;
mod writer;

use columns::ColumnMap;
use normalize::normalize_rows;
use sheet::load_sheet;
use trials::{build_trials, group_rows};
use versions::{reorder, split_version_indices};
use writer::ManifestWriter;

#[derive(Debug)]
pub struct ConvertSummary {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rows_rejected: usize,
    pub manifest: RunManifest,
}

pub fn run(cli: &Cli) -> Result<ConvertSummary> {
    if !cli.input.is_file() {
        bail!("Input spreadsheet not found: {}", cli.input.display());
    }
    if !cli.dry_run {
        ensure_directory(&cli.output_dir)?;
    }

    let input_sha256 = sha256_file(&cli.input)?;
    info!(
        input = %cli.input.display(),
        sha256 = %input_sha256,
        output_dir = %cli.output_dir.display(),
        dry_run = cli.dry_run,
        "starting conversion"
    );

    let sheet = load_sheet(&cli.input, cli.sheet.as_deref())?;
    let columns = ColumnMap::resolve(&sheet.headers)?;
    let normalized = normalize_rows(&sheet, &columns);
    let rows_accepted = normalized.rows.len();
    let groups = group_rows(normalized.rows);

    // Derive everything before the first write so a bad row leaves no partial output.
    let mut prepared = Vec::with_capacity(groups.len());
    for group in &groups {
        prepared.push((&group.key, build_trials(group)?));
    }

    let mut writer = ManifestWriter::new(&cli.output_dir, cli.dry_run);
    for (key, trials) in prepared {
        let (v1, v2) = split_version_indices(trials.len());
        writer.write_group(key, &reorder(&trials, &v1), &reorder(&trials, &v2))?;
    }
    let manifest = writer.finish()?;

    Ok(ConvertSummary {
        rows_read: sheet.rows.len(),
        rows_accepted,
        rows_rejected: normalized.rejected,
        manifest,
    })
}
