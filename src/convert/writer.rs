use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::model::{GroupKey, ManifestEntry, RunManifest, Trial};
use crate::util::{now_utc_string, write_json_pretty};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Trial file name for one group and version, e.g. `trials_S1_City1_ps_v1.json`.
pub fn trial_file_name(key: &GroupKey, version: &str) -> String {
    format!(
        "trials_{}_{}_{}_{}.json",
        key.session.replace(' ', ""),
        key.city.replace(' ', ""),
        key.task.to_lowercase(),
        version
    )
}

/// Accumulates manifest entries across groups; written once at the end of a run.
#[derive(Debug)]
pub struct ManifestWriter {
    output_dir: PathBuf,
    dry_run: bool,
    manifest: RunManifest,
}

impl ManifestWriter {
    pub fn new(output_dir: &Path, dry_run: bool) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            dry_run,
            manifest: RunManifest::default(),
        }
    }

    /// Writes both versions of a group and records them in the manifest.
    pub fn write_group(&mut self, key: &GroupKey, v1: &[Trial], v2: &[Trial]) -> Result<()> {
        let files = vec![trial_file_name(key, "v1"), trial_file_name(key, "v2")];

        if self.dry_run {
            info!(files = ?files, count = v1.len(), "dry-run: would write trial files");
        } else {
            write_json_pretty(&self.output_dir.join(&files[0]), &v1)?;
            write_json_pretty(&self.output_dir.join(&files[1]), &v2)?;
            info!(
                session = %key.session,
                city = %key.city,
                task = %key.task,
                count = v1.len(),
                "wrote trial files"
            );
        }

        self.manifest.generated.push(ManifestEntry {
            session: key.session.clone(),
            city: key.city.clone(),
            task: key.task.clone(),
            count: v1.len(),
            files,
        });
        Ok(())
    }

    /// Stamps `created_at` and writes `manifest.json`.
    pub fn finish(mut self) -> Result<RunManifest> {
        self.manifest.created_at = Some(now_utc_string());

        let path = self.output_dir.join(MANIFEST_FILE);
        if self.dry_run {
            info!(path = %path.display(), groups = self.manifest.generated.len(), "dry-run: would write manifest");
        } else {
            write_json_pretty(&path, &self.manifest)?;
            info!(path = %path.display(), groups = self.manifest.generated.len(), "wrote manifest");
        }

        Ok(self.manifest)
    }
}
