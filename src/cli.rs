use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "trialgen",
    version,
    about = "Convert an experiment-design spreadsheet into per-session trial manifests"
)]
pub struct Cli {
    /// Spreadsheet with one row per trial (.xlsx, .xls, .ods or .csv).
    #[arg(default_value = "master_web.xlsx")]
    pub input: PathBuf,

    /// Directory receiving the trial files and manifest.json.
    #[arg(default_value = "config")]
    pub output_dir: PathBuf,

    /// Worksheet to read instead of the first one.
    #[arg(long)]
    pub sheet: Option<String>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
