use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-catalog",
    about = "Extract bundled third-party licenses into a deduplicated catalog",
    version
)]
pub struct Cli {
    /// Dependency list, one `group:name:version` per line (gradle.lockfile also works)
    pub dependencies: PathBuf,

    /// Directory for generated library files
    #[arg(long, default_value = "libraries", value_name = "DIR")]
    pub libraries_dir: PathBuf,

    /// Directory for generated license files
    #[arg(long, default_value = "licenses", value_name = "DIR")]
    pub licenses_dir: PathBuf,

    /// Maven-layout repository to search for artifacts (repeatable; replaces the configured list)
    #[arg(long = "repository", value_name = "DIR")]
    pub repositories: Vec<PathBuf>,

    /// Config file [default: ./.license-catalog/config.toml, fallback ~/.config/license-catalog/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Summary format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show every stored license and library, and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
