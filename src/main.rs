//! `license-catalog` — extract bundled third-party license texts into a
//! deduplicated, regenerable catalog.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and load config ([`config::load_config`]).
//! 2. Read the dependency list and keep license containers ([`coordinates`]).
//! 3. Resolve, open, split and classify each container ([`pipeline`], [`license`]).
//! 4. Collapse identical license bodies into one record ([`catalog`]).
//! 5. Replace previously generated files, leaving hand-authored ones ([`output`]).
//! 6. Render the run summary ([`report`]).

mod archive;
mod catalog;
mod cli;
mod config;
mod coordinates;
mod error;
mod license;
mod models;
mod output;
mod pipeline;
mod report;
mod resolver;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use archive::ZipOpener;
use cli::{Cli, ReportFormat};
use config::load_config;
use coordinates::{read_dependency_list, CoordinateFilter};
use license::patterns::SignatureSet;
use output::{reconcile, OutputLayout};
use pipeline::Pipeline;
use report::RunSummary;
use resolver::MavenRepositoryResolver;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if !cli.repositories.is_empty() {
        config.resolver.repositories = cli.repositories.clone();
    }

    // Bad configured patterns are fatal before any work is done
    let signatures = SignatureSet::new(&config.classifier.patterns)?;

    let coordinates = read_dependency_list(&cli.dependencies)?;
    let candidates = CoordinateFilter::new(&config.filter).select(&coordinates);
    tracing::info!(
        coordinates = coordinates.len(),
        candidates = candidates.len(),
        "selected license containers"
    );

    let pipeline = Pipeline::new(
        Arc::new(MavenRepositoryResolver::new(
            config.resolver.repositories.clone(),
        )),
        Arc::new(ZipOpener),
        signatures,
        config.archive,
        &config.output.namespace,
    );

    let pb = if !cli.quiet && !candidates.is_empty() {
        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let result = pipeline.run(&candidates, pb.as_ref()).await?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let layout = OutputLayout::new(
        cli.libraries_dir.clone(),
        cli.licenses_dir.clone(),
        &config.output,
    );
    let written = reconcile(&result.catalog, &layout)?;

    let summary = RunSummary::new(coordinates.len(), candidates.len(), &result, &written);
    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&summary, cli.verbose, cli.quiet)?,
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked from the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "license_catalog=debug"
    } else if quiet {
        "license_catalog=warn"
    } else {
        "license_catalog=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
