//! `attribution-report` — turn license findings into an attribution document.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and the analysis result ([`models::AnalysisResult`]).
//! 3. Optionally fetch missing license texts (`--online`, [`registry`]).
//! 4. Build the document model: license selection, copyright aggregation and
//!    license entries per package ([`license`], [`report::model`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0`, or `1` on any fatal error (e.g. not exactly one project).

mod cli;
mod config;
mod error;
mod license;
mod models;
mod registry;
mod report;

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::{load_config, NetworkConfig};
use license::selector;
use license::spdx::SpdxRegistry;
use license::texts::{LicenseTextLookup, LicenseTexts};
use models::{AnalysisResult, Outcome};
use report::pdf::PdfEmitter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let base_dir = cli
        .input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let config = load_config(&base_dir, cli.config.as_deref())?;

    let result = AnalysisResult::load(&cli.input)?;
    info!(
        projects = result.projects.len(),
        packages = result.packages.len(),
        "loaded analysis result"
    );

    // Command-line options override config options
    let mut options = config.options.clone();
    options.extend(cli.options.iter().cloned());

    let mut text_dirs = cli.license_texts.clone();
    text_dirs.extend(config.licenses.text_dirs.iter().cloned());
    let mut texts = LicenseTexts::new(text_dirs);
    let registry = SpdxRegistry::new(config.licenses.names.clone());

    if cli.online {
        fetch_missing_texts(&result, &mut texts, &config.network, cli.quiet).await?;
    }

    match cli.report {
        ReportFormat::Terminal => {
            let model = report::model::build(&result, &texts, &registry)?;
            report::terminal::render(&model, cli.verbose, cli.quiet);
        }
        ReportFormat::Json => {
            let model = report::model::build(&result, &texts, &registry)?;
            let json = serde_json::to_string_pretty(&model)?;
            match &cli.output {
                Some(path) => std::fs::write(path, json)
                    .with_context(|| format!("Failed to write JSON to {}", path.display()))?,
                None => println!("{}", json),
            }
        }
        ReportFormat::Pdf => {
            let output = cli
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from("attribution.pdf"));

            let mut buffer = Vec::new();
            let outcome = report::generate(
                &result,
                &texts,
                &registry,
                &options,
                &PdfEmitter,
                &mut buffer,
            )?;

            match outcome {
                Outcome::Written { .. } => {
                    let mut file = std::fs::File::create(&output)
                        .with_context(|| format!("Failed to create {}", output.display()))?;
                    file.write_all(&buffer)
                        .with_context(|| format!("Failed to write PDF to {}", output.display()))?;
                    if !cli.quiet {
                        println!("Attribution PDF written to: {}", output.display());
                    }
                }
                Outcome::NoArtifact => {
                    warn!(output = %output.display(), "no document produced; output not written");
                    eprintln!("  {} {}", "⚠".yellow(), outcome);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Fetch texts for every license of every resolved set that no local source has.
async fn fetch_missing_texts(
    result: &AnalysisResult,
    texts: &mut LicenseTexts,
    network: &NetworkConfig,
    quiet: bool,
) -> Result<()> {
    use futures::future::join_all;

    const BATCH_SIZE: usize = 25;

    let wanted: BTreeSet<String> = result
        .packages
        .iter()
        .map(|p| &p.licenses)
        .chain(result.projects.iter().map(|p| &p.licenses))
        .flat_map(|sources| {
            selector::select(sources)
                .iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|id| texts.license_text(id).is_none())
        .collect();

    if wanted.is_empty() {
        return Ok(());
    }

    let client = registry::build_client(network)?;

    let pb = if !quiet {
        let pb = ProgressBar::new(wanted.len() as u64);
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

    let ids: Vec<String> = wanted.into_iter().collect();
    for batch in ids.chunks(BATCH_SIZE) {
        let futures: Vec<_> = batch
            .iter()
            .map(|id| registry::spdx::fetch_license_text(&client, id))
            .collect();

        let results = join_all(futures).await;

        for (id, fetched) in batch.iter().zip(results) {
            match fetched {
                Ok(Some(text)) => texts.insert(id.clone(), text),
                Ok(None) => info!(license = %id, "no SPDX license text"),
                Err(e) => warn!(license = %id, error = %e, "failed to fetch license text"),
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(())
}
