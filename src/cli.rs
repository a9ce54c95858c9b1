use std::path::PathBuf;

use clap::Parser;

use crate::config::parse_option;

#[derive(Parser, Debug)]
#[command(
    name = "attribution-report",
    about = "Assemble license and copyright findings into an attribution document",
    version
)]
pub struct Cli {
    /// Analysis result (JSON) from the dependency-analysis pipeline
    pub input: PathBuf,

    /// Output file [default: attribution.pdf for PDF, stdout for JSON]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "pdf", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Generation option, e.g. template.id=acme (repeatable, overrides config)
    #[arg(short = 'O', long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Directory of license texts named <id> or <id>.txt (repeatable, searched first)
    #[arg(long = "license-texts", value_name = "DIR")]
    pub license_texts: Vec<PathBuf>,

    /// Config file [default: <input dir>/.attribution-report/config.toml, fallback ~/.config/attribution-report/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fetch missing license texts from the SPDX license list
    #[arg(long)]
    pub online: bool,

    /// Show every package in the terminal summary and log progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Pdf,
    Json,
    Terminal,
}
