use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub use common::*;

#[derive(Parser)]
#[command(
    name = "scoregate",
    version,
    about = "Gate pull requests on repeated performance-audit scores and bundle size"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Aggregate audit reports, judge them against the goals and render the result
    Check(CheckArgs),
    /// Load and normalise a goals file without evaluating anything
    Validate(ValidateArgs),
    /// Write a sample goals file
    Init(InitArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long, default_value = "scoregate.yaml", env = "SCOREGATE_CONFIG")]
    pub config: PathBuf,

    /// Directory of JSON audit reports, one file per run
    #[arg(long, env = "SCOREGATE_REPORTS")]
    pub reports: PathBuf,

    /// Build output directory searched for the bundle artifact
    #[arg(long, env = "SCOREGATE_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Overrides `aggregation` from the goals file
    #[arg(long, value_enum)]
    pub aggregation: Option<AggregationArg>,

    /// JSON object of label -> report URL (e.g. .lighthouseci/links.json)
    #[arg(long)]
    pub links: Option<PathBuf>,

    /// Extra report link, repeatable
    #[arg(long = "link", value_name = "LABEL=URL", value_parser = parse_link)]
    pub link: Vec<(String, String)>,

    /// Write the markdown comment here instead of stdout
    #[arg(long)]
    pub pr_comment: Option<PathBuf>,

    #[arg(long, default_value = "summary.json")]
    pub summary: PathBuf,

    #[arg(long)]
    pub junit: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, default_value = "scoregate.yaml", env = "SCOREGATE_CONFIG")]
    pub config: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "scoregate.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing goals file
    #[arg(long)]
    pub force: bool,
}
