//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doctemplate")]
#[command(version, about = "Fill placeholders in documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill templates and write the filled documents
    Fill(FillArgs),

    /// List the placeholders of a template without filling it
    Scan {
        /// Template document
        template: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Saved values management
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Args)]
pub struct FillArgs {
    /// Template documents, processed in order
    #[arg(short, long = "template", value_name = "TEMPLATE", required = true, num_args = 1..)]
    pub templates: Vec<PathBuf>,

    /// Save entered values next to each template for later runs
    #[arg(short, long)]
    pub save: bool,

    /// Write filled documents to this directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Answer a value in advance
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Do not read saved values
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show the values saved for a template
    Show {
        /// Template document
        template: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the values saved for a template
    Clear {
        /// Template document
        template: PathBuf,
    },
}
