use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "adx")]
#[command(about = "Extract structured API documentation from source comments")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build documentation models and emit them as JSON
    Extract {
        /// Files or directories to scan (defaults to the configured source dirs)
        paths: Vec<PathBuf>,

        /// Force a language adapter instead of selecting by extension
        #[arg(short, long)]
        lang: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report orphaned comments, malformed comments and doc mismatches
    Check {
        /// Files or directories to scan (defaults to the configured source dirs)
        paths: Vec<PathBuf>,

        /// Force a language adapter instead of selecting by extension
        #[arg(short, long)]
        lang: Option<String>,

        /// Fail on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },

    /// List registered language adapters
    Languages,

    /// Write a default adx.toml
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Extract { paths, lang, output } => {
                engine.extract(paths, lang, output).await
            }
            Commands::Check { paths, lang, strict } => {
                engine.check(paths, lang, strict).await
            }
            Commands::Languages => {
                engine.languages().await
            }
            Commands::Init { path } => {
                engine.init(path).await
            }
        }
    }
}
