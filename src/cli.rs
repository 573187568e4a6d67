use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Map every anchor of a rendered documentation site to the page that
/// currently hosts it.
#[derive(Debug, Parser)]
#[command(name = "docmap", version, about)]
pub struct Cli {
    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Configuration file (TOML, YAML or JSON).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Where to write the redirect document.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Render the documentation, then map its anchors.
    Generate {
        /// Extra arguments for the renderer, after `--`.
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Map the anchors of an already rendered output directory.
    Scan {
        /// Directory holding the rendered pages.
        dir: PathBuf,
    },
}

impl Cli {
    /// Log level requested on the command line, if any. `None` defers to
    /// `RUST_LOG`.
    pub fn log_level(&self) -> Option<&'static str> {
        match (self.quiet, self.verbose) {
            (true, _) => Some("error"),
            (false, 0) => None,
            (false, 1) => Some("debug"),
            (false, _) => Some("trace"),
        }
    }
}
