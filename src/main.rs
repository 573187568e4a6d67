mod cli;
mod error;
mod logging;
mod signal;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use crate::signal::Shutdown;
use clap::Parser;
use docmap_config::Config;
use docmap_pipeline::{Report, Run};
use exn::ResultExt;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level());
    match execute(cli) {
        Ok(report) => {
            tracing::info!(
                redirects = report.exported,
                filtered = report.filtered,
                pages = report.pages.discovered,
                failed = report.pages.failed,
                "{}",
                headline(&report)
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(error = ?e, retryable = e.is_retryable(), "Redirect generation failed");
            ExitCode::FAILURE
        },
    }
}

fn headline(report: &Report) -> String {
    format!("Generated {}", report.path.display())
}

fn execute(cli: Cli) -> Result<Report> {
    // Strictly sequential work; one thread is all it needs.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .or_raise(|| ErrorKind::Runtime)?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<Report> {
    // Installed first, so a signal during startup interrupts the run
    // instead of killing the process.
    let shutdown = Shutdown::install();
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(output) = cli.output {
        config.output = output;
        config.validate().or_raise(|| ErrorKind::Config)?;
    }
    // Created before the renderer is looked up: from here on, a redirect
    // document gets written no matter how the run ends.
    let generation = Run::from_config(&config);
    match cli.command {
        Command::Generate { args } => {
            let mut renderer = config.renderer.command(&args).or_raise(|| ErrorKind::Renderer)?;
            generation.generate(&mut renderer, shutdown.recv()).await.or_raise(|| ErrorKind::Run)
        },
        Command::Scan { dir } => generation.scan(&dir, shutdown.recv()).await.or_raise(|| ErrorKind::Run),
    }
}
