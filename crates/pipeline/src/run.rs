use crate::error::{ErrorKind, Result};
use crate::finalize::{Finalizer, Report};
use crate::scan::{ScanSummary, Scanner};
use docmap_config::Config;
use docmap_redirects::MappingTable;
use docmap_render::{Renderer, render_without_validation};
use exn::ResultExt;
use std::future::Future;
use std::path::Path;
use tracing::instrument;

/// One end-to-end redirect generation run.
///
/// Every run starts from an empty [`MappingTable`]; nothing survives from
/// one run to the next. Whatever happens between start and finish (the
/// renderer failing, a termination signal, a page that can't be read), the
/// redirect document is written exactly once with everything collected so
/// far.
#[derive(Debug)]
pub struct Run {
    scanner: Scanner,
    finalizer: Finalizer,
}
impl Run {
    pub fn new(scanner: Scanner, finalizer: Finalizer) -> Self {
        Self { scanner, finalizer }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Scanner::from_config(config), Finalizer::from_config(config))
    }

    /// Renders the documentation with redirect validation suspended, scans
    /// the renderer's output directory and writes the redirect document.
    ///
    /// If `shutdown` resolves first, the run stops at its next await point
    /// and the document reflects whatever was scanned until then.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Render`] if the renderer failed (no pages are scanned),
    /// - [`ErrorKind::Enumerate`] if the output directory could not be listed,
    /// - [`ErrorKind::Interrupted`] if `shutdown` fired,
    /// - [`ErrorKind::Write`] if the document could not be written.
    ///
    /// The document is written in all cases except the last.
    #[instrument(skip_all, fields(renderer = renderer.name()))]
    pub async fn generate<R>(self, renderer: &mut R, shutdown: impl Future<Output = ()>) -> Result<Report>
    where
        R: Renderer + ?Sized,
    {
        let Self { scanner, mut finalizer } = self;
        let outcome = tokio::select! {
            outcome = render_and_scan(renderer, &scanner, finalizer.table_mut()) => outcome,
            () = shutdown => interrupted(),
        };
        conclude(finalizer, outcome)
    }

    /// Scans an already rendered output directory and writes the redirect
    /// document, without invoking any renderer.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub async fn scan(self, dir: &Path, shutdown: impl Future<Output = ()>) -> Result<Report> {
        let Self { scanner, mut finalizer } = self;
        let outcome = tokio::select! {
            outcome = scanner.scan(dir, finalizer.table_mut()) => outcome,
            () = shutdown => interrupted(),
        };
        conclude(finalizer, outcome)
    }
}

async fn render_and_scan<R>(renderer: &mut R, scanner: &Scanner, table: &mut MappingTable) -> Result<ScanSummary>
where
    R: Renderer + ?Sized,
{
    render_without_validation(renderer).await.or_raise(|| ErrorKind::Render)?;
    let dir = renderer.output_dir();
    scanner.scan(&dir, table).await
}

fn interrupted() -> Result<ScanSummary> {
    tracing::warn!("Interrupted; writing redirects collected so far");
    exn::bail!(ErrorKind::Interrupted);
}

fn conclude(finalizer: Finalizer, outcome: Result<ScanSummary>) -> Result<Report> {
    let written = finalizer.finish();
    // The run's own failure takes precedence; a write failure has already
    // been logged by the finalizer.
    let pages = outcome?;
    Ok(Report { pages, ..written? })
}
