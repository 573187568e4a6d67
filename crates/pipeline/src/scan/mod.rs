mod enumerate;
mod file;

pub use self::enumerate::{PageFile, enumerate};
pub use self::file::scan_file;
use crate::error::Result;
use docmap_config::{Config, DEFAULT_EXTENSION, Order};
use docmap_extract::Extractor;
use docmap_redirects::MappingTable;
use std::path::Path;
use tracing::instrument;

/// Counters for a single pass over an output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Pages found in the directory.
    pub discovered: usize,
    /// Pages read and scanned.
    pub scanned: usize,
    /// Pages skipped because they could not be read or decoded.
    pub failed: usize,
    /// Anchors recorded, summed over all scanned pages.
    pub anchors: usize,
}

/// Drives the [`Extractor`] over every page of an output directory and
/// feeds the results into a [`MappingTable`].
#[derive(Debug, Clone)]
pub struct Scanner {
    extractor: Extractor,
    extension: String,
    order: Order,
}
impl Default for Scanner {
    fn default() -> Self {
        Self::new(Extractor::default(), DEFAULT_EXTENSION, Order::default())
    }
}
impl Scanner {
    pub fn new(extractor: Extractor, extension: impl Into<String>, order: Order) -> Self {
        Self {
            extractor,
            extension: extension.into(),
            order,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.extractor(), config.extension(), config.order)
    }

    /// Records the anchors of every page in `dir`, in the configured order.
    ///
    /// A page that cannot be read is logged and skipped; it never aborts the
    /// scan. If the surrounding future is dropped part-way, `table` keeps
    /// everything recorded up to that point.
    #[instrument(skip(self, table), fields(dir = %dir.display()))]
    pub async fn scan(&self, dir: &Path, table: &mut MappingTable) -> Result<ScanSummary> {
        let pages = enumerate(dir, &self.extension, self.order).await?;
        tracing::info!(files = pages.len(), order = %self.order, "Discovered rendered pages");
        let mut summary = ScanSummary {
            discovered: pages.len(),
            ..ScanSummary::default()
        };
        for page in pages {
            let anchors = match scan_file(&self.extractor, &page).await {
                Ok(anchors) => anchors,
                Err(e) => {
                    tracing::error!(path = %page.path.display(), error = ?e, "Failed to scan page");
                    summary.failed += 1;
                    continue;
                },
            };
            if !anchors.is_empty() {
                tracing::debug!(page = %page.name, anchors = anchors.len(), "Found anchors");
            }
            summary.scanned += 1;
            summary.anchors += anchors.len();
            table.record_page(&page.name, anchors);
        }
        tracing::info!(mappings = table.len(), failed = summary.failed, "Scanned anchor mappings");
        Ok(summary)
    }
}
