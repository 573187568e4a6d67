use crate::error::{ErrorKind, Result};
use crate::scan::ScanSummary;
use docmap_config::Config;
use docmap_redirects::{FilterPolicy, MappingTable, RedirectDocument, RedirectSerializer};
use exn::ResultExt;
use std::path::PathBuf;
use tracing::instrument;

/// What the finalizer wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Anchors in the mapping table.
    pub mapped: usize,
    /// Anchors written to the redirect document.
    pub exported: usize,
    /// Anchors held back by the filter policy.
    pub filtered: usize,
    pub path: PathBuf,
    /// Page counters of the scan that filled the table. Left at zero when
    /// the table was filled by hand.
    pub pages: ScanSummary,
}

/// Pending "filter and serialize" step of a run, holding the run's
/// [`MappingTable`].
///
/// The step runs exactly once: either explicitly through
/// [`finish`](Self::finish), or from [`Drop`] if the finalizer goes away
/// without being finished (a panic, or a cancelled run future). A document
/// built from a partial scan is preferable to no document at all.
#[derive(Debug)]
pub struct Finalizer {
    table: MappingTable,
    policy: FilterPolicy,
    serializer: RedirectSerializer,
    spent: bool,
}
impl Finalizer {
    pub fn new(policy: FilterPolicy, serializer: RedirectSerializer) -> Self {
        Self {
            table: MappingTable::new(),
            policy,
            serializer,
            spent: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.filter_policy(), config.serializer())
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut MappingTable {
        &mut self.table
    }

    /// Filters the table and writes the redirect document.
    pub fn finish(mut self) -> Result<Report> {
        self.spent = true;
        self.finalize()
    }

    #[instrument(skip(self), fields(path = %self.serializer.destination().display()))]
    fn finalize(&mut self) -> Result<Report> {
        let table = std::mem::take(&mut self.table);
        if table.is_empty() {
            tracing::warn!("No anchor mappings available; writing an empty redirect document");
        } else {
            tracing::info!(mappings = table.len(), "Creating redirects from mappings");
        }
        let filtered = self.policy.apply(&table);
        tracing::info!(redirects = filtered.len(), filtered = filtered.excluded(), "Generated redirects");
        let document = RedirectDocument::from(&filtered);
        if let Err(e) = self.serializer.write(&document) {
            tracing::error!(error = ?e, "Failed to write redirect document");
            return Err(e).or_raise(|| ErrorKind::Write);
        }
        tracing::info!(redirects = document.len(), "Wrote redirect document");
        Ok(Report {
            mapped: table.len(),
            exported: document.len(),
            filtered: filtered.excluded(),
            path: self.serializer.destination().to_path_buf(),
            pages: ScanSummary::default(),
        })
    }
}
impl Drop for Finalizer {
    fn drop(&mut self) {
        if self.spent {
            return;
        }
        self.spent = true;
        tracing::warn!("Run ended without finishing; writing collected redirects");
        // Errors are already logged; there is nobody left to return them to.
        let _ = self.finalize();
    }
}
