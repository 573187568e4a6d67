//! A redirect generation run: render, scan, filter, serialize.
//!
//! Everything is strictly sequential. The only shared mutable state is the
//! run's [`MappingTable`](docmap_redirects::MappingTable), owned by the
//! [`Finalizer`] and lent to the [`Scanner`] while pages are read.

pub mod error;
mod finalize;
mod run;
pub mod scan;

pub use crate::finalize::{Finalizer, Report};
pub use crate::run::Run;
pub use crate::scan::{ScanSummary, Scanner};
