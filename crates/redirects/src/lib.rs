//! From discovered anchors to a persisted redirect map.
//!
//! Anchors are recorded into a [`MappingTable`] while pages are scanned,
//! narrowed down by a [`FilterPolicy`], turned into a [`RedirectDocument`]
//! and written by a [`RedirectSerializer`].

mod document;
pub mod error;
mod filter;
mod serializer;
mod table;

pub use crate::document::RedirectDocument;
pub use crate::filter::{FilterPolicy, Filtered, PROJECT_EXTENSION_PREFIX, UPSTREAM_OPTION_PREFIX};
pub use crate::serializer::{DEFAULT_OUTPUT, RedirectSerializer};
pub use crate::table::MappingTable;
