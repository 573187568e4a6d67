use crate::error::{ErrorKind, Result};
use crate::scan::PageFile;
use docmap_extract::{Anchors, Extractor};
use exn::ResultExt;

/// Reads a single page and extracts its anchors.
pub async fn scan_file(extractor: &Extractor, page: &PageFile) -> Result<Anchors> {
    let bytes = tokio::fs::read(&page.path).await.or_raise(|| ErrorKind::Read(page.path.clone()))?;
    extractor.extract_bytes(&bytes).or_raise(|| ErrorKind::Decode(page.path.clone()))
}
