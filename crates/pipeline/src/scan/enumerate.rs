use crate::error::{ErrorKind, Result};
use docmap_config::Order;
use exn::ResultExt;
use std::path::{Path, PathBuf};

/// A rendered page, identified by its file name inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    /// File name relative to the output directory; this is what redirects
    /// point at.
    pub name: String,
    pub path: PathBuf,
}

/// Lists the pages directly inside `dir` whose extension matches
/// `extension` (case-insensitively). Subdirectories are not descended into.
///
/// A missing directory is not an error: nothing was rendered, so there is
/// nothing to scan. A directory whose existence can't be determined is.
pub async fn enumerate(dir: &Path, extension: &str, order: Order) -> Result<Vec<PageFile>> {
    let raise = || ErrorKind::Enumerate(dir.to_path_buf());
    if !tokio::fs::try_exists(dir).await.or_raise(raise)? {
        tracing::warn!(dir = %dir.display(), "Output directory does not exist");
        return Ok(Vec::new());
    }
    let mut entries = tokio::fs::read_dir(dir).await.or_raise(raise)?;
    let mut pages = Vec::new();
    while let Some(entry) = entries.next_entry().await.or_raise(raise)? {
        let path = entry.path();
        if !has_extension(&path, extension) {
            continue;
        }
        // Follows symlinks; a link to a page is still a page.
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {},
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable directory entry");
                continue;
            },
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!(path = %path.display(), "Skipping page with a non UTF-8 file name");
            continue;
        };
        pages.push(PageFile { name, path });
    }
    if order == Order::Lexicographic {
        pages.sort_by(|a, b| a.name.cmp(&b.name));
    }
    Ok(pages)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
