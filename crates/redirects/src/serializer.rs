use crate::RedirectDocument;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::instrument;

/// Where the redirect document lands unless configured otherwise.
pub const DEFAULT_OUTPUT: &str = "out/redirects.json";

/// Persists a [`RedirectDocument`] to a fixed destination.
///
/// The whole document is encoded in memory first, written to a temporary
/// file next to the destination and then renamed over it. Readers either see
/// the previous document or the new one, never a truncated mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSerializer {
    destination: PathBuf,
}
impl Default for RedirectSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT)
    }
}
impl RedirectSerializer {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Writes `document`, creating the destination directory if needed.
    #[instrument(skip_all, fields(path = %self.destination.display(), redirects = document.len()))]
    pub fn write(&self, document: &RedirectDocument) -> Result<()> {
        let json = document.to_json()?;
        let destination = self.destination.as_path();
        if destination.file_name().is_none() || destination.is_dir() {
            exn::bail!(ErrorKind::InvalidDestination(destination.to_path_buf()));
        }
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let raise = || ErrorKind::Write(destination.to_path_buf());
        std::fs::create_dir_all(parent).or_raise(raise)?;
        let mut tmp = NamedTempFile::new_in(parent).or_raise(raise)?;
        tmp.write_all(json.as_bytes()).or_raise(raise)?;
        tmp.as_file().sync_all().or_raise(raise)?;
        #[cfg(unix)]
        {
            // Temporary files are created owner-only; the document is meant
            // to be served.
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o644);
            tmp.as_file().set_permissions(permissions).or_raise(raise)?;
        }
        tmp.persist(destination).or_raise(raise)?;
        tracing::debug!(bytes = json.len(), "Redirect document persisted");
        Ok(())
    }
}
