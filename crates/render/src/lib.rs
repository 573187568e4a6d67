mod command;
pub mod error;
#[cfg(feature = "mock")]
mod mock;
mod suspend;

pub use crate::command::{CommandRenderer, DEFAULT_PROGRAM};
use crate::error::Result;
#[cfg(feature = "mock")]
pub use crate::mock::MockRenderer;
pub use crate::suspend::{SuspendedValidation, render_without_validation};
use async_trait::async_trait;
use std::path::PathBuf;

/// The upstream documentation renderer, seen through the narrow contract
/// the redirect pipeline depends on: it writes pages into a directory when
/// asked to, and its own redirect consistency check can be switched off.
///
/// The consistency check rejects anchors that have no known redirect yet.
/// Redirects are computed *from* the rendered output, so the check has to be
/// suspended while rendering for that purpose; see [`SuspendedValidation`].
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Name of the renderer, for logging only.
    fn name(&self) -> &str;

    /// Directory the primary output artifact is written into. Every page the
    /// renderer produces lands here.
    fn output_dir(&self) -> PathBuf;

    /// Whether the next [`render`](Self::render) validates redirects.
    fn redirect_validation(&self) -> bool;

    fn set_redirect_validation(&mut self, enabled: bool);

    /// Runs the renderer to completion.
    async fn render(&self) -> Result<()>;
}
