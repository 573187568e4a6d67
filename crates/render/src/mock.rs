//! In-process renderer for testing.

use crate::Renderer;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Renderer that writes a fixed set of pages into a directory.
///
/// It remembers whether redirect validation was enabled on each call to
/// [`render`](Renderer::render), and can be told to fail *after* writing its
/// pages, which is how a renderer that dies half-way looks to the pipeline.
///
/// # Examples
///
/// ```
/// use docmap_render::{MockRenderer, Renderer};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let renderer = MockRenderer::new(dir.path()).with_page("index.html", r#"<h1 id="top">Top</h1>"#);
/// renderer.render().await.unwrap();
/// assert!(dir.path().join("index.html").exists());
/// # Ok(())
/// # }
/// ```
pub struct MockRenderer {
    output_dir: PathBuf,
    pages: Vec<(String, Vec<u8>)>,
    failure: Option<i32>,
    validate: bool,
    observed: Mutex<Vec<bool>>,
}
impl MockRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            pages: Vec::new(),
            failure: None,
            validate: true,
            observed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.pages.push((name.into(), content.into()));
        self
    }

    /// Exit with `code` once all pages have been written.
    pub fn failing_with(mut self, code: i32) -> Self {
        self.failure = Some(code);
        self
    }

    /// Validation state seen by each render call, in call order.
    pub fn observed_validation(&self) -> Vec<bool> {
        self.observed.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    fn name(&self) -> &str {
        "mock"
    }

    fn output_dir(&self) -> PathBuf {
        self.output_dir.clone()
    }

    fn redirect_validation(&self) -> bool {
        self.validate
    }

    fn set_redirect_validation(&mut self, enabled: bool) {
        self.validate = enabled;
    }

    async fn render(&self) -> Result<()> {
        self.observed.lock().unwrap_or_else(PoisonError::into_inner).push(self.validate);
        tokio::fs::create_dir_all(&self.output_dir).await.or_raise(|| ErrorKind::Io)?;
        for (name, content) in &self.pages {
            tokio::fs::write(self.output_dir.join(name), content).await.or_raise(|| ErrorKind::Io)?;
        }
        if let Some(code) = self.failure {
            exn::bail!(ErrorKind::RendererFailed(code));
        }
        Ok(())
    }
}
