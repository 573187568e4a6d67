use crate::Renderer;
use crate::error::Result;
use std::ops::{Deref, DerefMut};
use tracing::instrument;

/// Scoped suspension of a renderer's redirect validation.
///
/// Acquiring the guard remembers the current setting and disables
/// validation; dropping it puts the remembered setting back. Because the
/// restore lives in [`Drop`], it also happens when rendering fails, panics,
/// or the surrounding future is cancelled.
pub struct SuspendedValidation<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    previous: bool,
}
impl<'a, R: Renderer + ?Sized> SuspendedValidation<'a, R> {
    pub fn new(renderer: &'a mut R) -> Self {
        let previous = renderer.redirect_validation();
        renderer.set_redirect_validation(false);
        tracing::debug!(renderer = renderer.name(), "Redirect validation suspended");
        Self { renderer, previous }
    }
}
impl<R: Renderer + ?Sized> Deref for SuspendedValidation<'_, R> {
    type Target = R;
    fn deref(&self) -> &Self::Target {
        self.renderer
    }
}
impl<R: Renderer + ?Sized> DerefMut for SuspendedValidation<'_, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.renderer
    }
}
impl<R: Renderer + ?Sized> Drop for SuspendedValidation<'_, R> {
    fn drop(&mut self) {
        self.renderer.set_redirect_validation(self.previous);
        tracing::debug!(renderer = self.renderer.name(), enabled = self.previous, "Redirect validation restored");
    }
}

/// Renders once with redirect validation suspended for exactly that call.
#[instrument(skip_all, fields(renderer = renderer.name()))]
pub async fn render_without_validation<R: Renderer + ?Sized>(renderer: &mut R) -> Result<()> {
    let guard = SuspendedValidation::new(renderer);
    guard.render().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Toggle {
        validate: bool,
        seen_during_render: AtomicBool,
        fail: bool,
    }
    impl Toggle {
        fn new(validate: bool, fail: bool) -> Self {
            Self {
                validate,
                seen_during_render: AtomicBool::new(validate),
                fail,
            }
        }
    }

    #[async_trait]
    impl Renderer for Toggle {
        fn name(&self) -> &str {
            "toggle"
        }

        fn output_dir(&self) -> PathBuf {
            PathBuf::from(".")
        }

        fn redirect_validation(&self) -> bool {
            self.validate
        }

        fn set_redirect_validation(&mut self, enabled: bool) {
            self.validate = enabled;
        }

        async fn render(&self) -> Result<()> {
            self.seen_during_render.store(self.validate, Ordering::SeqCst);
            if self.fail {
                exn::bail!(ErrorKind::RendererFailed(2));
            }
            Ok(())
        }
    }

    #[test]
    fn guard_disables_then_restores() {
        let mut toggle = Toggle::new(true, false);
        {
            let guard = SuspendedValidation::new(&mut toggle);
            assert!(!guard.redirect_validation());
        }
        assert!(toggle.redirect_validation());
    }

    #[test]
    fn guard_restores_previous_disabled_state() {
        let mut toggle = Toggle::new(false, false);
        drop(SuspendedValidation::new(&mut toggle));
        assert!(!toggle.redirect_validation());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn render_sees_validation_disabled() {
        let mut toggle = Toggle::new(true, false);
        render_without_validation(&mut toggle).await.unwrap();
        assert!(!toggle.seen_during_render.load(Ordering::SeqCst));
        assert!(toggle.redirect_validation());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn validation_restored_after_failure() {
        let mut toggle = Toggle::new(true, true);
        let err = render_without_validation(&mut toggle).await.unwrap_err();
        assert_eq!(*err, ErrorKind::RendererFailed(2));
        assert!(toggle.redirect_validation());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn works_through_trait_objects() {
        let mut boxed: Box<dyn Renderer> = Box::new(Toggle::new(true, false));
        render_without_validation(boxed.as_mut()).await.unwrap();
        assert!(boxed.redirect_validation());
    }
}
