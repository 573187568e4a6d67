use std::future::pending;

/// Termination signals, listened for from the moment [`Shutdown::install`]
/// returns. A signal that arrives before anyone awaits [`recv`](Shutdown::recv)
/// is kept rather than killing the process.
pub struct Shutdown {
    #[cfg(unix)]
    streams: Option<(tokio::signal::unix::Signal, tokio::signal::unix::Signal)>,
    #[cfg(windows)]
    ctrl_c: Option<tokio::signal::windows::CtrlC>,
}
impl Shutdown {
    /// Must be called from within the runtime.
    ///
    /// If the handlers can't be installed the run simply can't be
    /// interrupted gracefully, and [`recv`](Self::recv) never resolves.
    pub fn install() -> Self {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let streams = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => Some((sigterm, sigint)),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!(error = %e, "Failed to install signal handlers");
                    None
                },
            };
            Self { streams }
        }
        #[cfg(windows)]
        {
            let ctrl_c = tokio::signal::windows::ctrl_c()
                .inspect_err(|e| tracing::warn!(error = %e, "Failed to install Ctrl-C handler"))
                .ok();
            Self { ctrl_c }
        }
        #[cfg(not(any(unix, windows)))]
        {
            Self {}
        }
    }

    /// Resolves on the first SIGINT or SIGTERM (Ctrl-C on Windows).
    pub async fn recv(self) {
        #[cfg(unix)]
        {
            if let Some((mut sigterm, mut sigint)) = self.streams {
                tokio::select! {
                    _ = sigterm.recv() => tracing::warn!("Received SIGTERM"),
                    _ = sigint.recv() => tracing::warn!("Received SIGINT"),
                }
                return;
            }
        }
        #[cfg(windows)]
        {
            if let Some(mut ctrl_c) = self.ctrl_c {
                ctrl_c.recv().await;
                tracing::warn!("Received Ctrl-C");
                return;
            }
        }
        pending::<()>().await;
    }
}
