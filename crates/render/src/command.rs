use crate::Renderer;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::instrument;

/// The documentation renderer invoked when nothing else is configured.
pub const DEFAULT_PROGRAM: &str = "nixos-render-docs";

/// An external renderer executable.
///
/// The executable has no notion of "skip redirect validation" that can be
/// toggled from the outside, so it must expose one as a capability: extra
/// arguments and/or environment variables that are passed only while
/// validation is suspended.
///
/// Argument order: configured arguments, then the suspension arguments (if
/// suspended), then the output file.
///
/// Without an explicit [`with_outfile`](Self::with_outfile), the last
/// argument is taken to be the output file, the way `nixos-render-docs`
/// expects it (`manual html manual.md out/index.html`).
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: PathBuf,
    args: Vec<String>,
    outfile: Option<PathBuf>,
    suspend_args: Vec<String>,
    suspend_env: Vec<(String, String)>,
    validate: bool,
}
impl CommandRenderer {
    /// Uses `program` as-is, without checking that it exists.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            outfile: None,
            suspend_args: Vec::new(),
            suspend_env: Vec::new(),
            validate: true,
        }
    }

    /// Locates `program` on the `PATH` (or accepts it as a path to an
    /// executable).
    pub fn discover(program: impl AsRef<str>) -> Result<Self> {
        let program = program.as_ref();
        match which::which(program) {
            Ok(path) => {
                tracing::trace!(program, path = %path.display(), "Discovered renderer executable");
                Ok(Self::new(path))
            },
            Err(_) => exn::bail!(ErrorKind::RendererNotFound(program.to_string())),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The primary output artifact. It is passed as the final argument, and
    /// its directory is where the rendered pages are looked for.
    pub fn with_outfile(mut self, outfile: impl Into<PathBuf>) -> Self {
        self.outfile = Some(outfile.into());
        self
    }

    pub fn with_suspend_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suspend_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_suspend_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.suspend_env.push((key.into(), value.into()));
        self
    }

    /// Leading arguments and the output file, in the order they are passed.
    fn split_outfile(&self) -> (&[String], Option<&Path>) {
        match (&self.outfile, self.args.split_last()) {
            (Some(outfile), _) => (&self.args, Some(outfile.as_path())),
            (None, Some((last, leading))) => (leading, Some(Path::new(last))),
            (None, None) => (&[], None),
        }
    }

    pub(crate) fn command(&self) -> Command {
        let (leading, outfile) = self.split_outfile();
        let mut command = Command::new(&self.program);
        command.args(leading);
        if !self.validate {
            command.args(&self.suspend_args);
            command.envs(self.suspend_env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        if let Some(outfile) = outfile {
            command.arg(outfile);
        }
        // If the run is interrupted, the renderer goes down with it.
        command.kill_on_drop(true);
        command
    }
}

#[async_trait]
impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        self.program.file_name().and_then(|name| name.to_str()).unwrap_or(DEFAULT_PROGRAM)
    }

    fn output_dir(&self) -> PathBuf {
        match self.split_outfile().1.and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn redirect_validation(&self) -> bool {
        self.validate
    }

    fn set_redirect_validation(&mut self, enabled: bool) {
        self.validate = enabled;
    }

    #[instrument(skip_all, fields(program = %self.program.display(), validate = self.validate))]
    async fn render(&self) -> Result<()> {
        tracing::info!("Generating HTML documentation");
        let status = self.command().status().await.or_raise(|| ErrorKind::Io)?;
        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => exn::bail!(ErrorKind::RendererFailed(code)),
            None => exn::bail!(ErrorKind::Terminated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::ffi::OsStr;

    fn args(renderer: &CommandRenderer) -> Vec<String> {
        renderer.command().as_std().get_args().map(|arg| arg.to_string_lossy().into_owned()).collect()
    }

    fn sample() -> CommandRenderer {
        CommandRenderer::new("nixos-render-docs")
            .with_args(["manual", "html", "manual.md"])
            .with_suspend_args(["--no-redirect-check"])
            .with_suspend_env("DOCMAP_SKIP_REDIRECTS", "1")
            .with_outfile("out/index.html")
    }

    #[test]
    fn validating_command_has_no_suspension_flags() {
        let renderer = sample();
        assert_eq!(args(&renderer), vec!["manual", "html", "manual.md", "out/index.html"]);
        assert_eq!(renderer.command().as_std().get_envs().count(), 0);
    }

    #[test]
    fn suspended_command_carries_flags_and_env() {
        let mut renderer = sample();
        renderer.set_redirect_validation(false);
        assert_eq!(args(&renderer), vec!["manual", "html", "manual.md", "--no-redirect-check", "out/index.html"]);
        let command = renderer.command();
        let envs: Vec<_> = command.as_std().get_envs().collect();
        assert_eq!(envs, vec![(OsStr::new("DOCMAP_SKIP_REDIRECTS"), Some(OsStr::new("1")))]);
    }

    #[rstest]
    #[case(Some("out/index.html"), "out")]
    #[case(Some("index.html"), ".")]
    #[case(Some("/srv/docs/manual/index.html"), "/srv/docs/manual")]
    #[case(None, ".")]
    fn output_dir_follows_outfile(#[case] outfile: Option<&str>, #[case] expected: &str) {
        let mut renderer = CommandRenderer::new("render");
        if let Some(outfile) = outfile {
            renderer = renderer.with_outfile(outfile);
        }
        assert_eq!(renderer.output_dir(), PathBuf::from(expected));
    }

    #[test]
    fn trailing_argument_is_the_outfile() {
        let mut renderer = CommandRenderer::new("nixos-render-docs")
            .with_args(["manual", "html", "manual.md", "out/index.html"])
            .with_suspend_args(["--no-redirect-check"]);
        assert_eq!(renderer.output_dir(), PathBuf::from("out"));
        renderer.set_redirect_validation(false);
        assert_eq!(args(&renderer), vec!["manual", "html", "manual.md", "--no-redirect-check", "out/index.html"]);
    }

    #[test]
    fn explicit_outfile_wins_over_trailing_argument() {
        let renderer = CommandRenderer::new("nixos-render-docs")
            .with_args(["manual", "html", "manual.md", "build/other.html"])
            .with_outfile("out/index.html");
        assert_eq!(renderer.output_dir(), PathBuf::from("out"));
        assert_eq!(args(&renderer), vec!["manual", "html", "manual.md", "build/other.html", "out/index.html"]);
    }

    #[test]
    fn name_is_program_file_name() {
        assert_eq!(CommandRenderer::new("/usr/bin/nixos-render-docs").name(), "nixos-render-docs");
    }

    #[test]
    fn missing_program() {
        let err = CommandRenderer::discover("docmap-definitely-not-installed").unwrap_err();
        assert_eq!(*err, ErrorKind::RendererNotFound("docmap-definitely-not-installed".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "current_thread")]
    async fn exit_code_is_reported() {
        let ok = CommandRenderer::discover("sh").unwrap().with_args(["-c", "exit 0"]);
        ok.render().await.unwrap();
        let failing = CommandRenderer::discover("sh").unwrap().with_args(["-c", "exit 3"]);
        let err = failing.render().await.unwrap_err();
        assert_eq!(*err, ErrorKind::RendererFailed(3));
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "current_thread")]
    async fn suspension_env_reaches_the_renderer() {
        let mut renderer = CommandRenderer::discover("sh")
            .unwrap()
            .with_args(["-c", r#"test "$DOCMAP_SKIP_REDIRECTS" = 1"#])
            .with_suspend_env("DOCMAP_SKIP_REDIRECTS", "1");
        assert!(renderer.render().await.is_err());
        renderer.set_redirect_validation(false);
        renderer.render().await.unwrap();
    }
}
