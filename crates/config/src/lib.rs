//! Layered configuration for a redirect generation run.
//!
//! Sources are merged in this order, later sources overriding earlier ones:
//!
//! 1. Compiled defaults ([`Config::default`]).
//! 2. `docmap.toml` in the platform configuration directory, if present.
//! 3. An explicitly requested file (TOML, YAML or JSON, by extension).
//! 4. `DOCMAP_`-prefixed environment variables; nested keys are separated
//!    by a double underscore (`DOCMAP_RENDERER__PROGRAM`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use docmap_extract::{Extraction, Extractor};
use docmap_redirects::{DEFAULT_OUTPUT, FilterPolicy, PROJECT_EXTENSION_PREFIX, RedirectSerializer, UPSTREAM_OPTION_PREFIX};
use docmap_render::{CommandRenderer, DEFAULT_PROGRAM};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "docmap.toml";
pub const ENV_PREFIX: &str = "DOCMAP_";
pub const DEFAULT_EXTENSION: &str = "html";

/// Order in which rendered pages are scanned. When two pages define the
/// same anchor, the page scanned last keeps it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Sorted by file name; the same input always produces the same winner.
    #[default]
    Lexicographic,
    /// Whatever order the operating system lists the directory in.
    Filesystem,
}
impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Lexicographic => write!(f, "lexicographic"),
            Self::Filesystem => write!(f, "filesystem"),
        }
    }
}

/// How to invoke the upstream documentation renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Executable name (looked up on `PATH`) or path.
    pub program: String,
    pub args: Vec<String>,
    /// Primary output artifact; appended as the last argument. Pages are
    /// scanned in its directory. When unset, the last argument is the
    /// output artifact.
    pub outfile: Option<PathBuf>,
    /// Arguments passed only while redirect validation is suspended.
    pub suspend_args: Vec<String>,
    /// Environment passed only while redirect validation is suspended.
    pub suspend_env: BTreeMap<String, String>,
}
impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: Vec::new(),
            outfile: None,
            suspend_args: Vec::new(),
            suspend_env: BTreeMap::new(),
        }
    }
}
impl RendererConfig {
    /// Builds the renderer, appending `extra_args` after the configured ones.
    pub fn command(&self, extra_args: &[String]) -> docmap_render::error::Result<CommandRenderer> {
        let mut renderer = CommandRenderer::discover(&self.program)?
            .with_args(self.args.iter().cloned())
            .with_args(extra_args.iter().cloned())
            .with_suspend_args(self.suspend_args.iter().cloned());
        for (key, value) in &self.suspend_env {
            renderer = renderer.with_suspend_env(key, value);
        }
        if let Some(outfile) = &self.outfile {
            renderer = renderer.with_outfile(outfile);
        }
        Ok(renderer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the redirect document is written.
    pub output: PathBuf,
    /// Extension (without the dot) of the rendered pages to scan.
    pub extension: String,
    /// Anchors starting with any of these are never exported.
    pub exclude_prefixes: Vec<String>,
    pub order: Order,
    pub extraction: Extraction,
    pub renderer: RendererConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            extension: DEFAULT_EXTENSION.to_string(),
            exclude_prefixes: vec![UPSTREAM_OPTION_PREFIX.to_string(), PROJECT_EXTENSION_PREFIX.to_string()],
            order: Order::default(),
            extraction: Extraction::default(),
            renderer: RendererConfig::default(),
        }
    }
}
impl Config {
    /// `docmap.toml` inside the platform configuration directory.
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "docmap").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// All configuration sources, merged but not yet extracted.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(user) = Self::user_config_path()
            && user.is_file()
        {
            tracing::debug!(path = %user.display(), "Merging user configuration");
            figment = figment.merge(Toml::file(user));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "Merging configuration file");
            figment = merge_file(figment, path)?;
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(explicit)?)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("output path is empty".to_string()));
        }
        if self.extension().is_empty() {
            exn::bail!(ErrorKind::Invalid("page extension is empty".to_string()));
        }
        if self.exclude_prefixes.iter().any(String::is_empty) {
            // An empty prefix matches every anchor.
            exn::bail!(ErrorKind::Invalid("empty exclude prefix".to_string()));
        }
        if self.renderer.program.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("renderer program is empty".to_string()));
        }
        Ok(())
    }

    /// Page extension, without any leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim().trim_start_matches('.')
    }

    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::new(self.exclude_prefixes.iter().cloned())
    }

    pub fn serializer(&self) -> RedirectSerializer {
        RedirectSerializer::new(&self.output)
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(self.extraction)
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        Some("yaml" | "yml") => Ok(figment.merge(Yaml::file(path))),
        Some("json") => Ok(figment.merge(Json::file(path))),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    fn from_toml(toml: &str) -> Result<Config> {
        Config::from_figment(Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml)))
    }

    #[test]
    fn defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output, PathBuf::from("out/redirects.json"));
        assert_eq!(config.extension(), "html");
        assert_eq!(config.order, Order::Lexicographic);
        assert_eq!(config.extraction, Extraction::Pattern);
        assert_eq!(config.renderer.program, "nixos-render-docs");
        assert!(config.filter_policy().is_excluded("opt-foo"));
        assert!(config.filter_policy().is_excluded("selfhostblock-bar"));
    }

    #[test]
    fn overrides_from_toml() {
        let config = from_toml(
            r#"
            output = "public/redirects.json"
            extension = ".htm"
            exclude_prefixes = ["internal-"]
            order = "filesystem"
            extraction = "parsed"

            [renderer]
            program = "render-docs"
            args = ["manual", "html"]
            outfile = "public/index.html"
            suspend_args = ["--skip-redirects"]
            suspend_env = { SKIP = "1" }
            "#,
        )
        .unwrap();
        assert_eq!(config.serializer().destination(), Path::new("public/redirects.json"));
        assert_eq!(config.extension(), "htm");
        assert!(!config.filter_policy().is_excluded("opt-foo"));
        assert!(config.filter_policy().is_excluded("internal-x"));
        assert_eq!(config.order, Order::Filesystem);
        assert_eq!(config.extractor().strategy(), Extraction::Parsed);
        assert_eq!(config.renderer.outfile, Some(PathBuf::from("public/index.html")));
        assert_eq!(config.renderer.suspend_env.get("SKIP").map(String::as_str), Some("1"));
    }

    #[rstest]
    #[case(r#"extension = """#)]
    #[case(r#"extension = ".""#)]
    #[case(r#"output = """#)]
    #[case(r#"exclude_prefixes = ["opt-", ""]"#)]
    #[case("renderer.program = \"  \"")]
    fn rejects_nonsense(#[case] toml: &str) {
        let err = from_toml(toml).unwrap_err();
        assert!(matches!(*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_enum_value() {
        let err = from_toml(r#"order = "random""#).unwrap_err();
        assert_eq!(*err, ErrorKind::Load);
    }

    #[test]
    fn explicit_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docmap.yaml");
        std::fs::write(&path, "output: site/redirects.json\nextraction: parsed\n").unwrap();
        let figment = Config::figment(Some(&path)).unwrap();
        let output: PathBuf = figment.extract_inner("output").unwrap();
        assert_eq!(output, PathBuf::from("site/redirects.json"));
        let extraction: Extraction = figment.extract_inner("extraction").unwrap();
        assert_eq!(extraction, Extraction::Parsed);
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::figment(Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }

    #[test]
    fn explicit_file_format_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docmap.ini");
        std::fs::write(&path, "output = x").unwrap();
        let err = Config::figment(Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::UnsupportedFormat(path));
    }

    #[test]
    fn renderer_not_installed() {
        let renderer = RendererConfig {
            program: "docmap-definitely-not-installed".to_string(),
            ..RendererConfig::default()
        };
        assert!(renderer.command(&[]).is_err());
    }
}
