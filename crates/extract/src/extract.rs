//! Anchor discovery for rendered HTML pages.

use crate::consts;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use scraper::Html;
use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::instrument;

/// How anchors are located inside a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Extraction {
    /// Scan the raw text for `id="..."` pairs. Does not care whether the
    /// markup around the match is well-formed.
    #[default]
    Pattern,
    /// Parse the page into a DOM and read the `id` attribute of every
    /// element. Slower, but copes with single-quoted or unquoted attributes
    /// and decodes entities.
    Parsed,
}
impl Extraction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Parsed => "parsed",
        }
    }
}
impl Display for Extraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// The anchor identifiers defined by a single page.
///
/// Duplicates are dropped; identifiers keep the order in which they first
/// appear in the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchors {
    ids: Vec<String>,
}
impl Anchors {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
impl<S: Into<String>> FromIterator<S> for Anchors {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let ids = iter.into_iter().map(Into::into).filter(|id: &String| seen.insert(id.clone())).collect();
        Self { ids }
    }
}
impl IntoIterator for Anchors {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;
    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

/// Pulls anchor identifiers out of rendered pages.
///
/// Extraction is a pure function of the page text: it never touches the
/// filesystem and never fails on malformed markup.
///
/// # Examples
///
/// ```rust
/// use docmap_extract::{Extraction, Extractor};
///
/// let anchors = Extractor::new(Extraction::Pattern).extract(r#"<h2 id="intro">Intro</h2>"#);
/// assert!(anchors.contains("intro"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    strategy: Extraction,
}
impl Extractor {
    pub fn new(strategy: Extraction) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Extraction {
        self.strategy
    }

    /// Returns every anchor identifier declared in `html`.
    #[instrument(skip(self, html), fields(html_size = html.len(), strategy = %self.strategy))]
    pub fn extract(&self, html: &str) -> Anchors {
        let anchors = match self.strategy {
            Extraction::Pattern => Self::pattern(html),
            Extraction::Parsed => Self::parsed(html),
        };
        tracing::trace!(anchors = anchors.len(), "Extracted anchors from page");
        anchors
    }

    /// Same as [`extract`](Self::extract), but for raw page bytes.
    ///
    /// Unlike a browser, invalid UTF-8 is rejected rather than replaced:
    /// an anchor containing U+FFFD would be a redirect to nowhere.
    pub fn extract_bytes(&self, html: &[u8]) -> Result<Anchors> {
        let html = std::str::from_utf8(html).or_raise(|| ErrorKind::Encoding)?;
        Ok(self.extract(html))
    }

    fn pattern(html: &str) -> Anchors {
        consts::ID_ATTRIBUTE_REGEX
            .captures_iter(html)
            .filter_map(|captures| captures.get(1))
            .map(|id| id.as_str())
            .collect()
    }

    fn parsed(html: &str) -> Anchors {
        let document = Html::parse_document(html);
        document
            .select(&consts::ID_SELECTOR)
            .filter_map(|element| element.value().attr("id"))
            .filter(|id| !id.is_empty())
            .collect()
    }
}
impl From<Extraction> for Extractor {
    fn from(strategy: Extraction) -> Self {
        Self::new(strategy)
    }
}
