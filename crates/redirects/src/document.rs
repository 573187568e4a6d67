use crate::Filtered;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use std::collections::BTreeMap;

/// The exported redirect map: anchor identifier to the list of
/// `<page>#<anchor>` locators that currently host it.
///
/// Every entry currently carries exactly one locator; the list shape leaves
/// room for multi-target redirects without changing the format. Keys are
/// kept sorted so that identical input always serializes to identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RedirectDocument {
    entries: BTreeMap<String, Vec<String>>,
}
impl RedirectDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locators for `anchor`, if it was exported.
    pub fn targets(&self, anchor: &str) -> Option<&[String]> {
        self.entries.get(anchor).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Pretty-printed JSON with two-space indentation and no trailing newline.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).or_raise(|| ErrorKind::Encode)
    }
}
impl From<&Filtered<'_>> for RedirectDocument {
    fn from(filtered: &Filtered<'_>) -> Self {
        let entries = filtered
            .iter()
            .map(|(anchor, page)| (anchor.to_string(), vec![locator(page, anchor)]))
            .collect();
        Self { entries }
    }
}

fn locator(page: &str, anchor: &str) -> String {
    format!("{page}#{anchor}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FilterPolicy, MappingTable};

    fn document(pairs: &[(&str, &str)]) -> RedirectDocument {
        let mut table = MappingTable::new();
        for (anchor, page) in pairs {
            table.record(*anchor, *page);
        }
        RedirectDocument::from(&FilterPolicy::default().apply(&table))
    }

    #[test]
    fn empty_document_is_empty_object() {
        assert_eq!(RedirectDocument::new().to_json().unwrap(), "{}");
    }

    #[test]
    fn entries_are_singleton_locator_lists() {
        let doc = document(&[("intro", "a.html")]);
        assert_eq!(doc.targets("intro"), Some(&["a.html#intro".to_string()][..]));
        assert_eq!(doc.targets("missing"), None);
    }

    #[test]
    fn json_layout_is_sorted_and_indented() {
        let doc = document(&[("zeta", "b.html"), ("alpha", "a.html"), ("opt-x", "a.html")]);
        let expected = "{\n  \"alpha\": [\n    \"a.html#alpha\"\n  ],\n  \"zeta\": [\n    \"b.html#zeta\"\n  ]\n}";
        assert_eq!(doc.to_json().unwrap(), expected);
        assert_eq!(doc.anchors().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn identical_input_gives_identical_bytes() {
        let pairs = [("b", "two.html"), ("a", "one.html"), ("c", "one.html")];
        let mut reversed = pairs;
        reversed.reverse();
        assert_eq!(document(&pairs).to_json().unwrap(), document(&reversed).to_json().unwrap());
    }
}
