use std::collections::HashMap;

/// Run-scoped mapping from anchor identifier to the page that defines it.
///
/// Holds at most one page per anchor. Recording an anchor that is already
/// known replaces the page: the last call to [`record`](Self::record) wins,
/// so callers decide the winner of a cross-page collision purely through the
/// order in which they feed pages in.
///
/// A table is created empty for every run and handed to the scanning step;
/// there is no shared or global instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: HashMap<String, String>,
}
impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the page for `anchor`, returning the page that
    /// previously held it (if it was a different one).
    pub fn record(&mut self, anchor: impl Into<String>, page: impl Into<String>) -> Option<String> {
        let anchor = anchor.into();
        let page = page.into();
        match self.entries.insert(anchor, page.clone()) {
            Some(previous) if previous != page => Some(previous),
            _ => None,
        }
    }

    /// Records every anchor of a single page. Returns how many of them were
    /// taken over from a different page.
    pub fn record_page<I, S>(&mut self, page: &str, anchors: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut moved = 0;
        for anchor in anchors {
            let anchor = anchor.into();
            if let Some(previous) = self.record(anchor.as_str(), page) {
                tracing::debug!(anchor = %anchor, from = %previous, to = %page, "Anchor defined by more than one page");
                moved += 1;
            }
        }
        moved
    }

    pub fn get(&self, anchor: &str) -> Option<&str> {
        self.entries.get(anchor).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(anchor, page)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(anchor, page)| (anchor.as_str(), page.as_str()))
    }
}
