use crate::MappingTable;
use std::collections::BTreeMap;

/// Anchors generated per configuration option by the upstream options
/// renderer. They are validated through a separate mechanism.
pub const UPSTREAM_OPTION_PREFIX: &str = "opt-";
/// Anchors introduced by this project's own option extensions.
pub const PROJECT_EXTENSION_PREFIX: &str = "selfhostblock";

/// Decides which anchors are published as stable redirect targets.
///
/// An anchor is excluded when it starts with any of the configured prefixes;
/// every other anchor is exported. The policy never looks at the page an
/// anchor lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    exclude_prefixes: Vec<String>,
}
impl Default for FilterPolicy {
    fn default() -> Self {
        Self::new([UPSTREAM_OPTION_PREFIX, PROJECT_EXTENSION_PREFIX])
    }
}
impl FilterPolicy {
    pub fn new(exclude_prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            exclude_prefixes: exclude_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy that exports everything.
    pub fn allow_all() -> Self {
        Self::new(std::iter::empty::<String>())
    }

    pub fn exclude_prefixes(&self) -> &[String] {
        &self.exclude_prefixes
    }

    pub fn is_excluded(&self, anchor: &str) -> bool {
        self.exclude_prefixes.iter().any(|prefix| anchor.starts_with(prefix.as_str()))
    }

    /// Splits the table into exportable entries (sorted by anchor) and a
    /// count of the excluded ones.
    pub fn apply<'a>(&self, table: &'a MappingTable) -> Filtered<'a> {
        let mut entries = BTreeMap::new();
        let mut excluded = 0;
        for (anchor, page) in table.iter() {
            if self.is_excluded(anchor) {
                excluded += 1;
            } else {
                entries.insert(anchor, page);
            }
        }
        Filtered { entries, excluded }
    }
}

/// The exportable subset of a [`MappingTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered<'a> {
    entries: BTreeMap<&'a str, &'a str>,
    excluded: usize,
}
impl<'a> Filtered<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of anchors the policy held back.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// `(anchor, page)` pairs in ascending anchor order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.entries.iter().map(|(anchor, page)| (*anchor, *page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("opt-services.nginx.enable", true)]
    #[case("opt-", true)]
    #[case("selfhostblock", true)]
    #[case("selfhostblock-bar", true)]
    #[case("selfhostblocks.nextcloud", true)]
    #[case("intro", false)]
    #[case("options", false)]
    #[case("my-opt-thing", false)]
    #[case("", false)]
    fn default_policy(#[case] anchor: &str, #[case] excluded: bool) {
        assert_eq!(FilterPolicy::default().is_excluded(anchor), excluded);
    }

    #[test]
    fn allow_all_excludes_nothing() {
        let policy = FilterPolicy::allow_all();
        assert!(!policy.is_excluded("opt-foo"));
        assert!(policy.exclude_prefixes().is_empty());
    }

    #[test]
    fn apply_counts_and_sorts() {
        let mut table = MappingTable::new();
        table.record("zeta", "b.html");
        table.record("opt-foo", "b.html");
        table.record("alpha", "a.html");
        table.record("selfhostblock-bar", "c.html");

        let filtered = FilterPolicy::default().apply(&table);
        assert_eq!(filtered.excluded(), 2);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.iter().collect::<Vec<_>>(), vec![("alpha", "a.html"), ("zeta", "b.html")]);
    }

    #[test]
    fn apply_to_empty_table() {
        let table = MappingTable::new();
        let filtered = FilterPolicy::default().apply(&table);
        assert!(filtered.is_empty());
        assert_eq!(filtered.excluded(), 0);
    }
}
