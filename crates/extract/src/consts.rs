use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// The renderer always emits double-quoted attributes, so a plain scan for
// `id="..."` finds every anchor without building a DOM.
regex!(ID_ATTRIBUTE_REGEX, r#"id="([^"]+)""#);
// Every element carrying an `id`, for the parsing strategy.
selector!(ID_SELECTOR, "[id]");
