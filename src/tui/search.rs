//! Repository name filtering for the search bar
//!
//! Matching is a case-insensitive substring test. The result distinguishes
//! "no filter applied" from "filter applied, nothing matched" so the
//! repositories pane can render the right empty state.

/// Result of applying a search query to the repository names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterOutcome {
    /// The query is empty; show every repository
    #[default]
    Unfiltered,
    /// Matching names, in their original relative order
    Matches(Vec<String>),
    /// The query matched nothing
    NoMatches,
}

impl FilterOutcome {
    /// Resolve the outcome against the full list it was computed from
    pub fn resolve<'a>(&'a self, all: &'a [String]) -> &'a [String] {
        match self {
            FilterOutcome::Unfiltered => all,
            FilterOutcome::Matches(names) => names,
            FilterOutcome::NoMatches => &[],
        }
    }

    pub fn is_filtered(&self) -> bool {
        !matches!(self, FilterOutcome::Unfiltered)
    }
}

/// Filter `items` by `query`.
pub fn filter(items: &[String], query: &str) -> FilterOutcome {
    let query = query.trim();
    if query.is_empty() {
        return FilterOutcome::Unfiltered;
    }

    let needle = query.to_lowercase();
    let matches: Vec<String> = items
        .iter()
        .filter(|item| item.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if matches.is_empty() {
        FilterOutcome::NoMatches
    } else {
        FilterOutcome::Matches(matches)
    }
}

/// Byte range of the first match of `query` in `item`, for highlighting.
///
/// Returns `None` when lowercasing changes the byte layout of `item`, since
/// offsets into the lowercased text would not line up with the original.
pub fn match_span(item: &str, query: &str) -> Option<(usize, usize)> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let haystack = item.to_lowercase();
    if haystack.len() != item.len() {
        return None;
    }
    let needle = query.to_lowercase();
    haystack
        .find(&needle)
        .map(|start| (start, start + needle.len()))
        .filter(|&(start, end)| item.is_char_boundary(start) && item.is_char_boundary(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        ["alpha", "beta", "gamma"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_empty_query_is_unfiltered() {
        assert_eq!(filter(&names(), ""), FilterOutcome::Unfiltered);
        assert_eq!(filter(&names(), "   "), FilterOutcome::Unfiltered);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(
            filter(&names(), "al"),
            FilterOutcome::Matches(vec!["alpha".to_string()])
        );
    }

    #[test]
    fn test_case_insensitive_and_ordered() {
        let items = vec![
            "web/Frontend".to_string(),
            "api".to_string(),
            "web/backend".to_string(),
        ];
        assert_eq!(
            filter(&items, "WEB"),
            FilterOutcome::Matches(vec!["web/Frontend".to_string(), "web/backend".to_string()])
        );
    }

    #[test]
    fn test_no_matches() {
        assert_eq!(filter(&names(), "zzz"), FilterOutcome::NoMatches);
        assert!(filter(&names(), "zzz").resolve(&names()).is_empty());
    }

    #[test]
    fn test_resolve_unfiltered_returns_all() {
        let all = names();
        assert_eq!(FilterOutcome::Unfiltered.resolve(&all), all.as_slice());
    }

    #[test]
    fn test_match_span() {
        assert_eq!(match_span("Gamma", "MM"), Some((2, 4)));
        assert_eq!(match_span("gamma", "x"), None);
        assert_eq!(match_span("gamma", ""), None);
    }
}
