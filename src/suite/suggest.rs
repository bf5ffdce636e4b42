/// Fuzzy "did you mean" lookup for mistyped CLI tokens.
use nucleo_matcher::{
    Matcher, Utf32Str,
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
};

/// Best fuzzy match for `input` among `candidates`, if any candidate matches.
///
/// The input is matched literally as a fuzzy pattern; query syntax such as
/// `!`, `^`, `$` or `'` has no special meaning. Ties keep the earlier
/// candidate.
#[must_use]
pub fn suggest<I>(input: &str, candidates: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'static str>,
{
    let query = input.trim();
    if query.is_empty() {
        return None;
    }

    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );
    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);

    let mut scored: Vec<(&'static str, u32)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(candidate, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| (candidate, score))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.first().map(|(candidate, _)| *candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENS: [&str; 6] = ["all", "unit", "integration", "retrieval", "coverage", "quick"];

    #[test]
    fn test_missing_letter() {
        assert_eq!(suggest("covrage", TOKENS), Some("coverage"));
        assert_eq!(suggest("quik", TOKENS), Some("quick"));
    }

    #[test]
    fn test_prefix() {
        assert_eq!(suggest("integ", TOKENS), Some("integration"));
    }

    #[test]
    fn test_case_ignored() {
        assert_eq!(suggest("UNIT", TOKENS), Some("unit"));
    }

    #[test]
    fn test_query_syntax_is_literal() {
        assert_eq!(suggest("!unit", TOKENS), None);
        assert_eq!(suggest("^q", TOKENS), None);
        assert_eq!(suggest("all$", TOKENS), None);
        assert_eq!(suggest("'quick", TOKENS), None);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(suggest("bogus", TOKENS), None);
        assert_eq!(suggest("", TOKENS), None);
    }
}
