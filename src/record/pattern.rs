use std::sync::LazyLock;

use regex::Regex;

/// Jeton de version : `v=` suivi de caractères non blancs, borné par `\b`.
static VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bv=\S+\b").expect("version tag pattern"));

/// Mécanisme catchall : `all` précédé d'au plus un caractère non blanc.
static CATCHALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S?all\b").expect("catchall pattern"));

/// Occurrence d'un motif dans un enregistrement SPF, offsets en octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl<'a> PatternMatch<'a> {
    fn from_regex(m: regex::Match<'a>) -> Self {
        Self {
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
        }
    }

    pub fn starts_record(&self) -> bool {
        self.start == 0
    }

    pub fn ends_record(&self, record: &str) -> bool {
        self.end == record.len()
    }

    /// First character of the match: the qualifier slot of a catchall, or the
    /// `a` of `all` when no qualifier precedes it.
    pub fn leading_char(&self) -> Option<char> {
        self.text.chars().next()
    }
}

pub fn version_tags(record: &str) -> Vec<PatternMatch<'_>> {
    VERSION_TAG
        .find_iter(record)
        .map(PatternMatch::from_regex)
        .collect()
}

pub fn catchalls(record: &str) -> Vec<PatternMatch<'_>> {
    CATCHALL
        .find_iter(record)
        .map(PatternMatch::from_regex)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_tag_stops_at_whitespace() {
        let found = version_tags("v=spf1 -all");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "v=spf1");
        assert!(found[0].starts_record());
    }

    #[test]
    fn version_tag_needs_word_boundary() {
        assert!(version_tags("xv=spf1 -all").is_empty());
    }

    #[test]
    fn catchall_captures_qualifier() {
        let record = "v=spf1 ~all";
        let found = catchalls(record);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "~all");
        assert_eq!(found[0].leading_char(), Some('~'));
        assert!(found[0].ends_record(record));
    }

    #[test]
    fn bare_catchall_leads_with_a() {
        let found = catchalls("v=spf1 all");
        assert_eq!(found[0].text, "all");
        assert_eq!(found[0].start, 7);
        assert_eq!(found[0].leading_char(), Some('a'));
    }

    #[test]
    fn catchall_inside_word_takes_previous_char() {
        let found = catchalls("v=spf1 fall");
        assert_eq!(found[0].text, "fall");
    }

    #[test]
    fn catchall_requires_trailing_boundary() {
        assert!(catchalls("v=spf1 include:allow.example").is_empty());
    }
}
