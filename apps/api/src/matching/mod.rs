//! Career matching engine: pure, synchronous stages shared by every request.
//!
//! Flow (driven by the orchestrator): skill_gap → course_scoring → learning_path →
//! insights → alignment. Nothing in here performs I/O; the only async piece is the
//! optional explanation enrichment in `explain`.

pub mod alignment;
pub mod archetypes;
pub mod config;
pub mod course_scoring;
pub mod explain;
pub mod insights;
pub mod learning_path;
pub mod prompts;
pub mod skill_gap;

/// Case-insensitive substring match in either direction. Empty strings never match.
pub fn fuzzy_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Whole-term search: `term` must appear in `text` without an alphanumeric character
/// directly before or after it. Both sides are compared lowercase.
///
/// Keeps "ai" from matching "maintain" and "java" from matching "javascript".
pub fn contains_term(text: &str, term: &str) -> bool {
    let text = text.to_lowercase();
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }

    let mut start = 0;
    while let Some(pos) = text[start..].find(&term) {
        let begin = start + pos;
        let end = begin + term.len();
        let before_ok = text[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + term.chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Rounds to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match_either_direction() {
        assert!(fuzzy_match("Python", "python programming"));
        assert!(fuzzy_match("Machine Learning Fundamentals", "machine learning"));
        assert!(!fuzzy_match("SQL", "Docker"));
    }

    #[test]
    fn test_fuzzy_match_rejects_empty() {
        assert!(!fuzzy_match("", "Python"));
        assert!(!fuzzy_match("  ", "Python"));
    }

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("Experience with AI and ML required", "ai"));
        assert!(!contains_term("Maintain legacy services", "ai"));
        assert!(!contains_term("Strong JavaScript skills", "java"));
        assert!(contains_term("Java, Spring Boot", "java"));
        assert!(contains_term("Node.js backends", "node.js"));
        assert!(contains_term("Modern C++ and CI/CD", "c++"));
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(33.333_333), 33.3);
        assert_eq!(round1(66.666_666), 66.7);
    }
}
