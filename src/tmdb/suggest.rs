//! Misspelling suggestions over search-result titles.
//!
//! Ratcliff/Obershelp similarity: find the longest common substring,
//! recurse on the pieces left of it and right of it, and score
//! `2 * matches / total length`. A candidate needs at least 0.6 to be
//! offered as a suggestion.

const CUTOFF: f64 = 0.6;

/// Pick the candidate title closest to `query`, if any is close enough.
pub fn closest_title<'a, I>(query: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(f64, &str)> = None;
    for candidate in candidates {
        let score = ratio(query, candidate);
        if score >= CUTOFF && best.map(|(s, _)| score > s).unwrap_or(true) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, title)| title.to_string())
}

/// Similarity ratio in `[0, 1]`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matches = matching_chars(&a, &b);
    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..ai], &b[..bi]) + matching_chars(&a[ai + len..], &b[bi + len..])
}

/// Longest common substring as `(start_in_a, start_in_b, length)`.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                row[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = row;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(ratio("inception", "inception"), 1.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_close_match_scores_high() {
        assert!(ratio("incepton", "inception") > 0.9);
        assert!(ratio("the matriks", "the matrix") > 0.8);
    }

    #[test]
    fn test_closest_title_picks_best_candidate() {
        let candidates = ["Inception", "Interstellar", "Insidious"];
        let suggestion = closest_title("Inceptoin", candidates);
        assert_eq!(suggestion.as_deref(), Some("Inception"));
    }

    #[test]
    fn test_closest_title_respects_cutoff() {
        let candidates = ["Completely Different Film"];
        assert_eq!(closest_title("xyz", candidates), None);
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(closest_title("anything", []), None);
    }
}
