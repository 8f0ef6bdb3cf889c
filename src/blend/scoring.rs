//! Blend scoring.
//!
//! Each per-listener explanation is reduced to a strength in `[0, 1]`, then
//! the two strengths are combined as `mean * (1 + min/max) / 2`. Equal weight
//! for both listeners; the balance factor pulls one-sided candidates down so
//! a song that fits both always outranks one that fits only one.

use crate::blend::types::{AffinityLevel, BlendCandidate};

const STRONG_MARKERS: &[&str] = &[
    "perfect",
    "love",
    "favorite",
    "favourite",
    "exactly",
    "strongly",
    "obsess",
    "huge fan",
    "signature",
    "right up",
    "staple",
];

const HEDGE_MARKERS: &[&str] = &[
    "might",
    "maybe",
    "could",
    "somewhat",
    "slightly",
    "a bit",
    "stretch",
    "outside",
    "new territory",
];

const NEGATIONS: &[&str] = &["not", "never", "no", "dont", "doesnt", "isnt", "wont"];

const ABSENT_MARKERS: &[&str] = &["none", "n/a", "-", "no connection", "not applicable"];

/// Band a free-text affinity explanation.
pub fn classify_affinity(text: &str) -> AffinityLevel {
    let text = text.trim().to_lowercase().replace('\u{2019}', "'");
    if text.is_empty() || ABSENT_MARKERS.contains(&text.as_str()) {
        return AffinityLevel::None;
    }

    let mut strong = false;
    let mut hedged = HEDGE_MARKERS.iter().any(|m| text.contains(m));
    for &marker in STRONG_MARKERS {
        for (idx, _) in text.match_indices(marker) {
            if is_negated(&text[..idx]) {
                hedged = true;
            } else {
                strong = true;
            }
        }
    }

    match (strong, hedged) {
        (true, false) => AffinityLevel::High,
        (false, true) => AffinityLevel::Low,
        _ => AffinityLevel::Medium,
    }
}

/// A negation among the two words right before a marker flips it, as in
/// "doesn't love" or "not a huge fan".
fn is_negated(prefix: &str) -> bool {
    prefix
        .split_whitespace()
        .rev()
        .take(2)
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .any(|w| NEGATIONS.contains(&w) || w.ends_with("n't"))
}

pub fn affinity_strength(text: &str) -> f64 {
    classify_affinity(text).strength()
}

/// Combine two strengths into a score in `[0, 1]`.
pub fn blend_score(s1: f64, s2: f64) -> f64 {
    let s1 = s1.clamp(0.0, 1.0);
    let s2 = s2.clamp(0.0, 1.0);
    let max = s1.max(s2);
    if max == 0.0 {
        return 0.0;
    }
    let mean = (s1 + s2) / 2.0;
    let balance = s1.min(s2) / max;
    (mean * (1.0 + balance) / 2.0).clamp(0.0, 1.0)
}

/// Per-listener strengths for a candidate, explicit bands first.
pub fn candidate_strengths(candidate: &BlendCandidate) -> (f64, f64) {
    let s1 = candidate
        .user1_level
        .map(AffinityLevel::strength)
        .unwrap_or_else(|| affinity_strength(&candidate.user1_affinity));
    let s2 = candidate
        .user2_level
        .map(AffinityLevel::strength)
        .unwrap_or_else(|| affinity_strength(&candidate.user2_affinity));
    (s1, s2)
}

pub fn score_candidate(candidate: &BlendCandidate) -> f64 {
    let (s1, s2) = candidate_strengths(candidate);
    blend_score(s1, s2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_affinity_text() {
        assert_eq!(classify_affinity("You'll love the harmonies"), AffinityLevel::High);
        assert_eq!(classify_affinity("Might be a stretch"), AffinityLevel::Low);
        assert_eq!(classify_affinity("Fits your indie rotation"), AffinityLevel::Medium);
        assert_eq!(classify_affinity("might love this"), AffinityLevel::Medium);
        assert_eq!(classify_affinity("   "), AffinityLevel::None);
        assert_eq!(classify_affinity("N/A"), AffinityLevel::None);
    }

    #[test]
    fn test_negated_strong_marker_is_hedged() {
        assert_eq!(classify_affinity("Doesn't love this era"), AffinityLevel::Low);
        assert_eq!(classify_affinity("doesn\u{2019}t love this era"), AffinityLevel::Low);
        assert_eq!(classify_affinity("not a huge fan of synths"), AffinityLevel::Low);
        assert_eq!(classify_affinity("never a favorite"), AffinityLevel::Low);
        assert_eq!(
            classify_affinity("Not their usual sound, but they love the hooks"),
            AffinityLevel::High
        );
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(blend_score(0.0, 0.0), 0.0);
        assert_eq!(blend_score(1.0, 1.0), 1.0);
        assert!((blend_score(1.0, 0.0) - 0.25).abs() < 1e-9);
        assert_eq!(blend_score(2.0, -1.0), blend_score(1.0, 0.0));
    }

    #[test]
    fn test_both_strong_beats_one_sided() {
        let both = blend_score(1.0, 1.0);
        let levels = [0.0, 0.35, 0.65, 1.0];
        for &a in &levels {
            for &b in &levels {
                assert!(both >= blend_score(a, b));
            }
        }
        // Moderate fit for both outranks a strong fit for only one.
        assert!(blend_score(0.65, 0.65) > blend_score(1.0, 0.0));
    }

    #[test]
    fn test_score_is_symmetric_and_monotone() {
        let steps = [0.0, 0.2, 0.35, 0.5, 0.65, 0.8, 1.0];
        for &a in &steps {
            for w in steps.windows(2) {
                assert_eq!(blend_score(a, w[0]), blend_score(w[0], a));
                assert!(blend_score(a, w[1]) >= blend_score(a, w[0]));
            }
        }
    }

    #[test]
    fn test_explicit_level_overrides_text() {
        let candidate = BlendCandidate::new("Kyoto", "Phoebe Bridgers", "you love this", "")
            .with_levels(AffinityLevel::Low, AffinityLevel::High);
        assert_eq!(candidate_strengths(&candidate), (0.35, 1.0));
    }
}
