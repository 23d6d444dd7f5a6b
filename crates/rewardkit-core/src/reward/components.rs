//! Individual reward rules.
//!
//! Each rule is pure and returns an unbounded contribution; the aggregate is
//! clamped by the caller.

use super::extra::ExtraInfo;

const EXPLANATION_KEYWORDS: &[&str] = &[
    "because",
    "therefore",
    "since",
    "due to",
    "as a result",
    "this means",
    "in other words",
    "for example",
];

const STRUCTURE_MARKERS: &[&str] = &["1.", "2.", "•", "-", "first", "second"];

const CREATIVITY_KEYWORDS: &[&str] = &[
    "innovative",
    "creative",
    "alternative",
    "another way",
    "different approach",
    "for instance",
    "imagine",
];

const TRANSITION_WORDS: &[&str] = &["first", "next", "then", "finally", "in conclusion"];

const SPAM_INDICATORS: &[&str] = &["spam", "click here", "buy now", "free money"];

fn char_len(s: &str) -> f64 {
    s.chars().count() as f64
}

/// Number of distinct keywords present anywhere in `haystack`
fn keyword_hits(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| haystack.contains(*kw)).count()
}

pub fn correctness(solution: &str, ground_truth: &str, extra: &ExtraInfo<'_>) -> f64 {
    let sol = solution.trim().to_lowercase();
    if sol.is_empty() {
        return 0.0;
    }
    let truth = ground_truth.trim().to_lowercase();

    if sol == truth {
        return 5.0;
    }
    // every solution contains an empty ground truth
    if !truth.is_empty() && (sol.contains(&truth) || truth.contains(&sol)) {
        return 2.5;
    }

    if extra.contains("key_concepts") {
        let hits = extra
            .strings("key_concepts")
            .into_iter()
            .filter(|concept| sol.contains(&concept.to_lowercase()))
            .count();
        return hits as f64;
    }

    0.0
}

pub fn engagement(solution: &str, ground_truth: &str, extra: &ExtraInfo<'_>) -> f64 {
    if solution.is_empty() {
        return 0.0;
    }

    let mut score = 0.1;
    let truth_len = char_len(ground_truth);
    if truth_len > 0.0 {
        score += (char_len(solution) / truth_len).min(2.0) * 0.3;
    }
    score += (extra.number("engagement_score") * 0.2).min(1.0);
    score
}

pub fn explanation(solution: &str, extra: &ExtraInfo<'_>) -> f64 {
    if solution.is_empty() {
        return 0.0;
    }
    let lower = solution.to_lowercase();

    let mut score = (0.5 * keyword_hits(&lower, EXPLANATION_KEYWORDS) as f64).min(2.0);

    if STRUCTURE_MARKERS.iter().any(|m| lower.contains(m)) {
        score += 1.0;
    }

    let objectives_met = extra
        .strings("learning_objectives")
        .into_iter()
        .filter(|objective| lower.contains(&objective.to_lowercase()))
        .count();
    score + 0.8 * objectives_met as f64
}

pub fn creativity(solution: &str, ground_truth: &str) -> f64 {
    if solution.is_empty() {
        return 0.0;
    }
    let lower = solution.to_lowercase();
    let mut score = 0.0;

    if lower != ground_truth.to_lowercase() && char_len(solution) > 0.8 * char_len(ground_truth) {
        score += 1.5;
    }

    score += (0.7 * keyword_hits(&lower, CREATIVITY_KEYWORDS) as f64).min(2.0);

    if lower.contains("alternatively") || lower.contains("option") {
        score += 1.0;
    }
    score
}

pub fn clarity(solution: &str, extra: &ExtraInfo<'_>) -> f64 {
    if solution.is_empty() {
        return 0.0;
    }
    let lower = solution.to_lowercase();
    let mut score = 0.0;

    let segments: Vec<&str> = solution.split('.').collect();
    if segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
        score += 0.5;
    }

    let words = solution.split_whitespace().count();
    if (10..=100).contains(&words) {
        score += 1.0;
    } else if (5..=150).contains(&words) {
        score += 0.5;
    }

    if TRANSITION_WORDS.iter().any(|w| lower.contains(w)) {
        score += 0.8;
    }

    score + extra.number("clarity_score") * 1.5
}

pub fn appropriateness_penalty(solution: &str, extra: &ExtraInfo<'_>) -> f64 {
    // An empty solution takes the flat penalty and nothing else.
    if solution.is_empty() {
        return -1.0;
    }
    let lower = solution.to_lowercase();
    let mut penalty = 0.0;

    if solution.chars().count() < 3 {
        penalty -= 2.0;
    }
    if SPAM_INDICATORS.iter().any(|s| lower.contains(s)) {
        penalty -= 5.0;
    }
    if extra.flag("inappropriate") {
        penalty -= 10.0;
    }
    if extra.flag("off_topic") {
        penalty -= 3.0;
    }
    penalty
}
