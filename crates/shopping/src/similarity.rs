//! Ingredient name similarity
//!
//! Every place that decides whether two names refer to the same ingredient
//! goes through [`name_similarity`] and the thresholds below: recipe-to-recipe
//! grouping, list matching and the duplicate scanner.

use strsim::normalized_levenshtein;

/// Scores at or above this are plausibly the same ingredient
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Reserved for names that are identical after normalisation
pub const EXACT_THRESHOLD: f64 = 1.0;

/// Fixed confidence of a recipe-to-recipe group, which always needs user confirmation
pub const RECIPE_TO_RECIPE_CONFIDENCE: f64 = 0.8;

/// Same words once plurals are folded ("onion" / "onions")
const SINGULAR_MATCH_SCORE: f64 = 0.9;

/// One name's words all appear in the other ("onion" / "diced onion")
const CONTAINMENT_BASE_SCORE: f64 = 0.7;
const CONTAINMENT_COVERAGE_WEIGHT: f64 = 0.2;

/// Ceiling for names that are not identical
const MAX_INEXACT_SCORE: f64 = 0.99;

/// Lowercase, drop a trailing preparation clause after the first comma,
/// strip surrounding punctuation and collapse whitespace.
///
/// "  Onion, diced " → "onion"
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let head = lowered.split(',').next().unwrap_or_default();

    head.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

/// Fold common English plural endings
///
/// Deliberately small: "berries" → "berry", "tomatoes" → "tomato",
/// "peaches" → "peach", "onions" → "onion". Words ending in "ss", "us" or
/// "is" are left alone.
pub fn singularize(word: &str) -> String {
    if word.chars().count() <= 3 {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }

    if let Some(stem) = word.strip_suffix("oes") {
        return format!("{stem}o");
    }

    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

/// Confidence in [0, 1] that two normalised names are the same ingredient
///
/// - identical strings: 1.0
/// - identical after plural folding: 0.9
/// - every word of one contained in the other: 0.7 plus up to 0.2 for coverage
/// - otherwise an even blend of word overlap (Jaccard) and edit similarity,
///   which keeps unrelated single words such as "onion" / "garlic" well
///   under 0.4
///
/// Empty names never match anything.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a == b {
        return EXACT_THRESHOLD;
    }

    let words_a: Vec<String> = a.split_whitespace().map(singularize).collect();
    let words_b: Vec<String> = b.split_whitespace().map(singularize).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    if words_a == words_b {
        return SINGULAR_MATCH_SCORE;
    }

    let (shorter, longer) = if words_a.len() <= words_b.len() {
        (&words_a, &words_b)
    } else {
        (&words_b, &words_a)
    };

    if shorter.iter().all(|word| longer.contains(word)) {
        let coverage = shorter.len() as f64 / longer.len() as f64;
        return (CONTAINMENT_BASE_SCORE + CONTAINMENT_COVERAGE_WEIGHT * coverage).min(MAX_INEXACT_SCORE);
    }

    let shared = words_a.iter().filter(|word| words_b.contains(word)).count();
    let mut union: Vec<&String> = words_a.iter().chain(words_b.iter()).collect();
    union.sort();
    union.dedup();
    let jaccard = shared as f64 / union.len() as f64;

    let edit = normalized_levenshtein(&words_a.join(" "), &words_b.join(" "));

    (0.5 * jaccard + 0.5 * edit).clamp(0.0, MAX_INEXACT_SCORE)
}

/// [`similarity`] over [`normalize_name`]d inputs
pub fn name_similarity(a: &str, b: &str) -> f64 {
    similarity(&normalize_name(a), &normalize_name(b))
}

pub fn is_plausible_match(score: f64) -> bool {
    score >= MATCH_THRESHOLD
}

pub fn is_exact_match(score: f64) -> bool {
    score >= EXACT_THRESHOLD
}
