//! Frequency estimation and collection helpers shared by transformers.

use crate::lexicon::types::{Frequency, FrequencyLevel};
use std::collections::HashSet;

/// Frequency derived from a provider-supplied corpus rank (1 = most frequent).
pub fn from_rank(rank: u32) -> Frequency {
    let rank = rank.max(1);
    let level = match rank {
        1..=1_000 => FrequencyLevel::Common,
        1_001..=5_000 => FrequencyLevel::Uncommon,
        5_001..=20_000 => FrequencyLevel::Rare,
        _ => FrequencyLevel::VeryRare,
    };

    // Halves at rank 1000, approaches zero for the long tail
    let score = 1.0 / (1.0 + (rank - 1) as f64 / 1_000.0);

    Frequency {
        level,
        score: round_score(score),
        rank: Some(rank),
    }
}

/// Heuristic used when the provider has no rank: short words with many
/// senses tend to be the common ones.
pub fn estimate(word: &str, definition_count: usize) -> Frequency {
    let length = word.chars().count();
    let length_factor = (1.0 - length.saturating_sub(4) as f64 * 0.1).clamp(0.0, 1.0);
    let sense_factor = (definition_count as f64 / 5.0).min(1.0);
    let score = (0.6 * length_factor + 0.4 * sense_factor).clamp(0.0, 1.0);

    let level = if score >= 0.7 {
        FrequencyLevel::Common
    } else if score >= 0.45 {
        FrequencyLevel::Uncommon
    } else if score >= 0.2 {
        FrequencyLevel::Rare
    } else {
        FrequencyLevel::VeryRare
    };

    Frequency {
        level,
        score: round_score(score),
        rank: None,
    }
}

fn round_score(score: f64) -> f64 {
    (score * 1_000.0).round() / 1_000.0
}

/// Trim, drop blanks and duplicates, keep first-occurrence order.
pub fn dedup_preserving_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter_map(|item| {
            let item = item.as_ref().trim();
            if item.is_empty() || !seen.insert(item.to_string()) {
                None
            } else {
                Some(item.to_string())
            }
        })
        .collect()
}
