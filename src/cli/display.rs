//! Terminal output for lookup results and configuration discovery

use crate::config::ConfigDiscovery;
use crate::lexicon::types::WordInfo;
use std::fmt::Write;

/// Human-readable rendering of a canonical word
pub fn render_word(info: &WordInfo) -> String {
    let mut out = String::new();

    match &info.phonetic {
        Some(phonetic) => {
            let _ = writeln!(out, "{} {}", info.word, phonetic);
        }
        None => {
            let _ = writeln!(out, "{}", info.word);
        }
    }

    if let Some(frequency) = &info.frequency {
        let _ = writeln!(out, "frequency: {} ({:.3})", frequency.level, frequency.score);
    }
    out.push('\n');

    for (i, definition) in info.definitions.iter().enumerate() {
        let _ = match &definition.part_of_speech {
            Some(pos) => writeln!(out, "{:>3}. ({}) {}", i + 1, pos, definition.definition),
            None => writeln!(out, "{:>3}. {}", i + 1, definition.definition),
        };
        for example in &definition.examples {
            let _ = writeln!(out, "       \"{}\"", example);
        }
    }

    if !info.synonyms.is_empty() {
        let _ = writeln!(out, "\nsynonyms: {}", info.synonyms.join(", "));
    }
    if !info.antonyms.is_empty() {
        let _ = writeln!(out, "antonyms: {}", info.antonyms.join(", "));
    }

    let _ = write!(out, "\nsource: {}", info.source);
    out
}

pub fn show_discovery_info() {
    println!("Configuration Discovery Hierarchy:");
    println!();

    let candidates = ConfigDiscovery::get_config_candidates();
    for (i, candidate) in candidates.iter().enumerate() {
        let status = if candidate.exists() {
            if candidate.is_file() {
                "✓ EXISTS"
            } else {
                "✗ NOT A FILE"
            }
        } else {
            "✗ NOT FOUND"
        };

        println!("  {}. {:?} - {}", i + 1, candidate, status);
    }

    println!();
    match ConfigDiscovery::find_config_file() {
        Some(found) => println!("Active configuration: {:?}", found),
        None => println!("Active configuration: Built-in defaults"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::types::{Definition, Frequency, FrequencyLevel};
    use chrono::Utc;

    #[test]
    fn test_render_word() {
        let mut definition = Definition::new("A greeting.");
        definition.part_of_speech = Some("noun".to_string());
        definition.examples = vec!["Hello, everyone.".to_string()];

        let info = WordInfo {
            word: "hello".to_string(),
            phonetic: Some("/həˈloʊ/".to_string()),
            definitions: vec![definition, Definition::new("To greet.")],
            parts_of_speech: Vec::new(),
            examples: Vec::new(),
            synonyms: vec!["greeting".to_string(), "hi".to_string()],
            antonyms: Vec::new(),
            frequency: Some(Frequency {
                level: FrequencyLevel::Common,
                score: 0.9,
                rank: None,
            }),
            source: "free_dictionary".to_string(),
            last_updated: Utc::now(),
        };

        let rendered = render_word(&info);
        assert!(rendered.starts_with("hello /həˈloʊ/\n"));
        assert!(rendered.contains("frequency: common (0.900)"));
        assert!(rendered.contains("  1. (noun) A greeting."));
        assert!(rendered.contains("\"Hello, everyone.\""));
        assert!(rendered.contains("  2. To greet."));
        assert!(rendered.contains("synonyms: greeting, hi"));
        assert!(!rendered.contains("antonyms"));
        assert!(rendered.ends_with("source: free_dictionary"));
    }
}
