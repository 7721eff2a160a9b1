//! Fuzzy matching of free-text hardware names against catalog components
//!
//! Names from game requirement sheets and user input rarely match catalog
//! entries exactly ("Intel® Core™ i7-8700K Processor" vs "Intel Core i7-8700K"),
//! so both sides are normalized to lowercase tokens first. Model-number tokens
//! (anything containing a digit) must agree; the remaining tokens are scored
//! by overlap.

use std::collections::HashSet;

use regex::Regex;

use crate::models::Component;

/// Minimum overlap score accepted as a match
pub const MIN_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch<'a> {
    pub component: &'a Component,
    pub confidence: f64,
}

pub struct ComponentMatcher {
    symbols: Regex,
    noise: Regex,
    suffix: Regex,
    separators: Regex,
}

impl ComponentMatcher {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            symbols: Regex::new(r"(?i)[™®©]|\((?:tm|r|c)\)")?,
            noise: Regex::new(
                r"(?i)\b(?:intel|amd|nvidia|geforce|radeon|core|processor|graphics|edition|founders|desktop|cpu|gpu|with)\b",
            )?,
            // "4070ti" and "4070 ti" should be the same model
            suffix: Regex::new(r"(?i)(\d)(ti|super|xtx|xt)\b")?,
            separators: Regex::new(r"[^a-z0-9]+")?,
        })
    }

    pub fn normalize(&self, name: &str) -> String {
        let lowered = name.to_lowercase();
        let cleaned = self.symbols.replace_all(&lowered, " ");
        let split = self.suffix.replace_all(&cleaned, "$1 $2");
        let denoised = self.noise.replace_all(&split, " ");
        let spaced = self.separators.replace_all(&denoised, " ");
        spaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Overlap score in [0, 1] between two names
    pub fn score(&self, query: &str, candidate: &str) -> f64 {
        let query = self.normalize(query);
        let candidate = self.normalize(candidate);
        if query.is_empty() || candidate.is_empty() {
            return 0.0;
        }
        if query == candidate {
            return 1.0;
        }

        let query_tokens: HashSet<&str> = query.split(' ').collect();
        let candidate_tokens: HashSet<&str> = candidate.split(' ').collect();

        let is_model = |t: &&str| t.chars().any(|c| c.is_ascii_digit());
        let query_models: HashSet<&str> = query_tokens.iter().copied().filter(is_model).collect();
        let candidate_models: HashSet<&str> =
            candidate_tokens.iter().copied().filter(is_model).collect();
        if query_models != candidate_models {
            return 0.0;
        }

        let shared = query_tokens.intersection(&candidate_tokens).count();
        let total = query_tokens.union(&candidate_tokens).count();
        shared as f64 / total as f64
    }

    /// Best catalog match for `query`, if any clears [`MIN_CONFIDENCE`]
    pub fn best_match<'a>(&self, query: &str, candidates: &'a [Component]) -> Option<NameMatch<'a>> {
        candidates
            .iter()
            .map(|component| NameMatch {
                component,
                confidence: self.score(query, &component.display_name()),
            })
            .filter(|m| m.confidence >= MIN_CONFIDENCE)
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::named;
    use crate::models::ComponentKind;

    #[test]
    fn test_normalize() {
        let m = ComponentMatcher::new().unwrap();
        assert_eq!(m.normalize("Intel® Core™ i7-8700K Processor"), "i7 8700k");
        assert_eq!(m.normalize("NVIDIA GeForce RTX 4070Ti"), "rtx 4070 ti");
        assert_eq!(m.normalize("AMD Radeon RX 7900 XTX"), "rx 7900 xtx");
        assert_eq!(m.normalize("AMD Ryzen 7 5800X3D"), "ryzen 7 5800x3d");
    }

    #[test]
    fn test_model_numbers_must_agree() {
        let m = ComponentMatcher::new().unwrap();
        assert_eq!(m.score("GTX 1060", "GTX 1070"), 0.0);
        assert_eq!(m.score("RTX 3060", "GeForce RTX 3060"), 1.0);
    }

    #[test]
    fn test_best_match_prefers_exact_variant() {
        let m = ComponentMatcher::new().unwrap();
        let catalog = vec![
            named("rtx-4070", ComponentKind::Gpu, "NVIDIA", "GeForce RTX 4070"),
            named("rtx-4070-ti", ComponentKind::Gpu, "NVIDIA", "GeForce RTX 4070 Ti"),
        ];

        let hit = m.best_match("RTX 4070 Ti", &catalog).unwrap();
        assert_eq!(hit.component.id, "rtx-4070-ti");
        let hit = m.best_match("nvidia rtx 4070", &catalog).unwrap();
        assert_eq!(hit.component.id, "rtx-4070");
        assert!(m.best_match("RX 6600", &catalog).is_none());
    }
}
