//! Domain vocabulary and blocked terms
//!
//! Both structures are built once at bootstrap and are immutable for the
//! process lifetime; a rebuild is an explicit full replacement. They hold
//! normalized (lowercase, unaccented) terms only.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::language::Language;

/// Per-language, tiered sets of domain terms
///
/// Tier 1 is the most topically relevant bucket; relevance decreases with
/// the tier number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainVocabulary {
    tiers: HashMap<Language, Vec<HashSet<String>>>,
}

impl DomainVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term into a 1-based tier, growing the tier list as needed
    pub fn insert_term(&mut self, language: Language, tier: usize, term: impl Into<String>) {
        let tier = tier.max(1);
        let tiers = self.tiers.entry(language).or_default();
        if tiers.len() < tier {
            tiers.resize_with(tier, HashSet::new);
        }

        let term = term.into().trim().to_lowercase();
        if !term.is_empty() {
            tiers[tier - 1].insert(term);
        }
    }

    /// Languages that have at least one term
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self
            .tiers
            .iter()
            .filter(|(_, tiers)| tiers.iter().any(|tier| !tier.is_empty()))
            .map(|(language, _)| *language)
            .collect();
        languages.sort_by_key(|language| language.code());
        languages
    }

    /// Whether a language has any terms at all
    pub fn is_empty_for(&self, language: Language) -> bool {
        self.tiers
            .get(&language)
            .map(|tiers| tiers.iter().all(|tier| tier.is_empty()))
            .unwrap_or(true)
    }

    /// Match vocabulary terms against a normalized query
    ///
    /// Single-word terms are matched against the token list; multi-word
    /// terms are matched as substrings of the normalized text. Returns
    /// `(term, tier)` pairs with 1-based tiers.
    pub fn match_terms(
        &self,
        language: Language,
        normalized_text: &str,
        tokens: &[String],
    ) -> Vec<(String, usize)> {
        let Some(tiers) = self.tiers.get(&language) else {
            return Vec::new();
        };

        let token_set: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        let mut matches = Vec::new();

        for (index, tier) in tiers.iter().enumerate() {
            for term in tier {
                let hit = if term.contains(' ') {
                    normalized_text.contains(term.as_str())
                } else {
                    token_set.contains(term.as_str())
                };
                if hit {
                    matches.push((term.clone(), index + 1));
                }
            }
        }

        matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        matches
    }

    /// Tier sizes per language, for introspection
    pub fn sizes(&self) -> HashMap<Language, Vec<usize>> {
        self.tiers
            .iter()
            .map(|(language, tiers)| (*language, tiers.iter().map(HashSet::len).collect()))
            .collect()
    }
}

/// Blocked-term categories; a single match is a hard veto
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockedTerms {
    categories: BTreeMap<String, HashSet<String>>,
}

impl BlockedTerms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, term: impl Into<String>) {
        let term = term.into().trim().to_lowercase();
        if !term.is_empty() {
            self.categories
                .entry(category.into())
                .or_default()
                .insert(term);
        }
    }

    /// Find every blocked term appearing in a normalized query
    pub fn find_matches(&self, normalized_text: &str) -> Vec<String> {
        let mut matched: Vec<String> = self
            .categories
            .values()
            .flatten()
            .filter(|term| normalized_text.contains(term.as_str()))
            .cloned()
            .collect();
        matched.sort();
        matched.dedup();
        matched
    }

    /// Term counts per category, for introspection
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.categories
            .iter()
            .map(|(category, terms)| (category.clone(), terms.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vocabulary() -> DomainVocabulary {
        let mut vocabulary = DomainVocabulary::new();
        vocabulary.insert_term(Language::En, 1, "broiler");
        vocabulary.insert_term(Language::En, 1, "Ross");
        vocabulary.insert_term(Language::En, 2, "feed conversion");
        vocabulary.insert_term(Language::En, 4, "farm");
        vocabulary
    }

    #[test]
    fn test_insert_grows_tiers_and_lowercases() {
        let vocabulary = sample_vocabulary();
        let sizes = vocabulary.sizes();
        assert_eq!(sizes[&Language::En], vec![2, 1, 0, 1]);
        assert!(vocabulary.is_empty_for(Language::Fr));
    }

    #[test]
    fn test_match_single_and_multi_word_terms() {
        let vocabulary = sample_vocabulary();
        let text = "ross broiler feed conversion target";
        let tokens: Vec<String> = text.split(' ').map(str::to_string).collect();

        let matches = vocabulary.match_terms(Language::En, text, &tokens);

        assert_eq!(
            matches,
            vec![
                ("broiler".to_string(), 1),
                ("ross".to_string(), 1),
                ("feed conversion".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_match_unknown_language_is_empty() {
        let vocabulary = sample_vocabulary();
        let tokens = vec!["broiler".to_string()];
        assert!(
            vocabulary
                .match_terms(Language::Zh, "broiler", &tokens)
                .is_empty()
        );
    }

    #[test]
    fn test_blocked_terms_veto_matching() {
        let mut blocked = BlockedTerms::new();
        blocked.insert("cooking", "recipe");
        blocked.insert("cooking", "fried chicken");
        blocked.insert("cockfighting", "cockfight");

        let matches = blocked.find_matches("best fried chicken recipe ever");
        assert_eq!(
            matches,
            vec!["fried chicken".to_string(), "recipe".to_string()]
        );

        assert!(blocked.find_matches("broiler weight at 35 days").is_empty());

        let counts = blocked.counts();
        assert_eq!(counts["cooking"], 2);
        assert_eq!(counts["cockfighting"], 1);
    }
}
