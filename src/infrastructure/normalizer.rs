//! Query normalization
//!
//! Deterministic, idempotent per-language cleanup applied before any
//! vocabulary matching. Pure functions, no I/O.

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::{Language, Script};

/// Normalize a query for the given language
///
/// Lowercases, collapses whitespace, and folds diacritics for Latin-script
/// languages (the vocabulary stores unaccented terms). Non-Latin scripts
/// are left untouched apart from casing and whitespace.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str, language: Language) -> String {
    let lowered = text.to_lowercase();

    let folded = match language.script() {
        Script::Latin => fold_diacritics(&lowered),
        Script::NonLatin => lowered,
    };

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a normalized query into word tokens
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .unicode_words()
        .map(str::to_string)
        .collect()
}

/// Fold accented Latin characters to their unaccented base
fn fold_diacritics(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for character in text.chars() {
        match character {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => folded.push('a'),
            'è' | 'é' | 'ê' | 'ë' => folded.push('e'),
            'ì' | 'í' | 'î' | 'ï' => folded.push('i'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => folded.push('o'),
            'ù' | 'ú' | 'û' | 'ü' => folded.push('u'),
            'ý' | 'ÿ' => folded.push('y'),
            'ç' => folded.push('c'),
            'ñ' => folded.push('n'),
            'ß' => folded.push_str("ss"),
            'œ' => folded.push_str("oe"),
            'æ' => folded.push_str("ae"),
            'ą' => folded.push('a'),
            'ć' => folded.push('c'),
            'ę' => folded.push('e'),
            'ł' => folded.push('l'),
            'ń' => folded.push('n'),
            'ś' => folded.push('s'),
            'ź' | 'ż' => folded.push('z'),
            other => folded.push(other),
        }
    }

    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_whitespace_collapse() {
        assert_eq!(
            normalize("  Ross 308   Weight ", Language::En),
            "ross 308 weight"
        );
    }

    #[test]
    fn test_diacritics_folded_for_latin_scripts() {
        assert_eq!(
            normalize("Mortalité élevée", Language::Fr),
            "mortalite elevee"
        );
        assert_eq!(normalize("conversión", Language::Es), "conversion");
        assert_eq!(normalize("Geflügel", Language::De), "geflugel");
    }

    #[test]
    fn test_non_latin_scripts_untouched() {
        assert_eq!(normalize("  肉鸡 体重  ", Language::Zh), "肉鸡 体重");
        assert_eq!(normalize("ไก่เนื้อ", Language::Th), "ไก่เนื้อ");
    }

    #[test]
    fn test_idempotent_across_languages() {
        let samples = [
            ("Mortalité à 35 JOURS  élevée?", Language::Fr),
            ("Ross 308 WEIGHT at 35 days", Language::En),
            ("¿Cuál es el peso?", Language::Es),
            ("Żywienie kurcząt", Language::Pl),
            ("肉鸡42天的体重", Language::Zh),
            ("", Language::En),
        ];

        for (sample, language) in samples {
            let once = normalize(sample, language);
            let twice = normalize(&once, language);
            assert_eq!(once, twice, "normalize not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_tokenize_drops_punctuation() {
        let normalized = normalize("How do I treat Newcastle disease?", Language::En);
        let tokens = tokenize(&normalized);
        assert_eq!(
            tokens,
            vec!["how", "do", "i", "treat", "newcastle", "disease"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
