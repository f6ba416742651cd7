//! Vocabulary construction
//!
//! Builds the process-wide domain vocabulary once at bootstrap. The curated
//! seed covers the two pivot languages; the remaining Latin-script languages
//! are populated by translating the English seed when a translation service
//! is available. Without one, the embedded seed alone is used.

use tracing::{debug, info};

use crate::domain::{BlockedTerms, DomainVocabulary, Language, TranslationService};
use crate::infrastructure::normalizer::normalize;

const DOMAIN_HINT: &str = "poultry farming";

/// English seed terms, one slice per relevance tier
const SEED_TIERS_EN: [&[&str]; 4] = [
    &[
        "broiler", "layer", "poultry", "chicken", "hen", "rooster", "chick", "flock", "hatchery",
        "breeder", "ross", "cobb", "hubbard",
    ],
    &[
        "weight",
        "body weight",
        "weight gain",
        "fcr",
        "feed conversion",
        "mortality",
        "egg production",
        "laying rate",
        "hatchability",
        "livability",
        "daily gain",
        "feed intake",
        "water consumption",
    ],
    &[
        "newcastle",
        "coccidiosis",
        "gumboro",
        "avian influenza",
        "salmonella",
        "ascites",
        "vaccination",
        "vaccine",
        "biosecurity",
        "brooding",
        "ventilation",
        "culling",
    ],
    &[
        "farm", "barn", "feed", "feeder", "drinker", "litter", "temperature", "humidity",
        "lighting", "density", "welfare", "day", "days", "week", "weeks",
    ],
];

/// French seed terms, curated rather than machine-translated
/// (stored unaccented, matching the normalizer's diacritic policy)
const SEED_TIERS_FR: [&[&str]; 4] = [
    &[
        "poulet",
        "poulet de chair",
        "pondeuse",
        "volaille",
        "poule",
        "coq",
        "poussin",
        "troupeau",
        "couvoir",
        "reproducteur",
        "ross",
        "cobb",
        "hubbard",
    ],
    &[
        "poids",
        "poids vif",
        "gain de poids",
        "indice de conversion",
        "mortalite",
        "ponte",
        "taux de ponte",
        "eclosabilite",
        "viabilite",
        "gain quotidien",
        "consommation d'aliment",
        "consommation d'eau",
    ],
    &[
        "newcastle",
        "coccidiose",
        "gumboro",
        "influenza aviaire",
        "salmonelle",
        "ascite",
        "vaccination",
        "vaccin",
        "biosecurite",
        "demarrage",
        "ventilation",
        "reforme",
    ],
    &[
        "ferme",
        "batiment",
        "aliment",
        "mangeoire",
        "abreuvoir",
        "litiere",
        "temperature",
        "humidite",
        "eclairage",
        "densite",
        "bien-etre",
        "jour",
        "jours",
        "semaine",
        "semaines",
    ],
];

/// Blocked-term categories; matching any of these is a hard veto
const BLOCKED_CATEGORIES: [(&str, &[&str]); 4] = [
    (
        "cooking",
        &[
            "recipe",
            "marinade",
            "roast chicken",
            "fried chicken",
            "grilled chicken",
            "nugget",
            "recette",
            "poulet roti",
            "poulet frit",
        ],
    ),
    (
        "cockfighting",
        &[
            "cockfight",
            "fighting rooster",
            "gamecock",
            "combat de coqs",
            "coq de combat",
        ],
    ),
    (
        "companion_birds",
        &[
            "parrot",
            "parakeet",
            "budgie",
            "canary",
            "cockatiel",
            "perroquet",
            "perruche",
            "canari",
        ],
    ),
    (
        "off_topic",
        &[
            "bitcoin",
            "crypto",
            "stock market",
            "forex",
            "casino",
            "betting odds",
        ],
    ),
];

/// Builder for the process-wide vocabulary and blocked-term sets
#[derive(Debug, Clone, Default)]
pub struct VocabularyBuilder;

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the vocabulary, translating the English seed into every
    /// translatable language
    ///
    /// A failed translation drops only that term for that language; the
    /// build itself always succeeds with at least the pivot seeds.
    pub async fn build(
        &self,
        translation: &dyn TranslationService,
    ) -> (DomainVocabulary, BlockedTerms) {
        let (mut vocabulary, blocked) = self.build_fallback();

        for &language in Language::all().iter().filter(|lang| lang.is_translatable()) {
            let mut dropped = 0usize;

            for (tier_index, terms) in SEED_TIERS_EN.iter().enumerate() {
                for term in *terms {
                    match translation
                        .translate(term, language, Some(Language::En), Some(DOMAIN_HINT))
                        .await
                    {
                        Ok(result) => {
                            vocabulary.insert_term(
                                language,
                                tier_index + 1,
                                normalize(&result.text, language),
                            );
                        }
                        Err(error) => {
                            dropped += 1;
                            debug!(%language, term, %error, "Dropping untranslated term");
                        }
                    }
                }
            }

            if dropped > 0 {
                info!(%language, dropped, "Vocabulary built with missing translations");
            }
        }

        (vocabulary, blocked)
    }

    /// Build from the embedded seed only
    ///
    /// Guarantees non-empty tiers for both pivot languages.
    pub fn build_fallback(&self) -> (DomainVocabulary, BlockedTerms) {
        let mut vocabulary = DomainVocabulary::new();

        for (tier_index, terms) in SEED_TIERS_EN.iter().enumerate() {
            for term in *terms {
                vocabulary.insert_term(Language::En, tier_index + 1, *term);
            }
        }
        for (tier_index, terms) in SEED_TIERS_FR.iter().enumerate() {
            for term in *terms {
                vocabulary.insert_term(Language::Fr, tier_index + 1, *term);
            }
        }

        let mut blocked = BlockedTerms::new();
        for (category, terms) in BLOCKED_CATEGORIES {
            for term in terms {
                blocked.insert(category, *term);
            }
        }

        (vocabulary, blocked)
    }
}
