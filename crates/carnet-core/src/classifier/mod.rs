//! Category suggestion for transaction descriptions
//!
//! Suggestion runs in three stages:
//! 1. Learned tokens: if at least two tokens of the description were
//!    previously confirmed as the same category, that category wins with 0.95.
//! 2. Keyword heuristic: each lexicon keyword present in the description adds
//!    one point to its category; payroll wording adds two to `Salaire`.
//! 3. Amount weighting: large amounts nudge towards `Logement`.
//!
//! Equal scores resolve to the category listed first in [`Category::ALL`].

use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::models::{Category, Suggestion};
use crate::storage::KeyValueStore;

mod learned;
pub mod lexicon;

pub use learned::LearnedTokens;

/// Minimum token length considered by learning and learned lookup
pub const MIN_TOKEN_LEN: usize = 3;

/// Learned tokens needed to trust the learned category
pub const LEARNED_VOTES_REQUIRED: usize = 2;

/// Score returned for a learned match
pub const LEARNED_SCORE: f64 = 0.95;

/// Upper bound of a keyword-based score
pub const MAX_HEURISTIC_SCORE: f64 = 0.9;

/// Score returned when nothing matched
pub const FALLBACK_SCORE: f64 = 0.2;

/// Suggestions at or above this score are learned even when accepted unchanged
pub const CONFIDENT_SCORE: f64 = 0.6;

/// Lowercase, strip diacritics, trim
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Alphanumeric runs of a normalized text, in order of appearance
fn raw_tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
}

/// Unique tokens (length ≥ 3) of a description, in order of first appearance
pub fn tokenize(description: &str) -> Vec<String> {
    let text = normalize(description);
    let mut tokens: Vec<String> = Vec::new();
    for tok in raw_tokens(&text) {
        if !tokens.iter().any(|t| t == tok) {
            tokens.push(tok.to_string());
        }
    }
    tokens
}

/// Suggest a category for `description`
///
/// `amount_abs` is the absolute transaction amount; the sign is ignored.
pub fn suggest(description: &str, amount_abs: f64, learned: &LearnedTokens) -> Suggestion {
    let text = normalize(description);

    if let Some(category) = learned_vote(&text, learned) {
        debug!(category = %category, "Suggestion from learned tokens");
        return Suggestion {
            category,
            score: LEARNED_SCORE,
        };
    }

    let mut scores: Vec<(Category, f64)> = Category::ALL.iter().map(|&c| (c, 0.0)).collect();

    if lexicon::INCOME_PATTERN.is_match(&text) {
        add(&mut scores, Category::Salaire, lexicon::INCOME_BONUS);
    }

    for category in Category::ALL {
        let hits = lexicon::keyword_hits(category, &text);
        add(&mut scores, category, hits as f64);
    }

    if amount_abs.abs() >= lexicon::HOUSING_AMOUNT_THRESHOLD {
        add(
            &mut scores,
            Category::Logement,
            lexicon::HOUSING_AMOUNT_BONUS,
        );
    }

    // First maximum in declaration order
    let (best, points) = scores
        .iter()
        .fold((Category::Autre, 0.0_f64), |(bc, bs), &(c, s)| {
            if s > bs {
                (c, s)
            } else {
                (bc, bs)
            }
        });

    if points > 0.0 {
        Suggestion {
            category: best.as_str().to_string(),
            score: (points / 5.0).min(MAX_HEURISTIC_SCORE),
        }
    } else {
        Suggestion {
            category: Category::Autre.as_str().to_string(),
            score: FALLBACK_SCORE,
        }
    }
}

fn add(scores: &mut [(Category, f64)], category: Category, points: f64) {
    if let Some(entry) = scores.iter_mut().find(|(c, _)| *c == category) {
        entry.1 += points;
    }
}

/// Category with the most learned tokens, if it has enough votes.
/// Ties go to the category whose token appears first.
fn learned_vote(normalized: &str, learned: &LearnedTokens) -> Option<String> {
    if learned.is_empty() {
        return None;
    }

    let mut votes: Vec<(&str, usize)> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for tok in raw_tokens(normalized) {
        if seen.contains(&tok) {
            continue;
        }
        seen.push(tok);
        if let Some(category) = learned.get(tok) {
            match votes.iter_mut().find(|(c, _)| *c == category) {
                Some(entry) => entry.1 += 1,
                None => votes.push((category, 1)),
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, count) in votes {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((category, count));
        }
    }

    best.filter(|(_, n)| *n >= LEARNED_VOTES_REQUIRED)
        .map(|(c, _)| c.to_string())
}

/// Associate every token (length ≥ 3) of `description` with `category`
///
/// Returns the number of distinct tokens written.
pub fn learn(description: &str, category: &str, learned: &mut LearnedTokens) -> usize {
    let tokens = tokenize(description);
    for tok in &tokens {
        learned.insert(tok.as_str(), category);
    }
    tokens.len()
}

/// Whether committing `final_category` should teach the classifier
///
/// Learn when a suggestion was shown and either the user picked something
/// else or the suggestion was confident.
pub fn should_learn(suggestion: Option<&Suggestion>, description: &str, final_category: &str) -> bool {
    match suggestion {
        Some(s) if !description.trim().is_empty() => {
            s.category != final_category || s.score >= CONFIDENT_SCORE
        }
        _ => false,
    }
}

/// Classifier bound to its learned-token map
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    learned: LearnedTokens,
}

impl Classifier {
    pub fn new(learned: LearnedTokens) -> Self {
        Self { learned }
    }

    /// Load learned tokens from the store (empty on unreadable data)
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self::new(LearnedTokens::load(store))
    }

    pub fn learned(&self) -> &LearnedTokens {
        &self.learned
    }

    pub fn suggest(&self, description: &str, amount_abs: f64) -> Suggestion {
        suggest(description, amount_abs, &self.learned)
    }

    /// Learn and persist. The in-memory map keeps the update even when the
    /// write fails; the failure is returned to the caller.
    pub fn learn(
        &mut self,
        description: &str,
        category: &str,
        store: &dyn KeyValueStore,
    ) -> Result<usize> {
        let count = learn(description, category, &mut self.learned);
        debug!(count, category, "Learned tokens");
        self.learned.save(store)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::FailingStore;
    use crate::storage::MemoryStore;

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize("  Épicerie Café "), "epicerie cafe");
        assert_eq!(normalize("HYPOTHÈQUE"), "hypotheque");
    }

    #[test]
    fn test_tokenize_unique_and_min_length() {
        assert_eq!(
            tokenize("IGA - iga, épicerie du 12"),
            vec!["iga".to_string(), "epicerie".to_string()]
        );
        assert!(tokenize("a b 12").is_empty());
    }

    #[test]
    fn test_grocery_example() {
        let s = suggest("IGA epicerie", 45.0, &LearnedTokens::new());
        assert_eq!(s.category, "Alimentation");
        assert!((s.score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_salary_example() {
        let s = suggest("Salaire Employeur Mars", 2500.0, &LearnedTokens::new());
        assert_eq!(s.category, "Salaire");
        assert!(s.score >= 0.4);
        // income pattern (2) + "salaire" keyword (1)
        assert!((s.score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_no_match_falls_back() {
        let s = suggest("xyz", 12.0, &LearnedTokens::new());
        assert_eq!(s.category, "Autre");
        assert!((s.score - FALLBACK_SCORE).abs() < 1e-9);
    }

    #[test]
    fn test_large_amount_nudges_housing() {
        let s = suggest("virement", 950.0, &LearnedTokens::new());
        assert_eq!(s.category, "Logement");
        assert!((s.score - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_tie_prefers_declaration_order() {
        // "metro" is both a grocer and a transit keyword
        let s = suggest("metro", 10.0, &LearnedTokens::new());
        assert_eq!(s.category, "Alimentation");

        // "netflix" scores Loisirs and Abonnements equally
        let s = suggest("netflix", 15.0, &LearnedTokens::new());
        assert_eq!(s.category, "Loisirs");
    }

    #[test]
    fn test_score_is_capped() {
        let s = suggest(
            "resto restaurant pizza kfc coffee food grocery",
            20.0,
            &LearnedTokens::new(),
        );
        assert_eq!(s.category, "Alimentation");
        assert!((s.score - MAX_HEURISTIC_SCORE).abs() < 1e-9);
    }

    #[test]
    fn test_learned_overrides_keywords() {
        let mut learned = LearnedTokens::new();
        learn("Boulangerie Marcel", "Alimentation", &mut learned);

        let s = suggest("boulangerie marcel", 8.0, &learned);
        assert_eq!(s.category, "Alimentation");
        assert_eq!(s.score, LEARNED_SCORE);
    }

    #[test]
    fn test_single_learned_token_is_not_enough() {
        let mut learned = LearnedTokens::new();
        learned.insert("marcel", "Loisirs");

        let s = suggest("marcel", 8.0, &learned);
        assert_eq!(s.category, "Autre");
    }

    #[test]
    fn test_learned_tie_goes_to_first_token() {
        let mut learned = LearnedTokens::new();
        learned.insert("aaa", "Shopping");
        learned.insert("bbb", "Shopping");
        learned.insert("ccc", "Loisirs");
        learned.insert("ddd", "Loisirs");

        let s = suggest("ccc aaa ddd bbb", 0.0, &learned);
        assert_eq!(s.category, "Loisirs");
    }

    #[test]
    fn test_learn_is_immediately_effective() {
        let mut learned = LearnedTokens::new();
        let n = learn("Cotisation Club Escalade", "Loisirs", &mut learned);
        assert_eq!(n, 3);
        let s = suggest("Cotisation Club Escalade", 40.0, &learned);
        assert_eq!(s.category, "Loisirs");
        assert_eq!(s.score, LEARNED_SCORE);
    }

    #[test]
    fn test_learn_counts_distinct_tokens() {
        let mut learned = LearnedTokens::new();
        let n = learn("Cotisation cotisation club", "Loisirs", &mut learned);
        assert_eq!(n, 2);
        assert_eq!(learned.len(), 2);
    }

    #[test]
    fn test_learned_category_can_be_custom() {
        let mut learned = LearnedTokens::new();
        learn("Garderie Petits Loups", "Enfants", &mut learned);
        let s = suggest("garderie petits loups", 300.0, &learned);
        assert_eq!(s.category, "Enfants");
    }

    #[test]
    fn test_should_learn_policy() {
        let weak = Suggestion {
            category: "Autre".into(),
            score: 0.2,
        };
        let confident = Suggestion {
            category: "Salaire".into(),
            score: 0.6,
        };

        assert!(!should_learn(None, "IGA", "Alimentation"));
        assert!(!should_learn(Some(&weak), "   ", "Alimentation"));
        assert!(should_learn(Some(&weak), "IGA", "Alimentation"));
        assert!(!should_learn(Some(&weak), "IGA", "Autre"));
        assert!(should_learn(Some(&confident), "Paie", "Salaire"));
    }

    #[test]
    fn test_classifier_persists_learning() {
        let store = MemoryStore::new();
        let mut classifier = Classifier::load(&store);
        classifier
            .learn("Fromagerie Atwater", "Alimentation", &store)
            .unwrap();

        let reloaded = Classifier::load(&store);
        let s = reloaded.suggest("fromagerie atwater", 25.0);
        assert_eq!(s.category, "Alimentation");
        assert_eq!(s.score, LEARNED_SCORE);
    }

    #[test]
    fn test_classifier_keeps_learning_when_write_fails() {
        let mut classifier = Classifier::default();
        let err = classifier.learn("Fromagerie Atwater", "Alimentation", &FailingStore);
        assert!(err.is_err());
        assert_eq!(
            classifier.suggest("fromagerie atwater", 25.0).score,
            LEARNED_SCORE
        );
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let learned = LearnedTokens::new();
        for (desc, amount) in [
            ("", 0.0),
            ("loyer rent mortgage logement airbnb hypotheque", 5000.0),
            ("salaire payroll paycheck revenu employeur", -3000.0),
            ("???", f64::NAN),
        ] {
            let s = suggest(desc, amount, &learned);
            assert!((0.0..=1.0).contains(&s.score), "{} -> {}", desc, s.score);
        }
    }
}
