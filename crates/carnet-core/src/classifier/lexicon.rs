//! Built-in keyword lexicon
//!
//! Keywords are written as a user would type them; they are normalized once
//! (lowercase, accents stripped) before matching.

use std::sync::LazyLock;

use regex::Regex;

use super::normalize;
use crate::models::Category;

/// Bonus added to `Salaire` when the income pattern matches
pub const INCOME_BONUS: f64 = 2.0;

/// Amounts at or above this look like rent
pub const HOUSING_AMOUNT_THRESHOLD: f64 = 800.0;

/// Bonus added to `Logement` for large amounts
pub const HOUSING_AMOUNT_BONUS: f64 = 0.5;

/// Keywords per category, in priority order
pub fn keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Logement => &["loyer", "rent", "hypothèque", "mortgage", "airbnb", "logement"],
        Category::Alimentation => &[
            "carrefour",
            "iga",
            "metro",
            "supermarché",
            "épicerie",
            "grocery",
            "resto",
            "restaurant",
            "ubereats",
            "doordash",
            "pizza",
            "kfc",
            "mcdonald",
            "café",
            "coffee",
            "aliment",
            "food",
        ],
        Category::Transport => &[
            "stm",
            "rtc",
            "opal",
            "bus",
            "metro",
            "train",
            "uber",
            "taxi",
            "essence",
            "gas",
            "station",
            "autoroute",
            "parking",
            "vélo",
            "carburant",
            "transit",
        ],
        Category::Sante => &[
            "pharmacie",
            "pharma",
            "pharmaprix",
            "jean coutu",
            "dentiste",
            "optique",
            "médic",
            "assurance santé",
            "mutuelle",
            "docteur",
            "clinic",
            "health",
        ],
        Category::Loisirs => &[
            "ciné",
            "cinema",
            "netflix",
            "spotify",
            "concert",
            "parc",
            "loisir",
            "jeux",
            "game",
            "playstation",
            "xbox",
            "nintendo",
            "stade",
            "match",
        ],
        Category::Abonnements => &[
            "abonnement",
            "subscription",
            "subscribe",
            "netflix",
            "spotify",
            "prime",
            "icloud",
            "office 365",
            "adobe",
            "notion",
            "canva",
        ],
        Category::Shopping => &[
            "zara",
            "hm",
            "amazon",
            "ikea",
            "best buy",
            "boutique",
            "magasin",
            "vêtement",
            "clothes",
            "chaussure",
            "shoes",
            "achat",
            "shopping",
        ],
        Category::Salaire => &[
            "salaire",
            "payroll",
            "paiement employeur",
            "paycheque",
            "paycheck",
            "versement employeur",
            "revenu",
        ],
        Category::Autre => &[],
    }
}

/// Matches payroll-like wording on normalized text
pub(crate) static INCOME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(salaire|payroll|paycheque|paycheck|employeur|revenu)")
        .expect("income pattern is a valid regex")
});

/// Normalized keyword table, built once
pub(crate) static NORMALIZED_KEYWORDS: LazyLock<Vec<(Category, Vec<String>)>> =
    LazyLock::new(|| {
        Category::ALL
            .iter()
            .map(|&category| {
                let words = keywords(category).iter().map(|w| normalize(w)).collect();
                (category, words)
            })
            .collect()
    });

/// Number of distinct keywords of `category` found in normalized `text`
pub(crate) fn keyword_hits(category: Category, text: &str) -> usize {
    NORMALIZED_KEYWORDS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, words)| words.iter().filter(|w| text.contains(w.as_str())).count())
        .unwrap_or(0)
}
