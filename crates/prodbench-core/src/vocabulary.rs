//! Vocabulary tables used to compose synthetic product names
//!
//! A [`Vocabulary`] is built once at start-up (built-in defaults, optionally
//! overridden from config) and handed to the synthesizer by reference.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// First and last production year in the built-in vocabulary (inclusive)
pub const FIRST_YEAR: u16 = 1930;
pub const LAST_YEAR: u16 = 2024;

/// Rows in the category table; `category_id` is always in `1..=CATEGORY_COUNT`
pub const CATEGORY_COUNT: usize = 7;

const CATEGORIES: &[&str] = &[
    "White tea",
    "Green tea",
    "Yellow tea",
    "Oolong tea",
    "Black tea",
    "Red tea",
    "Pu-erh tea",
];

const FORMS: &[&str] = &[
    "loose leaf",
    "bagged",
    "granulated",
    "pressed",
    "powdered",
    "flowering",
];

// Duplicates are intentional; they skew the brand distribution.
const BRANDS: &[&str] = &[
    "Twinings",
    "Lipton",
    "Fortnum & Mason",
    "Harney & Sons",
    "Ahmad Tea",
    "Dilmah",
    "Taj Mahal",
    "Aromistico",
    "Maisky Chai",
    "Princess Noori",
    "Greenfield",
    "TeaGschwendner",
    "Lupicia",
    "ITO EN",
    "Tazo",
    "Lipton",
    "Ahmad Tea",
    "Teavana",
    "Ten Ren",
    "Eco-Cha",
    "Menghai Tea Factory",
    "Xiaguan",
    "Yunnan Sourcing",
    "Celestial Seasonings",
    "Yogi Tea",
    "Pukka Herbs",
    "Mariage Freres",
    "Wedgwood",
    "Rare Tea Company",
];

const EDITIONS: &[&str] = &[
    "limited edition",
    "special edition",
    "premium edition",
    "gift edition",
    "collector's edition",
    "holiday edition",
];

const PACKAGING: &[&str] = &[
    "tin can",
    "cardboard box",
    "ceramic jar",
    "wooden casket",
    "cloth pouch",
    "foil bag",
    "glass jar",
];

const WEIGHTS: &[&str] = &[
    "10g", "50g", "100g", "150g", "200g", "250g", "300g", "500g", "700g", "1000g",
];

const ORIGINS: &[&str] = &[
    "China",
    "India",
    "Japan",
    "Sri Lanka",
    "Kenya",
    "Vietnam",
    "Taiwan",
    "Nepal",
    "Russia",
    "Georgia",
    "Iran",
    "Turkey",
];

/// Immutable word lists, one per name axis.
///
/// Category position matters: a product's `category_id` is the 1-based
/// position of its sampled category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub categories: Vec<String>,
    pub forms: Vec<String>,
    pub brands: Vec<String>,
    pub editions: Vec<String>,
    pub packaging: Vec<String>,
    pub weights: Vec<String>,
    pub origins: Vec<String>,
    pub years: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            categories: owned(CATEGORIES),
            forms: owned(FORMS),
            brands: owned(BRANDS),
            editions: owned(EDITIONS),
            packaging: owned(PACKAGING),
            weights: owned(WEIGHTS),
            origins: owned(ORIGINS),
            years: (FIRST_YEAR..=LAST_YEAR).map(|y| y.to_string()).collect(),
        }
    }
}

impl Vocabulary {
    /// Axis names paired with their word lists, in name order
    pub fn axes(&self) -> [(&'static str, &[String]); 8] {
        [
            ("categories", self.categories.as_slice()),
            ("forms", self.forms.as_slice()),
            ("brands", self.brands.as_slice()),
            ("editions", self.editions.as_slice()),
            ("packaging", self.packaging.as_slice()),
            ("weights", self.weights.as_slice()),
            ("origins", self.origins.as_slice()),
            ("years", self.years.as_slice()),
        ]
    }

    /// Reject vocabularies with an empty axis (sampling would divide by zero)
    /// or a category list that does not match the category table
    pub fn validate(&self) -> Result<()> {
        for (axis, words) in self.axes() {
            if words.is_empty() {
                crate::bail_invalid!("vocabulary", format!("axis `{}` is empty", axis));
            }
        }
        if self.category_count() != CATEGORY_COUNT {
            crate::bail_invalid!(
                "vocabulary",
                format!(
                    "axis `categories` has {} entries, expected {}",
                    self.category_count(),
                    CATEGORY_COUNT
                )
            );
        }
        Ok(())
    }

    /// Number of categories, i.e. the largest valid `category_id`
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_axis_sizes() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.categories.len(), 7);
        assert_eq!(vocab.forms.len(), 6);
        assert_eq!(vocab.brands.len(), 29);
        assert_eq!(vocab.editions.len(), 6);
        assert_eq!(vocab.packaging.len(), 7);
        assert_eq!(vocab.weights.len(), 10);
        assert_eq!(vocab.origins.len(), 12);
        assert_eq!(vocab.years.len(), 95);
        assert_eq!(vocab.years.first().map(String::as_str), Some("1930"));
        assert_eq!(vocab.years.last().map(String::as_str), Some("2024"));
    }

    #[test]
    fn test_default_validates() {
        assert!(Vocabulary::default().validate().is_ok());
    }

    #[test]
    fn test_empty_axis_rejected() {
        let vocab = Vocabulary {
            origins: Vec::new(),
            ..Vocabulary::default()
        };
        let err = vocab.validate().unwrap_err();
        assert!(err.to_string().contains("origins"));
    }

    #[test]
    fn test_category_count_must_match_table() {
        let mut vocab = Vocabulary::default();
        vocab
            .categories
            .extend(["Herbal tea", "Matcha", "Rooibos"].map(String::from));
        assert_eq!(vocab.category_count(), 10);
        let err = vocab.validate().unwrap_err();
        assert!(err.to_string().contains("categories"));
        assert!(err.to_string().contains("expected 7"));

        vocab.categories.truncate(3);
        assert!(vocab.validate().is_err());
    }

    #[test]
    fn test_renamed_categories_accepted() {
        let vocab: Vocabulary =
            toml::from_str(r#"categories = ["a", "b", "c", "d", "e", "f", "g"]"#).unwrap();
        assert!(vocab.validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let vocab: Vocabulary = toml::from_str(r#"weights = ["1kg"]"#).unwrap();
        assert_eq!(vocab.weights, vec!["1kg".to_string()]);
        assert_eq!(vocab.categories.len(), 7);
    }
}
