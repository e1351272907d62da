//! Synthetic product rows
//!
//! Every axis is sampled independently: draw a uniform integer from a wide
//! range, reduce it modulo the axis size, and splice the chosen words into
//! the name with fixed connective phrases.

use rand::Rng;
use serde::Serialize;

use crate::vocabulary::Vocabulary;

/// Upper bound (inclusive) of the raw draw reduced onto each axis
pub const WIDE_DRAW_MAX: u32 = 100_000_000;

/// Exclusive upper bounds for the numeric columns
pub const PRICE_MODULUS: u32 = 1000;
pub const STOCK_MODULUS: u32 = 100;

/// Value written to every row's `description` column
pub const DESCRIPTION_PLACEHOLDER: &str = "-";

/// Connective phrases, in the order they appear in a name
pub const PACKAGING_LABEL: &str = ". Packaging: ";
pub const WEIGHT_LABEL: &str = ". Weight: ";
pub const ORIGIN_LABEL: &str = ". Origin: ";
pub const YEAR_LABEL: &str = ". Production year: ";

/// One row destined for the `Products` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: i32,
    pub stock_quantity: i32,
    pub category_id: i32,
}

fn draw<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(1..=WIDE_DRAW_MAX)
}

fn pick<'v, R: Rng>(rng: &mut R, words: &'v [String]) -> &'v str {
    &words[draw(rng) as usize % words.len()]
}

impl Product {
    /// Compose one random product.
    ///
    /// `vocab` must have passed [`Vocabulary::validate`]; an empty axis panics
    /// on the modulo.
    pub fn synthesize<R: Rng>(vocab: &Vocabulary, rng: &mut R) -> Self {
        let category_index = draw(rng) as usize % vocab.category_count();

        let name = format!(
            "{} {} {} {}{}{}{}{}{}{}{}{}.",
            vocab.categories[category_index],
            pick(rng, &vocab.forms),
            pick(rng, &vocab.brands),
            pick(rng, &vocab.editions),
            PACKAGING_LABEL,
            pick(rng, &vocab.packaging),
            WEIGHT_LABEL,
            pick(rng, &vocab.weights),
            ORIGIN_LABEL,
            pick(rng, &vocab.origins),
            YEAR_LABEL,
            pick(rng, &vocab.years),
        );

        Product {
            name,
            description: DESCRIPTION_PLACEHOLDER.to_string(),
            price: (draw(rng) % PRICE_MODULUS) as i32,
            stock_quantity: (draw(rng) % STOCK_MODULUS) as i32,
            category_id: category_index as i32 + 1,
        }
    }
}
