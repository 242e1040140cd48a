//! Aggregate and filter answers computed directly over the catalog.
//!
//! [`StructuredQueryEngine::answer`] never fails: questions it cannot
//! compute get a guidance string instead of an error.

mod intent;

pub use intent::{Intent, INTENT_TABLE};

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{format_amount, format_rating, ProductRecord};

pub const FALLBACK_MESSAGE: &str = "This question cannot be answered with structured data. \
     Try rephrasing or ask about prices, brands, or filters.";
pub const MISSING_UPPER_PRICE: &str = "Please specify a price to filter under.";
pub const MISSING_LOWER_PRICE: &str = "Please specify a price to filter above.";

/// Maximum number of products listed for an "above" filter.
pub const TOP_ABOVE_LIMIT: usize = 5;

/// First run of 2 to 7 ASCII digits in the question.
const PRICE_PATTERN: &str = r"([0-9]{2,7})";

pub struct StructuredQueryEngine {
    catalog: Arc<Catalog>,
    price_pattern: Regex,
}

impl StructuredQueryEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            price_pattern: Regex::new(PRICE_PATTERN).expect("price pattern is valid"),
        }
    }

    pub fn answer(&self, question: &str) -> String {
        let q = question.to_lowercase();
        let intent = Intent::classify(&q);
        debug!(?intent, question, "Structured query");

        match intent {
            Intent::PriceRange => self.price_range(),
            Intent::PriceBelow => match self.extract_price(&q) {
                Some(threshold) => self.count_below(threshold),
                None => MISSING_UPPER_PRICE.to_string(),
            },
            Intent::PriceAbove => match self.extract_price(&q) {
                Some(threshold) => self.top_rated_above(threshold),
                None => MISSING_LOWER_PRICE.to_string(),
            },
            Intent::HighestRatedBrand => self.highest_rated_brand(),
            Intent::MostCommonBrand => self.most_common_brand(),
            Intent::FlipkartAdvantageCount => self.flipkart_advantage_count(),
            Intent::Unrecognized => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Extract the first 2-7 digit number; zero counts as no number.
    pub fn extract_price(&self, text: &str) -> Option<u64> {
        self.price_pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .filter(|price| *price > 0)
    }

    fn records(&self) -> &[ProductRecord] {
        self.catalog.records()
    }

    fn price_range(&self) -> String {
        let mut prices = self.records().iter().filter_map(|r| r.discounted_price);
        let Some(first) = prices.next() else {
            return "No price information is available in the catalog.".to_string();
        };
        let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        format!(
            "The price range of all products is ₹{} to ₹{}.",
            format_amount(min),
            format_amount(max)
        )
    }

    fn count_below(&self, threshold: u64) -> String {
        let limit = threshold as f64;
        let count = self
            .records()
            .iter()
            .filter(|r| r.discounted_price.is_some_and(|p| p < limit))
            .count();
        format!("There are {} products under ₹{}.", count, threshold)
    }

    fn top_rated_above(&self, threshold: u64) -> String {
        let limit = threshold as f64;
        let mut matches: Vec<&ProductRecord> = self
            .records()
            .iter()
            .filter(|r| r.discounted_price.is_some_and(|p| p > limit))
            .collect();

        if matches.is_empty() {
            return format!("No products found above ₹{}.", threshold);
        }

        // Stable sort: equal ratings keep catalog order, unrated products last.
        matches.sort_by(|a, b| rating_descending(a.overall_rating, b.overall_rating));

        let lines: Vec<String> = matches
            .iter()
            .take(TOP_ABOVE_LIMIT)
            .map(|r| {
                format!(
                    "{} (₹{}, ⭐{})",
                    r.name,
                    r.discounted_price.map(format_amount).unwrap_or_default(),
                    r.overall_rating
                        .map(format_rating)
                        .unwrap_or_else(|| "n/a".to_string())
                )
            })
            .collect();

        format!("Top products above ₹{}:\n{}", threshold, lines.join("\n"))
    }

    /// Mean overall rating per brand, unrated products ignored. Brands are
    /// visited alphabetically and the first maximum wins, so ties resolve to
    /// the alphabetically smallest brand.
    fn highest_rated_brand(&self) -> String {
        let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for record in self.records() {
            if let (Some(brand), Some(rating)) = (record.brand.as_deref(), record.overall_rating) {
                let entry = totals.entry(brand).or_insert((0.0, 0));
                entry.0 += rating;
                entry.1 += 1;
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for (brand, (sum, count)) in totals {
            let mean = sum / count as f64;
            if best.map_or(true, |(_, top)| mean > top) {
                best = Some((brand, mean));
            }
        }

        match best {
            Some((brand, mean)) => format!(
                "The highest-rated brand is {} with an average rating of {:.2}.",
                brand, mean
            ),
            None => "No brand ratings are available in the catalog.".to_string(),
        }
    }

    /// Modal brand; ties go to the brand seen first in catalog order.
    fn most_common_brand(&self) -> String {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for brand in self.records().iter().filter_map(|r| r.brand.as_deref()) {
            let count = counts.entry(brand).or_insert(0);
            if *count == 0 {
                order.push(brand);
            }
            *count += 1;
        }

        let mut best: Option<(&str, usize)> = None;
        for brand in order {
            let count = counts.get(brand).copied().unwrap_or(0);
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((brand, count));
            }
        }

        match best {
            Some((brand, _)) => format!("The most common brand is {}.", brand),
            None => "No brand information is available in the catalog.".to_string(),
        }
    }

    fn flipkart_advantage_count(&self) -> String {
        let count = self
            .records()
            .iter()
            .filter(|r| r.flipkart_advantage)
            .count();
        format!("There are {} Flipkart Advantage products.", count)
    }
}

fn rating_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
