/// Aggregate questions the structured engine knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    PriceRange,
    PriceBelow,
    PriceAbove,
    HighestRatedBrand,
    MostCommonBrand,
    FlipkartAdvantageCount,
    Unrecognized,
}

/// Ordered decision table; the first row with a matching keyword wins.
/// Keywords are matched as substrings of the lower-cased question.
pub const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (Intent::PriceRange, &["price range"]),
    (Intent::PriceBelow, &["under", "below"]),
    (Intent::PriceAbove, &["above", "over"]),
    (Intent::HighestRatedBrand, &["highest-rated brand"]),
    (Intent::MostCommonBrand, &["most common brand"]),
    (Intent::FlipkartAdvantageCount, &["flipkart advantage"]),
];

impl Intent {
    /// Classify an already lower-cased question.
    pub fn classify(lower_question: &str) -> Intent {
        INTENT_TABLE
            .iter()
            .find(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|&keyword| lower_question.contains(keyword))
            })
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Unrecognized)
    }
}
