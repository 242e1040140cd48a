use serde::{Deserialize, Serialize};

/// One catalog row. Loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub pid: String,
    pub url: String,
    pub name: String,
    pub category_tree: String,
    pub retail_price: Option<f64>,
    pub discounted_price: Option<f64>,
    pub image: String,
    /// Flipkart Advantage program eligibility.
    pub flipkart_advantage: bool,
    pub description: String,
    pub product_rating: Option<f64>,
    pub overall_rating: Option<f64>,
    pub brand: Option<String>,
    pub specifications: String,
}

impl ProductRecord {
    /// Render the record with the fixed template used for the semantic index.
    pub fn document_text(&self) -> String {
        format!(
            "Product Name: {}\n\
             Category Tree: {}\n\
             Retail Price: ₹{}\n\
             Discounted Price: ₹{}\n\
             Brand: {}\n\
             Product Rating: {}\n\
             Overall Rating: {}\n\
             Description: {}\n\
             Specifications: {}",
            self.name,
            self.category_tree,
            display_optional(self.retail_price.map(format_amount)),
            display_optional(self.discounted_price.map(format_amount)),
            display_optional(self.brand.clone()),
            display_optional(self.product_rating.map(format_rating)),
            display_optional(self.overall_rating.map(format_rating)),
            self.description,
            self.specifications,
        )
    }
}

/// Format a price without a trailing `.0` for whole amounts.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

pub fn format_rating(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn display_optional(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}
