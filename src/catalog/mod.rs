//! Product catalog loading.
//!
//! The catalog is a flat CSV export read once at startup. Missing required
//! columns abort startup. Short rows are padded with empty cells, and cells
//! that fail to parse as numbers are treated as missing values.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ChatbotError, Result};
use crate::models::ProductRecord;

pub const REQUIRED_FIELDS: &[&str] = &[
    "product_url",
    "product_name",
    "product_category_tree",
    "pid",
    "retail_price",
    "discounted_price",
    "image",
    "is_FK_Advantage_product",
    "description",
    "product_rating",
    "overall_rating",
    "brand",
    "product_specifications",
];

#[derive(Debug, Deserialize)]
struct CatalogRow {
    product_url: String,
    product_name: String,
    product_category_tree: String,
    pid: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    retail_price: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    discounted_price: Option<f64>,
    image: String,
    #[serde(rename = "is_FK_Advantage_product")]
    is_fk_advantage_product: String,
    description: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    product_rating: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    overall_rating: Option<f64>,
    brand: String,
    product_specifications: String,
}

impl From<CatalogRow> for ProductRecord {
    fn from(row: CatalogRow) -> Self {
        let brand = row.brand.trim();
        ProductRecord {
            pid: row.pid,
            url: row.product_url,
            name: row.product_name,
            category_tree: row.product_category_tree,
            retail_price: row.retail_price.filter(|p| p.is_finite()),
            discounted_price: row.discounted_price.filter(|p| p.is_finite()),
            image: row.image,
            flipkart_advantage: row.is_fk_advantage_product.trim().eq_ignore_ascii_case("true"),
            description: row.description,
            product_rating: row.product_rating.filter(|r| r.is_finite()),
            overall_rating: row.overall_rating.filter(|r| r.is_finite()),
            brand: if brand.is_empty() {
                None
            } else {
                Some(brand.to_string())
            },
            specifications: row.product_specifications,
        }
    }
}

/// Read-only product table shared by the structured engine and the index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ChatbotError::DatasetError(format!(
                "failed to open dataset {}: {}",
                path.display(),
                e
            ))
        })?;
        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = catalog.len(),
            "Loaded product catalog"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !headers.iter().any(|h| h == *field))
            .collect();
        if !missing.is_empty() {
            return Err(ChatbotError::DatasetError(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut records = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            let mut record = record?;
            if record.len() < headers.len() {
                debug!(row = line + 1, cells = record.len(), "Padding short catalog row");
                while record.len() < headers.len() {
                    record.push_field("");
                }
            }
            let row: CatalogRow = record.deserialize(Some(&headers)).map_err(|e| {
                ChatbotError::DatasetError(format!("row {}: {}", line + 1, e))
            })?;
            records.push(ProductRecord::from(row));
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
