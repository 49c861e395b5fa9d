use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Provenance tag for a parsed source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    Xlsx,
    Json,
}

/// One raw input row, keyed by the column name exactly as it appeared in the
/// source header. All values are carried as strings; numeric coercion happens
/// later in the record builder.
pub type RawRow = HashMap<String, String>;

/// Uniform output of all source readers. `columns` preserves the header order
/// (or first-seen key order for JSON sources), which matters for the image
/// scan and extra-field passthrough.
#[derive(Debug, Clone)]
pub struct RowSet {
    pub source: SourceKind,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RowSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-size stock/price/SKU entry attached to a product sold in multiple sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeVariant {
    pub size: String,
    pub stock: i64,
    pub sku: String,
    pub price: f64,
}

/// The in-memory accumulation of one product's fields during ingestion.
///
/// Created on the first row bearing a new product id, mutated by every
/// subsequent row sharing that id, finalized once with the keyword pass.
/// Serializes with camelCase names since the output documents feed the
/// storefront directly; unrecognized source columns are flattened in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub product_id: String,
    pub name: String,
    /// Lowercased name stored as its own field for case-insensitive search.
    pub name_lower: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub base_sku: String,
    pub brand: String,
    /// Taken from the first row seen for this product id.
    pub price: f64,
    pub offer_price: f64,
    /// Always the sum over size variants; rows without a size never set it.
    pub stock: i64,
    pub images: Vec<String>,
    pub seller_id: String,
    pub size_variants: Vec<SizeVariant>,
    pub search_keywords: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Best-guess category assignment from the keyword cascade. Only ever used to
/// seed `category`/`subcategory` on a draft whose source rows did not declare
/// them; never persisted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGuess {
    pub category: String,
    pub subcategory: String,
    pub confidence: f64,
}

/// Result of running the full pipeline over one source file.
#[derive(Debug)]
pub struct PipelineOutput {
    pub drafts: Vec<ProductDraft>,
    /// Rows dropped because no product identifier could be derived.
    pub skipped_rows: usize,
}
