use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::models::{ProductDraft, RawRow, RowSet, SizeVariant};
use crate::pipeline::column_resolver::{ColumnResolution, FieldAliasTable, CORE_FIELDS};
use crate::pipeline::text::{coerce_int, coerce_number, strip_html};

/// Result of folding one row set: grouped drafts plus how many rows were
/// dropped for lacking any product identifier.
#[derive(Debug)]
pub struct FoldOutcome {
    pub drafts: Vec<ProductDraft>,
    pub skipped_rows: usize,
}

/// Folds raw rows into product drafts grouped by product id.
///
/// The accumulator is local to one call; concurrent ingestions never share
/// state. Drafts come back in first-encounter order of their product id.
pub fn fold(
    row_set: &RowSet,
    resolution: &ColumnResolution,
    alias_table: &FieldAliasTable,
    seller_id: &str,
) -> FoldOutcome {
    let mut drafts: HashMap<String, ProductDraft> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut skipped_rows = 0;

    for (index, row) in row_set.rows.iter().enumerate() {
        let Some(product_id) = derive_product_id(row, row_set, resolution) else {
            skipped_rows += 1;
            warn!("Skipping row {}: no product identifier", index);
            continue;
        };

        let draft = match drafts.entry(product_id.clone()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                order.push(product_id.clone());
                entry.insert(init_draft(&product_id, row, row_set, resolution, seller_id))
            }
        };

        accumulate_size_variant(draft, row, resolution);
        merge_extra_fields(draft, row, row_set, alias_table);
    }

    let drafts = order
        .into_iter()
        .filter_map(|id| drafts.remove(&id))
        .collect();

    FoldOutcome {
        drafts,
        skipped_rows,
    }
}

/// Product id precedence: explicit id column, then a literal `id` column,
/// then the SKU. Rows lacking all three are skipped silently.
fn derive_product_id(
    row: &RawRow,
    row_set: &RowSet,
    resolution: &ColumnResolution,
) -> Option<String> {
    if let Some(id) = resolution.value("product_id", row) {
        if !id.trim().is_empty() {
            return Some(id.trim().to_string());
        }
    }

    // Scanned in header order so duplicate id-spelled columns resolve the
    // same way every run.
    for column in &row_set.columns {
        if column.trim().to_lowercase() != "id" {
            continue;
        }
        if let Some(value) = row.get(column) {
            if !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
    }

    if let Some(sku) = resolution.value("sku", row) {
        if !sku.trim().is_empty() {
            return Some(sku.trim().to_string());
        }
    }

    None
}

fn init_draft(
    product_id: &str,
    row: &RawRow,
    row_set: &RowSet,
    resolution: &ColumnResolution,
    seller_id: &str,
) -> ProductDraft {
    let resolved = |field: &str| -> String {
        resolution
            .value(field, row)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let name = {
        let n = resolved("name");
        if n.is_empty() { "Untitled".to_string() } else { n }
    };

    let price = coerce_number(&resolved("price"));
    // The price fallback applies only when the source has no offer-price
    // column at all; a resolved-but-empty cell coerces to 0 like any other
    // numeric field.
    let offer_price = match resolution.column("offer_price") {
        Some(_) => coerce_number(&resolved("offer_price")),
        None => price,
    };

    ProductDraft {
        product_id: product_id.to_string(),
        name_lower: name.to_lowercase(),
        name,
        description: strip_html(&resolved("description")),
        category: resolved("category"),
        subcategory: resolved("subcategory"),
        base_sku: resolved("base_sku"),
        brand: resolved("brand"),
        price,
        offer_price,
        // Stock only ever enters through the size-variant path, so it is
        // always a sum; the first row's own stock value is not written here.
        stock: 0,
        images: collect_images(row, row_set),
        seller_id: seller_id.to_string(),
        size_variants: Vec::new(),
        search_keywords: Vec::new(),
        extra: BTreeMap::new(),
    }
}

/// Scans every available column (not just resolved ones) for image-like
/// names and keeps the first row's non-empty values in column order. Later
/// rows for the same product share this image set and are not re-scanned.
fn collect_images(row: &RawRow, row_set: &RowSet) -> Vec<String> {
    let mut images = Vec::new();

    for column in &row_set.columns {
        let lowered = column.to_lowercase();
        if !lowered.contains("image") && !lowered.contains("img") {
            continue;
        }
        if let Some(value) = row.get(column) {
            if !value.trim().is_empty() {
                images.push(value.trim().to_string());
            }
        }
    }

    images
}

/// Rows declaring a non-empty size append a variant and add their stock to
/// the draft's running total. Rows without a size leave stock untouched.
fn accumulate_size_variant(draft: &mut ProductDraft, row: &RawRow, resolution: &ColumnResolution) {
    let size = resolution
        .value("size", row)
        .map(str::trim)
        .unwrap_or_default();
    if size.is_empty() {
        return;
    }

    let stock = coerce_int(resolution.value("stock", row).unwrap_or_default());
    let variant = SizeVariant {
        size: size.to_string(),
        stock,
        sku: resolution
            .value("sku", row)
            .map(|v| v.trim().to_string())
            .unwrap_or_default(),
        price: coerce_number(resolution.value("price", row).unwrap_or_default()),
    };

    draft.stock += stock;
    draft.size_variants.push(variant);
}

/// Passes unrecognized columns through verbatim, keyed by the trimmed
/// original column name. Later rows for the same product overwrite earlier
/// values for the same key.
fn merge_extra_fields(
    draft: &mut ProductDraft,
    row: &RawRow,
    row_set: &RowSet,
    alias_table: &FieldAliasTable,
) {
    for column in &row_set.columns {
        let lowered = column.trim().to_lowercase();

        if alias_table.is_alias_column(column) {
            continue;
        }
        if CORE_FIELDS.contains(&lowered.as_str()) {
            continue;
        }
        if lowered.starts_with("image") || lowered.starts_with("img") {
            continue;
        }
        if lowered == "size" {
            continue;
        }

        if let Some(value) = row.get(column) {
            if !value.trim().is_empty() {
                draft
                    .extra
                    .insert(column.trim().to_string(), value.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;
    use crate::pipeline::column_resolver::resolve;

    fn row_set(columns: &[&str], rows: &[&[&str]]) -> RowSet {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|values| {
                columns
                    .iter()
                    .cloned()
                    .zip(values.iter().map(|v| v.to_string()))
                    .collect()
            })
            .collect();

        RowSet {
            source: SourceKind::Csv,
            columns,
            rows,
        }
    }

    fn fold_all(set: &RowSet) -> FoldOutcome {
        let table = FieldAliasTable::new();
        let resolution = resolve(&table, &set.columns);
        fold(set, &resolution, &table, "seller-1")
    }

    #[test]
    fn test_grouping_and_stock_sum() {
        let set = row_set(
            &["Product ID", "Size", "Stock"],
            &[
                &["A", "S", "5"],
                &["A", "M", "3"],
                &["B", "", "9"],
            ],
        );

        let outcome = fold_all(&set);
        assert_eq!(outcome.drafts.len(), 2);
        assert_eq!(outcome.skipped_rows, 0);

        let a = &outcome.drafts[0];
        assert_eq!(a.product_id, "A");
        assert_eq!(a.size_variants.len(), 2);
        assert_eq!(a.stock, 8);

        // A row without a size never contributes stock, even though a stock
        // column was present and resolved.
        let b = &outcome.drafts[1];
        assert_eq!(b.product_id, "B");
        assert_eq!(b.size_variants.len(), 0);
        assert_eq!(b.stock, 0);
    }

    #[test]
    fn test_stock_invariant_matches_variant_sum() {
        let set = row_set(
            &["Product ID", "Size", "Stock"],
            &[&["A", "S", "4"], &["A", "L", "7"], &["A", "XL", "1"]],
        );

        let outcome = fold_all(&set);
        let draft = &outcome.drafts[0];
        let variant_sum: i64 = draft.size_variants.iter().map(|v| v.stock).sum();
        assert_eq!(draft.stock, variant_sum);
    }

    #[test]
    fn test_rows_without_identifier_are_skipped() {
        let set = row_set(
            &["Product ID", "Title"],
            &[&["", "Ghost"], &["P1", "Real"]],
        );

        let outcome = fold_all(&set);
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.skipped_rows, 1);
        assert_eq!(outcome.drafts[0].name, "Real");
    }

    #[test]
    fn test_identifier_precedence_falls_back_to_sku() {
        let set = row_set(&["SKU", "Title"], &[&["SKU-9", "Belt"]]);

        let outcome = fold_all(&set);
        assert_eq!(outcome.drafts[0].product_id, "SKU-9");
    }

    #[test]
    fn test_first_row_initializes_price_and_defaults() {
        let set = row_set(
            &["Product ID", "Title", "Price", "Size", "Stock"],
            &[&["P1", "", "250", "S", "2"], &["P1", "Late Name", "999", "M", "4"]],
        );

        let outcome = fold_all(&set);
        let draft = &outcome.drafts[0];

        // Name defaults on an empty first row and is not revised later.
        assert_eq!(draft.name, "Untitled");
        assert_eq!(draft.name_lower, "untitled");
        // Price comes from the first row only.
        assert_eq!(draft.price, 250.0);
        // Offer price defaults to price when no offer column exists.
        assert_eq!(draft.offer_price, 250.0);
        assert_eq!(draft.stock, 6);
    }

    #[test]
    fn test_resolved_but_empty_offer_price_coerces_to_zero() {
        let set = row_set(
            &["Product ID", "Price", "Offer Price"],
            &[&["P1", "250", ""]],
        );

        let outcome = fold_all(&set);
        let draft = &outcome.drafts[0];
        assert_eq!(draft.price, 250.0);
        // An offer-price column exists, so its empty cell does not fall back
        // to the price.
        assert_eq!(draft.offer_price, 0.0);
    }

    #[test]
    fn test_duplicate_id_columns_resolve_in_header_order() {
        // Two headers normalize to "id"; the first one in header order must
        // win on every run. (Neither spelling matches the product-id
        // aliases, so the generic-id fallback is what derives the key.)
        let set = row_set(&["ID", "Id ", "Title"], &[&["first", "second", "Cap"]]);

        let outcome = fold_all(&set);
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].product_id, "first");
    }

    #[test]
    fn test_description_is_html_stripped() {
        let set = row_set(
            &["Product ID", "Description"],
            &[&["P1", "<p>Pure <b>cotton</b> &amp; soft</p>"]],
        );

        let outcome = fold_all(&set);
        assert_eq!(outcome.drafts[0].description, "Pure cotton & soft");
    }

    #[test]
    fn test_images_collected_from_first_row_only() {
        let set = row_set(
            &["Product ID", "Image URL", "img2", "Size", "Stock"],
            &[
                &["P1", "a.jpg", "b.jpg", "S", "1"],
                &["P1", "c.jpg", "d.jpg", "M", "1"],
            ],
        );

        let outcome = fold_all(&set);
        assert_eq!(outcome.drafts[0].images, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_extra_field_passthrough_last_write_wins() {
        let set = row_set(
            &["Product ID", "Material", "Size", "Stock"],
            &[&["P1", "Cotton", "S", "1"], &["P1", "Silk", "M", "1"]],
        );

        let outcome = fold_all(&set);
        assert_eq!(
            outcome.drafts[0].extra.get("Material").map(String::as_str),
            Some("Silk")
        );
    }

    #[test]
    fn test_extra_fields_exclude_alias_image_and_size_columns() {
        let set = row_set(
            &["Product ID", "MRP", "Image Link", "Size", "Color"],
            &[&["P1", "100", "x.jpg", "L", "Blue"]],
        );

        let outcome = fold_all(&set);
        let extra = &outcome.drafts[0].extra;
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("Color").map(String::as_str), Some("Blue"));
    }

    #[test]
    fn test_unparseable_numbers_coerce_to_zero() {
        let set = row_set(
            &["Product ID", "Price", "Size", "Stock"],
            &[&["P1", "call us", "S", "soon"]],
        );

        let outcome = fold_all(&set);
        let draft = &outcome.drafts[0];
        assert_eq!(draft.price, 0.0);
        assert_eq!(draft.stock, 0);
        assert_eq!(draft.size_variants[0].stock, 0);
    }

    #[test]
    fn test_seller_id_applied_pipeline_wide() {
        let set = row_set(&["Product ID"], &[&["P1"], &["P2"]]);

        let outcome = fold_all(&set);
        assert!(outcome.drafts.iter().all(|d| d.seller_id == "seller-1"));
    }
}
