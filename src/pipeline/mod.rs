pub mod classifier;
pub mod column_resolver;
pub mod keywords;
pub mod record_builder;
pub mod text;

pub use classifier::{detect_subcategory, CategoryClassifier};
pub use column_resolver::{resolve, ColumnResolution, FieldAliasTable, CORE_FIELDS};
pub use keywords::KeywordGenerator;
pub use record_builder::{fold, FoldOutcome};

use crate::models::{PipelineOutput, RawRow, RowSet};
use anyhow::Result;
use tracing::info;

/// Runs the whole ingestion transform over one parsed source:
/// resolve the header set once, fold rows into drafts, seed categories from
/// the classifier where the source declared none, then the keyword pass.
pub fn run_pipeline(row_set: &RowSet, seller_id: &str) -> Result<PipelineOutput> {
    let alias_table = FieldAliasTable::new();
    let resolution = resolve(&alias_table, &row_set.columns);

    let outcome = fold(row_set, &resolution, &alias_table, seller_id);
    info!(
        "Folded {} rows into {} drafts ({} skipped)",
        row_set.rows.len(),
        outcome.drafts.len(),
        outcome.skipped_rows
    );

    let classifier = CategoryClassifier::new();
    let generator = KeywordGenerator::new();
    let mut drafts = outcome.drafts;

    for draft in &mut drafts {
        if draft.category.trim().is_empty() {
            // The classifier sees everything text-bearing the draft carries:
            // the core fields plus the passthrough map, where columns like
            // tags/type/keywords land.
            let mut record: RawRow = draft.extra.clone().into_iter().collect();
            record.insert("name".to_string(), draft.name.clone());
            record.insert("description".to_string(), draft.description.clone());
            record.insert("subcategory".to_string(), draft.subcategory.clone());

            let guess = classifier.detect_category(&record);
            draft.category = guess.category;
            if draft.subcategory.trim().is_empty() {
                draft.subcategory = guess.subcategory;
            }
        }

        draft.search_keywords =
            generator.generate(&draft.name, &draft.category, &draft.subcategory);
    }

    Ok(PipelineOutput {
        drafts,
        skipped_rows: outcome.skipped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;

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

    #[test]
    fn test_end_to_end_blue_cap() {
        let set = row_set(
            &["Product ID", "Title", "Price", "Stock", "Size"],
            &[
                &["P1", "Blue Cap", "199", "10", ""],
                &["P1", "Blue Cap", "199", "5", "L"],
            ],
        );

        let output = run_pipeline(&set, "seller-7").unwrap();
        assert_eq!(output.drafts.len(), 1);

        let draft = &output.drafts[0];
        assert_eq!(draft.name, "Blue Cap");
        assert_eq!(draft.price, 199.0);
        // Only the sized row contributes stock.
        assert_eq!(draft.stock, 5);
        assert_eq!(draft.size_variants.len(), 1);
        assert_eq!(draft.size_variants[0].size, "L");
        assert_eq!(draft.size_variants[0].stock, 5);
        assert_eq!(draft.seller_id, "seller-7");
        assert!(draft.search_keywords.contains(&"blue cap".to_string()));
    }

    #[test]
    fn test_classifier_seeds_missing_category() {
        let set = row_set(
            &["Product ID", "Title"],
            &[&["P1", "Android Smartphone 128GB"]],
        );

        let output = run_pipeline(&set, "s").unwrap();
        assert_eq!(output.drafts[0].category, "Mobiles");
        assert!(!output.drafts[0].subcategory.is_empty());
    }

    #[test]
    fn test_passthrough_columns_reach_the_classifier() {
        // The only classifiable signal is a tags column, which lands in the
        // extra map; the cascade must still see it.
        let set = row_set(
            &["Product ID", "Title", "tags"],
            &[&["P1", "Mystery Item", "smartphone android"]],
        );

        let output = run_pipeline(&set, "s").unwrap();
        assert_eq!(output.drafts[0].category, "Mobiles");
    }

    #[test]
    fn test_declared_category_is_not_overridden() {
        let set = row_set(
            &["Product ID", "Title", "Category"],
            &[&["P1", "Android Smartphone", "Refurbished"]],
        );

        let output = run_pipeline(&set, "s").unwrap();
        assert_eq!(output.drafts[0].category, "Refurbished");
    }

    #[test]
    fn test_keywords_generated_for_every_draft() {
        let set = row_set(&["Product ID", "Title"], &[&["P1", "Red Tshirt"]]);

        let output = run_pipeline(&set, "s").unwrap();
        let keywords = &output.drafts[0].search_keywords;
        assert!(keywords.contains(&"red".to_string()));
        assert!(keywords.contains(&"tee".to_string()));
    }
}
