use std::collections::HashMap;

/// Semantic fields that are always written into the output document, even
/// when the source had no matching column.
pub const CORE_FIELDS: &[&str] = &[
    "product_id",
    "name",
    "description",
    "category",
    "subcategory",
    "base_sku",
    "brand",
    "price",
    "offer_price",
    "stock",
    "sku",
    "size",
];

/// Static table mapping each semantic field to the header spellings we accept
/// for it, in precedence order. Earlier aliases win over later ones no matter
/// where the columns sit in the source file.
pub struct FieldAliasTable {
    fields: Vec<(&'static str, Vec<&'static str>)>,
}

impl FieldAliasTable {
    pub fn new() -> Self {
        let fields = vec![
            (
                "product_id",
                vec!["product id", "productid", "product_id", "item id", "item_id"],
            ),
            (
                "name",
                vec!["name", "title", "product name", "item name", "product title"],
            ),
            (
                "description",
                vec!["description", "desc", "details", "product description"],
            ),
            ("price", vec!["price", "mrp", "selling price", "sale price"]),
            (
                "offer_price",
                vec![
                    "offer price",
                    "offerprice",
                    "discounted price",
                    "special price",
                    "deal price",
                ],
            ),
            ("stock", vec!["stock", "quantity", "qty", "inventory", "units"]),
            ("sku", vec!["sku", "sku code", "item code", "barcode"]),
            (
                "base_sku",
                vec!["base sku", "basesku", "parent sku", "style code"],
            ),
            ("brand", vec!["brand", "brand name", "manufacturer", "make"]),
            (
                "category",
                vec!["category", "product category", "department"],
            ),
            (
                "subcategory",
                vec!["subcategory", "sub category", "sub-category", "product type"],
            ),
            ("size", vec!["size", "variant size", "size name"]),
        ];

        FieldAliasTable { fields }
    }

    pub fn semantic_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(field, _)| *field)
    }

    pub fn aliases_for(&self, field: &str) -> Option<&[&'static str]> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, aliases)| aliases.as_slice())
    }

    /// Whether a source column name matches any alias of any semantic field,
    /// compared case-insensitively after trimming. Used by the extra-field
    /// passthrough to exclude columns the resolver already accounts for.
    pub fn is_alias_column(&self, column: &str) -> bool {
        let normalized = column.trim().to_lowercase();
        self.fields
            .iter()
            .any(|(_, aliases)| aliases.iter().any(|alias| *alias == normalized))
    }
}

impl Default for FieldAliasTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of resolving one source's header set: each semantic field bound to
/// the actual column that supplies it, or to nothing when the source simply
/// does not carry that field.
#[derive(Debug, Clone)]
pub struct ColumnResolution {
    bindings: HashMap<&'static str, Option<String>>,
}

impl ColumnResolution {
    /// The source column bound to a semantic field, if any.
    pub fn column(&self, field: &str) -> Option<&str> {
        self.bindings.get(field).and_then(|c| c.as_deref())
    }

    /// Convenience lookup of a row value through the binding.
    pub fn value<'a>(
        &self,
        field: &str,
        row: &'a std::collections::HashMap<String, String>,
    ) -> Option<&'a str> {
        self.column(field).and_then(|col| row.get(col)).map(|v| v.as_str())
    }
}

/// Resolve each semantic field to the matching source column: iterate the
/// field's alias list in declared order and take the first column whose
/// trimmed, lowercased name equals the alias. An unmatched field binds to
/// `None` — that source just doesn't carry it, which is not an error.
pub fn resolve(table: &FieldAliasTable, available_columns: &[String]) -> ColumnResolution {
    let mut bindings = HashMap::new();

    for (field, aliases) in &table.fields {
        let mut matched = None;

        'alias: for alias in aliases {
            for column in available_columns {
                if column.trim().to_lowercase() == *alias {
                    matched = Some(column.clone());
                    break 'alias;
                }
            }
        }

        bindings.insert(*field, matched);
    }

    ColumnResolution { bindings }
}
