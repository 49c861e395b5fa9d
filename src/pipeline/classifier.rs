use crate::models::{CategoryGuess, RawRow};
use crate::pipeline::text::capitalize;

/// Attributes inspected, in priority order, when building the searchable text
/// blob for classification. Array-valued source fields are already joined
/// with spaces by the readers.
const TEXT_FIELDS: &[&str] = &[
    "name",
    "title",
    "description",
    "category",
    "subcategory",
    "type",
    "tags",
    "keywords",
];

/// One step of the classification cascade. Rules are evaluated strictly in
/// declaration order and the first hit wins, so broad high-confidence rules
/// sit above the keyword tables they would otherwise shadow.
enum Rule {
    /// A single keyword hit assigns a fixed category/subcategory.
    Single {
        keyword: &'static str,
        category: &'static str,
        subcategory: &'static str,
        confidence: f64,
    },
    /// A keyword list with a fixed confidence; the matched keyword itself
    /// (capitalized) becomes the subcategory.
    List {
        category: &'static str,
        keywords: &'static [&'static str],
        confidence: f64,
    },
    /// A per-category keyword table: confidence scales with how many of the
    /// keywords occur, capped at 1.0, and the first matching keyword in list
    /// order supplies the subcategory.
    Table {
        category: &'static str,
        keywords: &'static [&'static str],
    },
}

const CLOTHING_KEYWORDS: &[&str] = &[
    "tshirt", "shirt", "jeans", "kurta", "saree", "dress", "trouser", "hoodie", "jacket",
];

const MOBILE_TABLE: &[&str] = &[
    "smartphone", "iphone", "android", "5g", "dual sim", "touchscreen", "selfie", "earphone",
    "charger", "power bank",
];

const LAPTOP_TABLE: &[&str] = &[
    "macbook", "notebook", "chromebook", "ultrabook", "gaming laptop", "ssd", "ryzen", "intel",
];

const ELECTRONICS_TABLE: &[&str] = &[
    "television", "tv", "speaker", "headphone", "camera", "tablet", "smartwatch", "monitor",
    "router", "printer",
];

const FOOTWEAR_TABLE: &[&str] = &[
    "sneaker", "sandal", "slipper", "loafer", "boot", "heel", "running shoe", "flip flop",
];

const JEWELLERY_TABLE: &[&str] = &[
    "ring", "necklace", "earring", "bracelet", "bangle", "pendant", "gold", "silver", "diamond",
];

const HOME_TABLE: &[&str] = &[
    "cushion", "curtain", "bedsheet", "cookware", "lamp", "furniture", "mattress", "towel",
    "storage box",
];

const CLOTHING_TABLE: &[&str] = &[
    "cotton", "polo", "sleeve", "collar", "denim", "ethnic wear", "innerwear", "legging",
    "shorts", "sweater",
];

const BEAUTY_TABLE: &[&str] = &[
    "lipstick", "shampoo", "moisturizer", "serum", "sunscreen", "perfume", "kajal", "face wash",
];

const SPORTS_TABLE: &[&str] = &[
    "cricket", "football", "badminton", "yoga mat", "dumbbell", "cycling", "treadmill",
];

/// Keyword-cascade category classifier for product records that do not
/// declare a category of their own.
pub struct CategoryClassifier {
    rules: Vec<Rule>,
}

impl CategoryClassifier {
    pub fn new() -> Self {
        let rules = vec![
            // Highest-priority singles for the two most common categories.
            Rule::Single {
                keyword: "phone",
                category: "Mobiles",
                subcategory: "Smartphones",
                confidence: 0.9,
            },
            Rule::Single {
                keyword: "mobile",
                category: "Mobiles",
                subcategory: "Smartphones",
                confidence: 0.9,
            },
            Rule::Single {
                keyword: "laptop",
                category: "Laptops",
                subcategory: "Laptops",
                confidence: 0.9,
            },
            // Common clothing words; the matched word doubles as subcategory.
            Rule::List {
                category: "Clothing",
                keywords: CLOTHING_KEYWORDS,
                confidence: 0.8,
            },
            // Per-category keyword tables, scored by match count.
            Rule::Table {
                category: "Mobiles",
                keywords: MOBILE_TABLE,
            },
            Rule::Table {
                category: "Laptops",
                keywords: LAPTOP_TABLE,
            },
            Rule::Table {
                category: "Electronics",
                keywords: ELECTRONICS_TABLE,
            },
            Rule::Table {
                category: "Footwear",
                keywords: FOOTWEAR_TABLE,
            },
            Rule::Table {
                category: "Jewellery",
                keywords: JEWELLERY_TABLE,
            },
            Rule::Table {
                category: "Home & Kitchen",
                keywords: HOME_TABLE,
            },
            Rule::Table {
                category: "Clothing",
                keywords: CLOTHING_TABLE,
            },
            Rule::Table {
                category: "Beauty",
                keywords: BEAUTY_TABLE,
            },
            Rule::Table {
                category: "Sports",
                keywords: SPORTS_TABLE,
            },
            // Late low-specificity shortcuts.
            Rule::Single {
                keyword: "electronics",
                category: "Electronics",
                subcategory: "Electronics",
                confidence: 0.7,
            },
            Rule::Single {
                keyword: "shoe",
                category: "Footwear",
                subcategory: "Shoes",
                confidence: 0.7,
            },
            Rule::Single {
                keyword: "jewellery",
                category: "Jewellery",
                subcategory: "Jewellery",
                confidence: 0.7,
            },
        ];

        CategoryClassifier { rules }
    }

    /// Classify a record into a `(category, subcategory, confidence)` guess.
    /// First matching rule in cascade order wins; within a keyword list the
    /// first keyword in list order wins.
    pub fn detect_category(&self, record: &RawRow) -> CategoryGuess {
        let text = self.searchable_text(record);

        for rule in &self.rules {
            match rule {
                Rule::Single {
                    keyword,
                    category,
                    subcategory,
                    confidence,
                } => {
                    if text.contains(keyword) {
                        return CategoryGuess {
                            category: category.to_string(),
                            subcategory: subcategory.to_string(),
                            confidence: *confidence,
                        };
                    }
                }
                Rule::List {
                    category,
                    keywords,
                    confidence,
                } => {
                    if let Some(matched) = keywords.iter().find(|kw| text.contains(*kw)) {
                        return CategoryGuess {
                            category: category.to_string(),
                            subcategory: capitalize(matched),
                            confidence: *confidence,
                        };
                    }
                }
                Rule::Table { category, keywords } => {
                    let matches: Vec<&&str> =
                        keywords.iter().filter(|kw| text.contains(**kw)).collect();
                    if let Some(first) = matches.first() {
                        let confidence = (matches.len() as f64 * 0.2).min(1.0);
                        return CategoryGuess {
                            category: category.to_string(),
                            subcategory: capitalize(first),
                            confidence,
                        };
                    }
                }
            }
        }

        CategoryGuess {
            category: "Other".to_string(),
            subcategory: "General".to_string(),
            confidence: 0.1,
        }
    }

    /// Lowercase blob of every text-bearing attribute available on the
    /// record, concatenated in fixed priority order.
    fn searchable_text(&self, record: &RawRow) -> String {
        let mut parts = Vec::new();

        for field in TEXT_FIELDS {
            for (key, value) in record {
                if key.trim().to_lowercase() == *field && !value.trim().is_empty() {
                    parts.push(value.trim().to_lowercase());
                }
            }
        }

        parts.join(" ")
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Narrower subcategory refinement used by the product-edit call sites. It
/// runs its own ladder per category and deliberately stays independent of the
/// cascade's subcategory guess; callers pick which of the two to trust.
pub fn detect_subcategory(category: &str, name: &str, description: &str) -> String {
    let text = format!("{} {}", name, description).to_lowercase();

    match category.trim().to_lowercase().as_str() {
        "mobiles" => {
            if text.contains("5g") {
                "5G Phones".to_string()
            } else if text.contains("gaming") {
                "Gaming Phones".to_string()
            } else if text.contains("iphone") {
                "iPhone".to_string()
            } else {
                category.to_string()
            }
        }
        "laptops" => {
            if text.contains("gaming") {
                "Gaming Laptops".to_string()
            } else if text.contains("macbook") {
                "MacBook".to_string()
            } else if text.contains("chromebook") {
                "Chromebook".to_string()
            } else {
                category.to_string()
            }
        }
        "clothing" => {
            if text.contains("tshirt") || text.contains("t-shirt") {
                "Tshirts".to_string()
            } else if text.contains("shirt") {
                "Shirts".to_string()
            } else if text.contains("jeans") {
                "Jeans".to_string()
            } else if text.contains("dress") {
                "Dresses".to_string()
            } else {
                category.to_string()
            }
        }
        "footwear" => {
            if text.contains("sneaker") {
                "Sneakers".to_string()
            } else if text.contains("sandal") {
                "Sandals".to_string()
            } else if text.contains("boot") {
                "Boots".to_string()
            } else {
                category.to_string()
            }
        }
        "jewellery" => {
            if text.contains("ring") && !text.contains("earring") {
                "Rings".to_string()
            } else if text.contains("necklace") {
                "Necklaces".to_string()
            } else if text.contains("earring") {
                "Earrings".to_string()
            } else {
                category.to_string()
            }
        }
        _ => category.to_string(),
    }
}
