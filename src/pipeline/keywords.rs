use regex::Regex;
use std::collections::BTreeSet;

/// Domain-specific synonym table. When the combined name/category/subcategory
/// text contains a key as a substring, the key and all of its synonyms join
/// the keyword set.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("tshirt", &["tee", "t-shirt", "tee shirt", "t shirt"]),
    ("mobile", &["phone", "smartphone", "cell phone"]),
    ("laptop", &["notebook", "computer"]),
    ("shoes", &["footwear", "sneakers"]),
    ("watch", &["wristwatch", "timepiece"]),
    ("spectacles", &["glasses", "eyewear"]),
    ("earphone", &["headphone", "earbuds"]),
    ("sofa", &["couch", "settee"]),
];

/// Generates the denormalized search-keyword set stored on every product for
/// prefix/autocomplete search.
///
/// Long names deliberately explode into hundreds of entries (every token
/// prefix plus every contiguous phrase); the storefront's search depends on
/// that recall, so the expansion must not be trimmed down.
pub struct KeywordGenerator {
    word_re: Regex,
}

impl KeywordGenerator {
    pub fn new() -> Self {
        KeywordGenerator {
            word_re: Regex::new(r"[a-z0-9]+").unwrap(),
        }
    }

    /// Builds the keyword set from the product name, category and
    /// subcategory. Empty inputs contribute nothing. Presentation is
    /// deterministic: deduplicated, sorted by length then lexicographically.
    pub fn generate(&self, name: &str, category: &str, subcategory: &str) -> Vec<String> {
        let mut keywords: BTreeSet<String> = BTreeSet::new();

        for input in [name, category, subcategory] {
            let lowered = input.to_lowercase();
            let words: Vec<String> = self
                .word_re
                .find_iter(&lowered)
                .map(|m| m.as_str().to_string())
                .collect();

            for word in &words {
                // The token itself plus every non-empty prefix.
                for end in 1..=word.len() {
                    keywords.insert(word[..end].to_string());
                }

                // One mechanical plural/singular toggle, not lemmatization.
                if let Some(singular) = word.strip_suffix('s') {
                    if !singular.is_empty() {
                        keywords.insert(singular.to_string());
                    }
                } else {
                    keywords.insert(format!("{}s", word));
                }
            }

            // Every contiguous phrase within this input's word list.
            for start in 0..words.len() {
                for end in (start + 1)..=words.len() {
                    keywords.insert(words[start..end].join(" "));
                }
            }
        }

        let combined = format!("{} {} {}", name, category, subcategory).to_lowercase();
        for (key, synonyms) in SYNONYMS {
            if combined.contains(key) {
                keywords.insert(key.to_string());
                for synonym in *synonyms {
                    keywords.insert(synonym.to_string());
                }
            }
        }

        let mut sorted: Vec<String> = keywords.into_iter().collect();
        sorted.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        sorted
    }
}

impl Default for KeywordGenerator {
    fn default() -> Self {
        Self::new()
    }
}
