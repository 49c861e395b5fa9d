use scraper::Html;

/// Strip HTML tags from a description and return plain text with entities
/// decoded and whitespace collapsed.
pub fn strip_html(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(input);
    let text: Vec<&str> = fragment.root_element().text().collect();

    text.join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tolerant numeric coercion: strips everything except digits and dots before
/// parsing. Unparseable input yields 0.0 rather than an error, so a malformed
/// cell never fails a whole row.
pub fn coerce_number(raw: &str) -> f64 {
    let numeric: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    numeric.parse::<f64>().unwrap_or(0.0)
}

/// Integer variant of the same coercion, used for stock counts.
pub fn coerce_int(raw: &str) -> i64 {
    coerce_number(raw) as i64
}

/// Uppercases the first character, used to present matched keywords as
/// subcategory labels.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
