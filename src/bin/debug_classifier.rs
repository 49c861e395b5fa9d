use catalog_ingest::models::RawRow;
use catalog_ingest::pipeline::{detect_subcategory, CategoryClassifier};

/// Prints the cascade decision for a handful of sample names, next to the
/// independent subcategory ladder, to eyeball where the two refiners agree.
fn main() {
    let classifier = CategoryClassifier::new();

    let samples = [
        "Galaxy S24 Ultra Phone 256GB",
        "ThinkPad X1 Carbon Laptop",
        "Printed Cotton Tshirt",
        "Slim Fit Jeans",
        "Gold Plated Necklace",
        "Running Sneakers Mesh",
        "Ceramic Cookware Set",
        "Mystery Box Item",
    ];

    for name in samples {
        let mut record = RawRow::new();
        record.insert("name".to_string(), name.to_string());

        let guess = classifier.detect_category(&record);
        let ladder = detect_subcategory(&guess.category, name, "");

        println!(
            "{:35} -> {:15} / {:15} (conf {:.2}) ladder: {}",
            name, guess.category, guess.subcategory, guess.confidence, ladder
        );
    }
}
