//! Brand names from product URLs and brand-list CSV files

use crate::error::ComputeError;
use percent_encoding::percent_decode_str;
use std::io::Read;
use url::{ParseError, Url};

/// Known hardware brands, checked in order against the URL path
pub const KNOWN_BRANDS: [&str; 29] = [
    "asus",
    "msi",
    "gigabyte",
    "logitech",
    "razer",
    "corsair",
    "hyperx",
    "steelseries",
    "roccat",
    "cooler master",
    "thermaltake",
    "nzxt",
    "amd",
    "intel",
    "nvidia",
    "kingston",
    "crucial",
    "samsung",
    "lg",
    "acer",
    "benq",
    "viewsonic",
    "alienware",
    "lenovo",
    "hp",
    "dell",
    "microsoft",
    "apple",
    "sony",
];

/// Path segments that never name a brand
const GENERIC_SEGMENTS: [&str; 5] = ["producto", "product", "item", "p", "pdp"];

/// Header of the brand column in brand-list CSV files
pub const BRAND_COLUMN: &str = "Brand";

/// Base for input without a scheme, so bare and scheme-relative paths parse
const RELATIVE_BASE: &str = "http://localhost/";

/// Guess the brand of a product page from its URL.
///
/// A known brand anywhere in the path wins. Otherwise the first path
/// segment longer than two characters that is not a generic word is used,
/// keeping only its first dash-separated word.
pub fn extract_brand_from_url(url: &str) -> Option<String> {
    let path = url_path(url)?.to_lowercase();

    if let Some(brand) = KNOWN_BRANDS.iter().find(|brand| path.contains(*brand)) {
        return Some(display_brand(brand));
    }

    path.split('/')
        .filter(|segment| segment.chars().count() > 2)
        .find(|segment| !GENERIC_SEGMENTS.contains(segment))
        .and_then(|segment| {
            title_case(&segment.replace('-', " "))
                .split_whitespace()
                .next()
                .map(str::to_string)
        })
}

fn display_brand(brand: &str) -> String {
    match brand {
        "asus" => "ASUS".to_string(),
        "msi" => "MSI".to_string(),
        "hyperx" => "HyperX".to_string(),
        other => title_case(other),
    }
}

/// Decoded path component of a URL. Text without a scheme is resolved as a
/// path (or a `//host/...` reference); anything unparseable has no path.
fn url_path(url: &str) -> Option<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).ok()?.join(url).ok()?
        }
        Err(_) => return None,
    };

    Some(percent_decode_str(parsed.path()).decode_utf8_lossy().into_owned())
}

/// Upper-case the first letter of every word, lower-case the rest. A word
/// starts after any non-alphabetic character.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if prev_alpha {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_alpha = ch.is_alphabetic();
    }
    out
}

/// Read brand names from a CSV with a `Brand` header column.
///
/// Empty cells are skipped; order is preserved.
pub fn load_brands<R: Read>(reader: R) -> Result<Vec<String>, ComputeError> {
    let mut reader = csv::Reader::from_reader(reader);

    let col_idx = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == BRAND_COLUMN)
        .ok_or_else(|| ComputeError::MissingField(BRAND_COLUMN.to_string()))?;

    let mut brands = Vec::new();
    for result in reader.records() {
        let record = result?;
        if let Some(brand) = record.get(col_idx).map(str::trim) {
            if !brand.is_empty() {
                brands.push(brand.to_string());
            }
        }
    }

    Ok(brands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_brand_special_cases() {
        assert_eq!(
            extract_brand_from_url("https://shop.example/asus-rog-strix-g15/").as_deref(),
            Some("ASUS")
        );
        assert_eq!(
            extract_brand_from_url("https://shop.example/p/MSI-Katana").as_deref(),
            Some("MSI")
        );
        assert_eq!(
            extract_brand_from_url("https://shop.example/hyperx-cloud-ii").as_deref(),
            Some("HyperX")
        );
    }

    #[test]
    fn test_known_brand_title_case() {
        assert_eq!(
            extract_brand_from_url("https://shop.example/logitech-g-pro/").as_deref(),
            Some("Logitech")
        );
        assert_eq!(
            extract_brand_from_url("https://shop.example/cooler master-hyper").as_deref(),
            Some("Cooler Master")
        );
    }

    #[test]
    fn test_known_brand_order_wins() {
        // both "msi" and "logitech" appear; msi comes first in the list
        assert_eq!(
            extract_brand_from_url("https://shop.example/logitech/msi-bundle").as_deref(),
            Some("MSI")
        );
    }

    #[test]
    fn test_host_is_ignored() {
        assert_eq!(
            extract_brand_from_url("https://www.asus.com/producto/zenwatch").as_deref(),
            Some("Zenwatch")
        );
    }

    #[test]
    fn test_fallback_first_segment() {
        assert_eq!(
            extract_brand_from_url("https://shop.example/producto/krom-kasic-tkl?ref=x")
                .as_deref(),
            Some("Krom")
        );
        assert_eq!(
            extract_brand_from_url("https://shop.example/ab/pdp/newskill-suiko").as_deref(),
            Some("Newskill")
        );
    }

    #[test]
    fn test_nothing_qualifies() {
        assert_eq!(extract_brand_from_url("https://shop.example/"), None);
        assert_eq!(extract_brand_from_url("https://shop.example/p/pdp/ab"), None);
        assert_eq!(extract_brand_from_url(""), None);
    }

    #[test]
    fn test_url_forms() {
        assert_eq!(
            extract_brand_from_url("https://user:pw@shop.example:8080/razer-viper?asus=1#msi")
                .as_deref(),
            Some("Razer")
        );
        assert_eq!(
            extract_brand_from_url("//cdn.asus.example/ozone-neon-x20").as_deref(),
            Some("Ozone")
        );
        assert_eq!(
            extract_brand_from_url("producto/corsair-k70").as_deref(),
            Some("Corsair")
        );
        assert_eq!(
            extract_brand_from_url("https://shop.example/cooler%20master-hyper").as_deref(),
            Some("Cooler Master")
        );
        assert_eq!(extract_brand_from_url("https://"), None);
    }

    #[test]
    fn test_url_path() {
        assert_eq!(
            url_path("https://shop.example:443/Asus/ROG?x=1").as_deref(),
            Some("/Asus/ROG")
        );
        assert_eq!(url_path("//host/a/b").as_deref(), Some("/a/b"));
        assert_eq!(url_path("").as_deref(), Some("/"));
        assert_eq!(url_path("https://"), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ozone gaming"), "Ozone Gaming");
        assert_eq!(title_case("3dfx"), "3Dfx");
        assert_eq!(title_case("MARS"), "Mars");
    }

    #[test]
    fn test_load_brands() {
        let csv = "Id,Brand,Notes\n1,Logitech,\n2,,empty\n3, Razer ,x\n";
        let brands = load_brands(csv.as_bytes()).unwrap();
        assert_eq!(brands, vec!["Logitech".to_string(), "Razer".to_string()]);
    }

    #[test]
    fn test_load_brands_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Brand").unwrap();
        writeln!(file, "Corsair").unwrap();
        writeln!(file, "Mars Gaming").unwrap();

        let reader = std::fs::File::open(file.path()).unwrap();
        let brands = load_brands(reader).unwrap();
        assert_eq!(brands, vec!["Corsair".to_string(), "Mars Gaming".to_string()]);
    }

    #[test]
    fn test_missing_brand_column() {
        let err = load_brands("Name\nLogitech\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ComputeError::MissingField(field) if field == "Brand"));
    }
}
