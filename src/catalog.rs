//! Built-in product categories and supported countries
//!
//! The defaults target a PC-hardware retailer. Deployments replace or extend
//! them through [`crate::config::HunterConfig`].

use crate::error::ComputeError;
use crate::types::{Country, ProductCategory};

/// Category selected when the configuration names none
pub const DEFAULT_CATEGORY: &str = "Periféricos en general";

/// Country selected when the configuration names none
pub const DEFAULT_COUNTRY: &str = "ES";

/// Built-in product category catalog
pub fn default_categories() -> Vec<ProductCategory> {
    vec![
        ProductCategory::new(
            "Teclados",
            &[
                "teclado", "keyboard", "tecla", "switch", "mecánico", "mechanical", "rgb",
                "retroiluminado", "gaming keyboard", "clavier", "tastatur", "keycap",
                "hot-swappable", "wireless keyboard", "inalámbrico",
            ],
            "⌨️",
        ),
        ProductCategory::new(
            "Ratones",
            &[
                "ratón", "mouse", "mice", "dpi", "sensor", "gaming mouse", "wireless mouse",
                "inalámbrico", "souris", "maus", "polling rate", "botones", "buttons", "scroll",
                "grip",
            ],
            "🖱️",
        ),
        ProductCategory::new(
            "Auriculares",
            &[
                "auriculares", "headset", "headphones", "audio", "micrófono", "microphone",
                "sonido", "sound", "gaming headset", "casque", "kopfhörer", "7.1", "surround",
                "noise cancelling", "cancelación ruido",
            ],
            "🎧",
        ),
        ProductCategory::new(
            "Monitores",
            &[
                "monitor", "pantalla", "screen", "display", "hz", "refresh rate", "resolución",
                "resolution", "4k", "1080p", "1440p", "ultrawide", "curved", "curvo", "ips", "va",
                "tn", "hdr", "freesync", "g-sync",
            ],
            "🖥️",
        ),
        ProductCategory::new(
            "Sillas Gaming",
            &[
                "silla", "chair", "gaming chair", "asiento", "respaldo", "lumbar", "reposabrazos",
                "armrest", "reclinable", "chaise", "stuhl", "ergonómica", "ergonomic", "cojín",
                "cushion",
            ],
            "🪑",
        ),
        ProductCategory::new(
            DEFAULT_CATEGORY,
            &[
                "periférico", "peripheral", "gaming", "pc", "setup", "escritorio", "desk",
                "accesorio", "accessory", "rgb", "usb", "cable", "wireless",
            ],
            "🎮",
        ),
        ProductCategory::new(
            "Componentes PC",
            &[
                "gpu", "cpu", "procesador", "processor", "gráfica", "graphics card", "ram",
                "memoria", "placa", "motherboard", "ssd", "nvme", "fuente", "power supply",
                "refrigeración", "cooling", "ventilador", "fan",
            ],
            "💻",
        ),
        ProductCategory::new(
            "Portátiles Gaming",
            &[
                "portátil", "laptop", "notebook", "gaming laptop", "móvil", "ordenador portátil",
                "rtx", "gtx", "intel", "amd", "ryzen", "pantalla", "batería", "battery",
            ],
            "💻",
        ),
        ProductCategory::new(
            "Webcams y Streaming",
            &[
                "webcam", "cámara", "camera", "streaming", "stream", "capturadora",
                "capture card", "1080p", "4k", "obs", "twitch", "youtube", "micrófono",
                "microphone", "luz", "lighting",
            ],
            "📹",
        ),
        ProductCategory::new(
            "Alfombrillas",
            &[
                "alfombrilla", "mousepad", "pad", "tapis", "mauspad", "desk mat", "rgb mousepad",
                "extended", "xl", "superficie", "surface",
            ],
            "🔲",
        ),
    ]
}

/// Countries the provider is queried for by default
pub fn default_countries() -> Vec<Country> {
    [
        ("ES", "Spain"),
        ("PT", "Portugal"),
        ("FR", "France"),
        ("IT", "Italy"),
        ("DE", "Germany"),
    ]
    .into_iter()
    .map(|(code, name)| Country {
        code: code.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// Resolve category names against a catalog, keeping the order of `names`
pub fn resolve_categories(
    catalog: &[ProductCategory],
    names: &[String],
) -> Result<Vec<ProductCategory>, ComputeError> {
    names
        .iter()
        .map(|name| {
            catalog
                .iter()
                .find(|category| &category.name == name)
                .cloned()
                .ok_or_else(|| ComputeError::UnknownCategory(name.clone()))
        })
        .collect()
}

/// Look up a country by code (case-insensitive)
pub fn find_country<'a>(countries: &'a [Country], code: &str) -> Option<&'a Country> {
    countries
        .iter()
        .find(|country| country.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = default_categories();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.iter().any(|c| c.name == DEFAULT_CATEGORY));
        assert!(catalog.iter().all(|c| !c.keywords.is_empty()));
        assert!(catalog
            .iter()
            .all(|c| c.keywords.iter().all(|k| k.to_lowercase() == *k)));
    }

    #[test]
    fn test_resolve_keeps_selection_order() {
        let catalog = default_categories();
        let names = vec!["Ratones".to_string(), "Teclados".to_string()];
        let resolved = resolve_categories(&catalog, &names).unwrap();
        assert_eq!(resolved[0].name, "Ratones");
        assert_eq!(resolved[1].name, "Teclados");
    }

    #[test]
    fn test_resolve_unknown_category() {
        let catalog = default_categories();
        let err = resolve_categories(&catalog, &["Drones".to_string()]).unwrap_err();
        assert!(matches!(err, ComputeError::UnknownCategory(name) if name == "Drones"));
    }

    #[test]
    fn test_find_country() {
        let countries = default_countries();
        assert_eq!(find_country(&countries, "es").unwrap().name, "Spain");
        assert!(find_country(&countries, "US").is_none());
    }
}
