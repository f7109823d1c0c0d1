//! Query relevance scoring
//!
//! Scores a search query against the selected product categories by keyword
//! overlap. The best-scoring category wins; its matched keywords are reported.

use crate::types::{ProductCategory, Relevance};

/// Leading keywords of a category that earn the primary bonus
pub const PRIMARY_KEYWORDS: usize = 5;

/// Flat bonus when any primary keyword matches
pub const PRIMARY_BONUS: f64 = 20.0;

/// Upper bound of every relevance score
pub const MAX_SCORE: f64 = 100.0;

/// Keyword-overlap relevance scorer
pub struct RelevanceScorer;

impl RelevanceScorer {
    /// Score `query` against `categories`, evaluated in the given order.
    ///
    /// With no categories selected every query is fully relevant. Otherwise a
    /// category scores `matches / keywords * 100`, plus [`PRIMARY_BONUS`] when
    /// one of its first [`PRIMARY_KEYWORDS`] keywords matches, capped at
    /// [`MAX_SCORE`]. Ties keep the earlier category.
    pub fn score(query: &str, categories: &[ProductCategory]) -> Relevance {
        if categories.is_empty() {
            return Relevance {
                score: MAX_SCORE,
                matched_keywords: Vec::new(),
                category: None,
            };
        }

        let query_lower = query.to_lowercase();
        let mut best = Relevance {
            score: 0.0,
            matched_keywords: Vec::new(),
            category: None,
        };

        for category in categories {
            let matches: Vec<&String> = category
                .keywords
                .iter()
                .filter(|kw| query_lower.contains(&kw.to_lowercase()))
                .collect();

            if matches.is_empty() {
                continue;
            }

            let score = category_score(category, &query_lower, matches.len());
            if score > best.score {
                best = Relevance {
                    score,
                    matched_keywords: matches.into_iter().cloned().collect(),
                    category: Some(category.name.clone()),
                };
            }
        }

        best
    }
}

fn category_score(category: &ProductCategory, query_lower: &str, match_count: usize) -> f64 {
    let mut score = (match_count as f64 / category.keywords.len() as f64) * 100.0;

    let primary_hit = category
        .keywords
        .iter()
        .take(PRIMARY_KEYWORDS)
        .any(|kw| query_lower.contains(&kw.to_lowercase()));
    if primary_hit {
        score += PRIMARY_BONUS;
    }

    score.clamp(0.0, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keyboards() -> ProductCategory {
        ProductCategory::new(
            "Keyboards",
            &[
                "teclado", "keyboard", "tecla", "switch", "mecánico", "mechanical", "rgb",
                "retroiluminado", "keycap", "inalámbrico",
            ],
            "",
        )
    }

    fn mice() -> ProductCategory {
        ProductCategory::new("Mice", &["ratón", "mouse", "dpi", "sensor"], "")
    }

    #[test]
    fn test_no_categories_is_fully_relevant() {
        let relevance = RelevanceScorer::score("anything at all", &[]);
        assert_eq!(relevance.score, 100.0);
        assert!(relevance.matched_keywords.is_empty());
        assert_eq!(relevance.category_label(), "N/A");

        let relevance = RelevanceScorer::score("", &[]);
        assert_eq!(relevance.score, 100.0);
    }

    #[test]
    fn test_primary_keyword_bonus() {
        // "teclado" also contains "tecla": 2 of 10 keywords, primary -> 20 + 20
        let relevance = RelevanceScorer::score("Teclado Logitech", &[keyboards()]);
        assert!((relevance.score - 40.0).abs() < 1e-9);
        assert_eq!(
            relevance.matched_keywords,
            vec!["teclado".to_string(), "tecla".to_string()]
        );
        assert_eq!(relevance.category.as_deref(), Some("Keyboards"));
    }

    #[test]
    fn test_secondary_keyword_has_no_bonus() {
        // "rgb" is keyword 7 of 10
        let relevance = RelevanceScorer::score("logitech rgb", &[keyboards()]);
        assert!((relevance.score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_capped() {
        // 3 of 4 keywords plus bonus -> 95; all 4 -> capped at 100
        let relevance = RelevanceScorer::score("ratón mouse dpi", &[mice()]);
        assert!((relevance.score - 95.0).abs() < 1e-9);

        let relevance = RelevanceScorer::score("ratón mouse dpi sensor", &[mice()]);
        assert_eq!(relevance.score, 100.0);
    }

    #[test]
    fn test_best_category_wins_without_union() {
        let relevance = RelevanceScorer::score("gaming mouse rgb", &[keyboards(), mice()]);
        // keyboards: rgb -> 10; mice: mouse -> 25 + 20
        assert_eq!(relevance.category.as_deref(), Some("Mice"));
        assert_eq!(relevance.matched_keywords, vec!["mouse".to_string()]);
        assert!((relevance.score - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_keeps_first_category() {
        let a = ProductCategory::new("A", &["usb"], "");
        let b = ProductCategory::new("B", &["usb"], "");

        let relevance = RelevanceScorer::score("usb hub", &[a.clone(), b.clone()]);
        assert_eq!(relevance.category.as_deref(), Some("A"));

        let relevance = RelevanceScorer::score("usb hub", &[b, a]);
        assert_eq!(relevance.category.as_deref(), Some("B"));
    }

    #[test]
    fn test_no_match_scores_zero() {
        let relevance = RelevanceScorer::score("asus zenbook", &[keyboards(), mice()]);
        assert_eq!(relevance.score, 0.0);
        assert!(relevance.matched_keywords.is_empty());
        assert_eq!(relevance.category_label(), "N/A");

        let relevance = RelevanceScorer::score("", &[keyboards()]);
        assert_eq!(relevance.score, 0.0);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let category = ProductCategory::new("Monitors", &["Monitor", "HZ"], "");
        let relevance = RelevanceScorer::score("MONITOR 144hz", &[category]);
        assert_eq!(
            relevance.matched_keywords,
            vec!["Monitor".to_string(), "HZ".to_string()]
        );
        assert_eq!(relevance.score, 100.0);
    }
}
