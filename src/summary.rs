//! Bulk comparison of brands across countries
//!
//! One [`SummaryRow`] per analysed brand and country. Rows can be ranked by
//! any change metric, filtered by country, reduced to a top-N brand list,
//! aggregated per country, and exported as CSV.

use crate::error::ComputeError;
use crate::types::{BrandAnalysis, ChangeMetrics, TrendReport};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::Write;

/// One row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub brand: String,
    pub geo: String,
    pub country: String,
    pub month_change: Option<f64>,
    pub quarter_change: Option<f64>,
    pub year_change: Option<f64>,
    pub average: Option<f64>,
}

impl SummaryRow {
    pub fn new(brand: &str, geo: &str, country: &str, metrics: Option<ChangeMetrics>) -> Self {
        Self {
            brand: brand.to_string(),
            geo: geo.to_string(),
            country: country.to_string(),
            month_change: metrics.map(|m| m.month_change),
            quarter_change: metrics.map(|m| m.quarter_change),
            year_change: metrics.map(|m| m.year_change),
            average: metrics.map(|m| m.average),
        }
    }

    pub fn from_analysis(analysis: &BrandAnalysis) -> Self {
        Self::new(
            &analysis.brand,
            &analysis.geo,
            &analysis.country,
            analysis.metrics,
        )
    }

    pub fn from_report(report: &TrendReport) -> Self {
        Self::new(
            &report.provenance.brand,
            &report.provenance.geo,
            &report.provenance.country,
            report.metrics,
        )
    }

    /// Value of the given metric, if computed
    pub fn metric(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::Month => self.month_change,
            SortKey::Quarter => self.quarter_change,
            SortKey::Year => self.year_change,
            SortKey::Average => self.average,
        }
    }
}

/// Metric a table is ranked by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SortKey {
    Month,
    Quarter,
    #[default]
    Year,
    Average,
}

/// Sort rows descending by `key`. Rows without that metric go last; equal
/// rows keep their relative order.
pub fn sort_rows(rows: &mut [SummaryRow], key: SortKey) {
    rows.sort_by(|a, b| descending(a.metric(key), b.metric(key)));
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Keep rows whose geo code is in `geos` (case-insensitive)
pub fn filter_countries(rows: &[SummaryRow], geos: &[String]) -> Vec<SummaryRow> {
    rows.iter()
        .filter(|row| geos.iter().any(|geo| geo.eq_ignore_ascii_case(&row.geo)))
        .cloned()
        .collect()
}

/// Brand ranked by year change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRanking {
    pub brand: String,
    pub year_change: f64,
}

/// The `n` brands with the largest year change.
///
/// When rows span more than one country, each brand's year change is
/// averaged over the countries that have one. Rows without a year change
/// are excluded.
pub fn top_brands(rows: &[SummaryRow], n: usize) -> Vec<BrandRanking> {
    let mut ranking: Vec<BrandRanking> = if distinct_geos(rows) > 1 {
        let mut totals: Vec<(String, f64, usize)> = Vec::new();
        for row in rows {
            let Some(change) = row.year_change else {
                continue;
            };
            match totals.iter_mut().find(|(brand, _, _)| *brand == row.brand) {
                Some(entry) => {
                    entry.1 += change;
                    entry.2 += 1;
                }
                None => totals.push((row.brand.clone(), change, 1)),
            }
        }
        totals
            .into_iter()
            .map(|(brand, sum, count)| BrandRanking {
                brand,
                year_change: sum / count as f64,
            })
            .collect()
    } else {
        rows.iter()
            .filter_map(|row| {
                row.year_change.map(|year_change| BrandRanking {
                    brand: row.brand.clone(),
                    year_change,
                })
            })
            .collect()
    };

    ranking.sort_by(|a, b| b.year_change.total_cmp(&a.year_change));
    ranking.truncate(n);
    ranking
}

fn distinct_geos(rows: &[SummaryRow]) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for row in rows {
        if !seen.contains(&row.geo.as_str()) {
            seen.push(&row.geo);
        }
    }
    seen.len()
}

/// Mean year change of one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryAverage {
    pub geo: String,
    pub country: String,
    pub year_change: f64,
    pub brands: usize,
}

/// Mean year change per country, in order of first appearance. Countries
/// where no row has a year change are omitted.
pub fn average_by_country(rows: &[SummaryRow]) -> Vec<CountryAverage> {
    let mut averages: Vec<CountryAverage> = Vec::new();
    for row in rows {
        let Some(change) = row.year_change else {
            continue;
        };
        match averages.iter_mut().find(|avg| avg.geo == row.geo) {
            Some(avg) => {
                avg.year_change += change;
                avg.brands += 1;
            }
            None => averages.push(CountryAverage {
                geo: row.geo.clone(),
                country: row.country.clone(),
                year_change: change,
                brands: 1,
            }),
        }
    }

    for avg in &mut averages {
        avg.year_change /= avg.brands as f64;
    }
    averages
}

/// Write rows as CSV with a header. Missing metrics are empty cells.
pub fn write_csv<W: Write>(rows: &[SummaryRow], writer: W) -> Result<(), ComputeError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
