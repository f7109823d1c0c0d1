//! Hunter CLI - Command-line interface for Trend Hunter
//!
//! Commands:
//! - analyze: Analyse one brand from saved provider responses
//! - metrics: Change metrics from an interest-over-time response
//! - classify: Classify a related-queries response
//! - summarize: Compare brands across countries from saved reports
//! - brand / brands: Brand names from URLs and brand-list CSV files
//! - categories: Print the category catalog
//! - doctor: Diagnose configuration and environment

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use trend_hunter::brand::{extract_brand_from_url, load_brands};
use trend_hunter::summary::{
    average_by_country, filter_countries, sort_rows, top_brands, write_csv, SortKey, SummaryRow,
};
use trend_hunter::config::{ConfigOverrides, ENV_PREFIX};
use trend_hunter::types::{ChangeMetrics, QuestionLexicon, RisingPolicy, TrendReport};
use trend_hunter::{
    related_queries_to_classified, timeseries_to_metrics, ComputeError, HunterConfig,
    ProviderPayloads, TrendProcessor, HUNTER_VERSION, PRODUCER_NAME,
};

/// Hunter - Search-trend metrics and relevance classification
#[derive(Parser)]
#[command(name = "hunter")]
#[command(version = HUNTER_VERSION)]
#[command(about = "Turn Google Trends responses into product signals", long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one brand in one country and print the report
    Analyze {
        /// Brand name searched for
        #[arg(long)]
        brand: String,

        /// Country code the responses were fetched for
        #[arg(long, default_value = "ES")]
        geo: String,

        /// Interest-over-time response (use - for stdin)
        #[arg(long)]
        timeseries: PathBuf,

        /// Related-queries response (use - for stdin)
        #[arg(long)]
        queries: PathBuf,

        /// Related-topics response
        #[arg(long)]
        topics: Option<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Print change metrics for an interest-over-time response
    Metrics {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a related-queries response
    Classify {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Compare brands across countries from saved reports
    Summarize {
        /// Reports file, one JSON report per line (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Metric to rank by
        #[arg(long, value_enum, default_value = "year")]
        sort_by: SortKey,

        /// Only keep these country codes
        #[arg(long = "country")]
        countries: Vec<String>,

        /// Also print the N brands with the largest year change
        #[arg(long)]
        top: Option<usize>,

        /// Export the table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract the brand name from a product URL
    Brand {
        /// Product page URL
        url: String,
    },

    /// List brand names from a CSV file with a Brand column
    Brands {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the product category catalog
    Categories {
        /// Configuration file with a custom catalog
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Configuration file to check
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Category selection and classification overrides
#[derive(Args)]
struct SelectionArgs {
    /// Configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Selected categories, comma separated
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,

    /// Minimum relevance (0-100)
    #[arg(long)]
    threshold: Option<f64>,

    /// Where rising queries go besides the emerging list
    #[arg(long, value_enum)]
    rising_policy: Option<RisingPolicy>,

    /// Interrogative markers used to spot questions
    #[arg(long, value_enum)]
    lexicon: Option<QuestionLexicon>,
}

impl SelectionArgs {
    /// Defaults, then the config file, then `HUNTER_*` variables, then flags
    fn into_config(self) -> Result<HunterConfig, HunterCliError> {
        let overrides = ConfigOverrides {
            selected_categories: (!self.categories.is_empty()).then_some(self.categories),
            relevance_threshold: self.threshold,
            rising_policy: self.rising_policy,
            question_lexicon: self.lexicon,
        };
        Ok(HunterConfig::load_with(self.config.as_deref(), &overrides)?)
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Single-line JSON (appendable as NDJSON)
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands) -> Result<(), HunterCliError> {
    match command {
        Commands::Analyze {
            brand,
            geo,
            timeseries,
            queries,
            topics,
            selection,
            output_format,
        } => cmd_analyze(
            &brand,
            &geo,
            &timeseries,
            &queries,
            topics.as_deref(),
            selection,
            output_format,
        ),

        Commands::Metrics { input, json } => cmd_metrics(&input, json),

        Commands::Classify {
            input,
            selection,
            output_format,
        } => cmd_classify(&input, selection, output_format),

        Commands::Summarize {
            input,
            sort_by,
            countries,
            top,
            csv,
            json,
        } => cmd_summarize(&input, sort_by, &countries, top, csv.as_deref(), json),

        Commands::Brand { url } => cmd_brand(&url),

        Commands::Brands { input } => cmd_brands(&input),

        Commands::Categories { config, json } => cmd_categories(config.as_deref(), json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_analyze(
    brand: &str,
    geo: &str,
    timeseries: &Path,
    queries: &Path,
    topics: Option<&Path>,
    selection: SelectionArgs,
    output_format: OutputFormat,
) -> Result<(), HunterCliError> {
    let processor = TrendProcessor::new(selection.into_config()?)?;

    let timeseries_json = read_input(timeseries)?;
    let queries_json = read_input(queries)?;
    let topics_json = topics.map(read_input).transpose()?;

    let payloads = ProviderPayloads {
        timeseries: &timeseries_json,
        queries: &queries_json,
        topics: topics_json.as_deref(),
    };

    let report = processor.report(brand, geo, &payloads)?;
    println!("{}", format_json(&report, &output_format)?);
    Ok(())
}

fn cmd_metrics(input: &Path, json: bool) -> Result<(), HunterCliError> {
    let metrics = timeseries_to_metrics(&read_input(input)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    match metrics {
        Some(metrics) => print_metrics(&metrics),
        None => println!("Metrics unavailable (series too short or not numeric)"),
    }
    Ok(())
}

fn cmd_classify(
    input: &Path,
    selection: SelectionArgs,
    output_format: OutputFormat,
) -> Result<(), HunterCliError> {
    let config = selection.into_config()?;
    let categories = config.selected()?;
    let classified = related_queries_to_classified(
        &read_input(input)?,
        &categories,
        &config.classify_options(),
    )?;

    println!("{}", format_json(&classified, &output_format)?);
    Ok(())
}

fn cmd_summarize(
    input: &Path,
    sort_by: SortKey,
    countries: &[String],
    top: Option<usize>,
    csv: Option<&Path>,
    json: bool,
) -> Result<(), HunterCliError> {
    let content = read_input(input)?;

    let mut rows: Vec<SummaryRow> = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let report: TrendReport = serde_json::from_str(line).map_err(|e| {
            HunterCliError::ParseError(format!("report on line {}: {}", index + 1, e))
        })?;
        rows.push(SummaryRow::from_report(&report));
    }

    if rows.is_empty() {
        return Err(HunterCliError::NoReports);
    }
    debug!(rows = rows.len(), "reports loaded");

    if !countries.is_empty() {
        rows = filter_countries(&rows, countries);
    }
    sort_rows(&mut rows, sort_by);

    if let Some(path) = csv {
        write_csv(&rows, fs::File::create(path)?)?;
    }

    let ranking = top.map(|n| top_brands(&rows, n));
    let averages = average_by_country(&rows);

    if json {
        let summary = serde_json::json!({
            "rows": rows,
            "top_brands": ranking,
            "country_averages": averages,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{:<20} {:<4} {:<12} {:>10} {:>10} {:>10} {:>8}",
        "Brand", "Geo", "Country", "Month", "Quarter", "Year", "Average"
    );
    for row in &rows {
        println!(
            "{:<20} {:<4} {:<12} {:>10} {:>10} {:>10} {:>8}",
            row.brand,
            row.geo,
            row.country,
            format_pct(row.month_change),
            format_pct(row.quarter_change),
            format_pct(row.year_change),
            row.average
                .map(|a| format!("{a:.1}"))
                .unwrap_or_else(|| "N/A".to_string()),
        );
    }

    if let Some(ranking) = ranking {
        println!("\nTop brands by year change:");
        for (rank, entry) in ranking.iter().enumerate() {
            println!("  {}. {} ({:+.1}%)", rank + 1, entry.brand, entry.year_change);
        }
    }

    if averages.len() > 1 {
        println!("\nAverage year change by country:");
        for avg in &averages {
            println!(
                "  {} ({}): {:+.1}% over {} brands",
                avg.country, avg.geo, avg.year_change, avg.brands
            );
        }
    }

    Ok(())
}

fn cmd_brand(url: &str) -> Result<(), HunterCliError> {
    match extract_brand_from_url(url) {
        Some(brand) => {
            println!("{brand}");
            Ok(())
        }
        None => Err(HunterCliError::NoBrand(url.to_string())),
    }
}

fn cmd_brands(input: &Path) -> Result<(), HunterCliError> {
    let brands = if is_stdin(input) {
        load_brands(io::stdin().lock())?
    } else {
        load_brands(fs::File::open(input)?)?
    };

    for brand in brands {
        println!("{brand}");
    }
    Ok(())
}

fn cmd_categories(config: Option<&Path>, json: bool) -> Result<(), HunterCliError> {
    let config = HunterConfig::load(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config.catalog)?);
        return Ok(());
    }

    for category in &config.catalog {
        let selected = if config.selected_categories.contains(&category.name) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {} {} ({} keywords): {}",
            selected,
            category.icon,
            category.name,
            category.keywords.len(),
            category.keywords.join(", ")
        );
    }
    Ok(())
}

/// Warn when `HUNTER_*` variables override the config file
fn environment_check(keys: impl Iterator<Item = String>) -> DoctorCheck {
    let prefix = format!("{}_", ENV_PREFIX);
    let mut overriding: Vec<String> = keys.filter(|key| key.starts_with(&prefix)).collect();
    overriding.sort();

    if overriding.is_empty() {
        DoctorCheck {
            name: "environment".to_string(),
            status: CheckStatus::Ok,
            message: format!("No {}* variables set", prefix),
        }
    } else {
        DoctorCheck {
            name: "environment".to_string(),
            status: CheckStatus::Warning,
            message: format!("Config file values overridden by {}", overriding.join(", ")),
        }
    }
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), HunterCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "hunter_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Trend Hunter version {}", HUNTER_VERSION),
    });

    // Check configuration
    match config {
        Some(path) if !path.exists() => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Error,
            message: format!("Config file {} does not exist", path.display()),
        }),
        _ => match HunterConfig::load(config) {
            Ok(loaded) => {
                checks.push(DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config valid ({} categories in catalog, threshold {})",
                        loaded.catalog.len(),
                        loaded.relevance_threshold
                    ),
                });
                checks.push(selection_check(&loaded));
            }
            Err(e) => checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid config: {}", e),
            }),
        },
    }

    // Input mode only; both a TTY and a pipe are usable
    let stdin_mode = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (interactive mode)"
    } else {
        "stdin is a pipe (responses can be piped with -)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_mode.to_string(),
    });

    checks.push(environment_check(std::env::vars().map(|(key, _)| key)));

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: HUNTER_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Hunter Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(HunterCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn selection_check(config: &HunterConfig) -> DoctorCheck {
    if config.selected_categories.is_empty() {
        DoctorCheck {
            name: "selection".to_string(),
            status: CheckStatus::Warning,
            message: "No categories selected; every query scores 100".to_string(),
        }
    } else {
        DoctorCheck {
            name: "selection".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Categories: {}; countries: {}",
                config.selected_categories.join(", "),
                config.countries.join(", ")
            ),
        }
    }
}

// Helper functions

fn is_stdin(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn read_input(path: &Path) -> Result<String, HunterCliError> {
    if is_stdin(path) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn format_json<T: serde::Serialize>(
    value: &T,
    format: &OutputFormat,
) -> Result<String, HunterCliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
    }
}

fn format_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:+.1}%"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn print_metrics(metrics: &ChangeMetrics) {
    println!("Month change:   {:+.1}%", metrics.month_change);
    println!("Quarter change: {:+.1}%", metrics.quarter_change);
    println!("Year change:    {:+.1}%", metrics.year_change);
    println!("Average:        {:.1}", metrics.average);
}

// Error types

#[derive(Debug)]
enum HunterCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoReports,
    NoBrand(String),
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for HunterCliError {
    fn from(e: io::Error) -> Self {
        HunterCliError::Io(e)
    }
}

impl From<ComputeError> for HunterCliError {
    fn from(e: ComputeError) -> Self {
        HunterCliError::Compute(e)
    }
}

impl From<serde_json::Error> for HunterCliError {
    fn from(e: serde_json::Error) -> Self {
        HunterCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HunterCliError> for CliError {
    fn from(e: HunterCliError) -> Self {
        match e {
            HunterCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            HunterCliError::Compute(e) => {
                let (code, hint) = match &e {
                    ComputeError::InvalidThreshold(_)
                    | ComputeError::UnknownCategory(_)
                    | ComputeError::UnknownCountry(_)
                    | ComputeError::ConfigError(_) => (
                        "CONFIG_ERROR",
                        "Run 'hunter categories' or 'hunter doctor --config <file>'",
                    ),
                    ComputeError::IoError(_) => ("IO_ERROR", "Check file paths and permissions"),
                    ComputeError::CsvError(_) | ComputeError::MissingField(_) => (
                        "CSV_ERROR",
                        "The brand list needs a 'Brand' header column",
                    ),
                    _ => (
                        "PARSE_ERROR",
                        "Ensure input is a saved Google Trends JSON response",
                    ),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            HunterCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            HunterCliError::NoReports => CliError {
                code: "NO_REPORTS".to_string(),
                message: "No reports found in input".to_string(),
                hint: Some("Collect reports with 'hunter analyze --output-format json'".to_string()),
            },
            HunterCliError::NoBrand(url) => CliError {
                code: "NO_BRAND".to_string(),
                message: format!("No brand found in {}", url),
                hint: Some("Pass the brand name directly to 'hunter analyze'".to_string()),
            },
            HunterCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            HunterCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Each line must be one report from 'hunter analyze'".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_check() {
        let check = environment_check(vec!["PATH".to_string(), "HOME".to_string()].into_iter());
        assert!(matches!(check.status, CheckStatus::Ok));

        let check = environment_check(
            vec![
                "HUNTER_RELEVANCE_THRESHOLD".to_string(),
                "PATH".to_string(),
                "HUNTER_COUNTRIES".to_string(),
            ]
            .into_iter(),
        );
        assert!(matches!(check.status, CheckStatus::Warning));
        assert_eq!(
            check.message,
            "Config file values overridden by HUNTER_COUNTRIES, HUNTER_RELEVANCE_THRESHOLD"
        );
    }

    #[test]
    fn test_selection_check() {
        let config = HunterConfig {
            selected_categories: Vec::new(),
            ..HunterConfig::default()
        };
        assert!(matches!(selection_check(&config).status, CheckStatus::Warning));
        assert!(matches!(
            selection_check(&HunterConfig::default()).status,
            CheckStatus::Ok
        ));
    }
}
