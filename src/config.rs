//! Configuration for Trend Hunter
//!
//! Layering: built-in defaults -> JSON config file -> environment
//! (`HUNTER_*`) -> caller overrides such as CLI flags.
//! The analysis core never reads this directly; [`HunterConfig`] is
//! validated once and turned into plain parameters (category list,
//! threshold, policies) by the pipeline.

use crate::catalog::{self, DEFAULT_CATEGORY, DEFAULT_COUNTRY};
use crate::classifier::{ClassifyOptions, DEFAULT_RELEVANCE_THRESHOLD};
use crate::error::ComputeError;
use crate::types::{
    Country, MissingPointPolicy, ProductCategory, QuestionLexicon, RisingPolicy,
};
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of related topics kept per bucket
pub const DEFAULT_TOP_TOPICS: usize = 10;

/// Prefix of environment variables read by [`HunterConfig::load_with`]
pub const ENV_PREFIX: &str = "HUNTER";

/// Keys whose environment values are comma-separated lists
const ENV_LIST_KEYS: [&str; 2] = ["countries", "selected_categories"];

/// Highest-precedence settings, applied after file and environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub selected_categories: Option<Vec<String>>,
    pub relevance_threshold: Option<f64>,
    pub rising_policy: Option<RisingPolicy>,
    pub question_lexicon: Option<QuestionLexicon>,
}

/// Main application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HunterConfig {
    /// Country codes to analyse
    #[serde(default = "default_selected_countries")]
    pub countries: Vec<String>,

    /// Known countries
    #[serde(default = "catalog::default_countries")]
    pub country_table: Vec<Country>,

    /// Category catalog to select from
    #[serde(default = "catalog::default_categories")]
    pub catalog: Vec<ProductCategory>,

    /// Selected category names, in selection order
    #[serde(default = "default_selected_categories")]
    pub selected_categories: Vec<String>,

    /// Minimum relevance (0-100) for a query to be kept
    #[serde(default = "default_threshold")]
    pub relevance_threshold: f64,

    #[serde(default)]
    pub rising_policy: RisingPolicy,

    /// How timeline points without values are treated for metrics
    #[serde(default)]
    pub missing_points: MissingPointPolicy,

    #[serde(default)]
    pub question_lexicon: QuestionLexicon,

    /// Related topics kept per bucket
    #[serde(default = "default_top_topics")]
    pub top_topics: usize,
}

fn default_selected_countries() -> Vec<String> {
    vec![DEFAULT_COUNTRY.to_string()]
}

fn default_selected_categories() -> Vec<String> {
    vec![DEFAULT_CATEGORY.to_string()]
}

fn default_threshold() -> f64 {
    DEFAULT_RELEVANCE_THRESHOLD
}

fn default_top_topics() -> usize {
    DEFAULT_TOP_TOPICS
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            countries: default_selected_countries(),
            country_table: catalog::default_countries(),
            catalog: catalog::default_categories(),
            selected_categories: default_selected_categories(),
            relevance_threshold: default_threshold(),
            rising_policy: RisingPolicy::default(),
            missing_points: MissingPointPolicy::default(),
            question_lexicon: QuestionLexicon::default(),
            top_topics: default_top_topics(),
        }
    }
}

impl HunterConfig {
    /// Load configuration from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: HunterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults, the optional JSON file and the
    /// environment
    pub fn load(path: Option<&Path>) -> Result<Self, ComputeError> {
        Self::load_with(path, &ConfigOverrides::default())
    }

    /// Load configuration with layered precedence:
    /// 1. Built-in defaults
    /// 2. JSON config file (required when given)
    /// 3. Environment variables (`HUNTER_RELEVANCE_THRESHOLD`, ...)
    /// 4. `overrides`
    pub fn load_with(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ComputeError> {
        Self::layered(path, None, overrides)
    }

    /// `env` replaces the process environment when given
    fn layered(
        path: Option<&Path>,
        env: Option<Map<String, String>>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ComputeError> {
        let defaults = serde_json::to_string(&HunterConfig::default())?;

        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Json));

        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Json)
                    .required(true),
            );
        }

        let mut environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .source(env);
        for key in ENV_LIST_KEYS {
            environment = environment.with_list_parse_key(key);
        }
        builder = apply_overrides(builder.add_source(environment), overrides)?;

        let config: HunterConfig = builder
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(self).map_err(ComputeError::JsonError)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ComputeError> {
        if !(0.0..=100.0).contains(&self.relevance_threshold) {
            return Err(ComputeError::InvalidThreshold(self.relevance_threshold));
        }

        for category in &self.catalog {
            if category.name.trim().is_empty() {
                return Err(ComputeError::ConfigError(
                    "category names must not be empty".to_string(),
                ));
            }
            if category.keywords.is_empty() {
                return Err(ComputeError::ConfigError(format!(
                    "category '{}' has no keywords",
                    category.name
                )));
            }
            if category.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ComputeError::ConfigError(format!(
                    "category '{}' has an empty keyword",
                    category.name
                )));
            }
        }

        for code in &self.countries {
            if catalog::find_country(&self.country_table, code).is_none() {
                return Err(ComputeError::UnknownCountry(code.clone()));
            }
        }

        catalog::resolve_categories(&self.catalog, &self.selected_categories)?;

        Ok(())
    }

    /// Selected categories in selection order
    pub fn selected(&self) -> Result<Vec<ProductCategory>, ComputeError> {
        catalog::resolve_categories(&self.catalog, &self.selected_categories)
    }

    /// Display name for a country code, falling back to the code itself
    pub fn country_name(&self, code: &str) -> String {
        catalog::find_country(&self.country_table, code)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| code.to_uppercase())
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            threshold: self.relevance_threshold,
            rising_policy: self.rising_policy,
            lexicon: self.question_lexicon,
        }
    }
}

fn apply_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    overrides: &ConfigOverrides,
) -> Result<ConfigBuilder<DefaultState>, ComputeError> {
    if let Some(categories) = &overrides.selected_categories {
        builder = builder
            .set_override("selected_categories", categories.clone())
            .map_err(config_error)?;
    }
    if let Some(threshold) = overrides.relevance_threshold {
        builder = builder
            .set_override("relevance_threshold", threshold)
            .map_err(config_error)?;
    }
    if let Some(policy) = overrides.rising_policy {
        builder = builder
            .set_override("rising_policy", policy.as_str())
            .map_err(config_error)?;
    }
    if let Some(lexicon) = overrides.question_lexicon {
        builder = builder
            .set_override("question_lexicon", lexicon.as_str())
            .map_err(config_error)?;
    }
    Ok(builder)
}

fn config_error(e: ::config::ConfigError) -> ComputeError {
    ComputeError::ConfigError(e.to_string())
}
