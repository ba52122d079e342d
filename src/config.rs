//! Parser configuration.
//!
//! Everything has a default, so a JSON file only needs the keys it changes.

use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{CorrectionRule, CountryRules};
use crate::processing::recovery::DEFAULT_MAX_AMBIGUOUS_POSITIONS;
use crate::utils::text::is_mrz_char;
use crate::utils::MrzError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Rewrite commonly confused glyphs before interpreting fields. Country
    /// rules and document-number recovery run either way.
    #[serde(default = "default_true")]
    pub ocr_correction: bool,
    /// Upper bound on `0`/`O` positions searched when a document number
    /// fails its check digit.
    #[serde(default = "default_max_ambiguous_positions")]
    pub max_ambiguous_positions: usize,
    /// Year used to pick the century of birthdates; the local clock when unset.
    #[serde(default)]
    pub reference_year: Option<i32>,
    #[serde(default)]
    pub country_rules: CountryRules,
}

fn default_true() -> bool {
    true
}

fn default_max_ambiguous_positions() -> usize {
    DEFAULT_MAX_AMBIGUOUS_POSITIONS
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            ocr_correction: true,
            max_ambiguous_positions: DEFAULT_MAX_AMBIGUOUS_POSITIONS,
            reference_year: None,
            country_rules: CountryRules::default(),
        }
    }
}

impl ParserConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MrzError> {
        let config: ParserConfig = serde_json::from_str(json)
            .map_err(|e| MrzError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MrzError> {
        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_json_str(&content)?;
        info!(
            "Loaded parser config from {:?} ({} country rules)",
            path.as_ref(),
            config.country_rules.countries.len()
        );
        Ok(config)
    }

    /// Substitution targets must stay inside the MRZ alphabet so corrected
    /// text can be written back in place.
    pub fn validate(&self) -> Result<(), MrzError> {
        for country in &self.country_rules.countries {
            if country.country_code.is_empty() || !country.country_code.chars().all(is_mrz_char) {
                return Err(MrzError::ConfigError(format!(
                    "Invalid country code {:?}",
                    country.country_code
                )));
            }
            let rules = country.document_number.iter().chain(&country.personal_number);
            for rule in rules {
                if let CorrectionRule::Substitute { from, to } = rule {
                    if !is_mrz_char(*from) || !is_mrz_char(*to) {
                        return Err(MrzError::ConfigError(format!(
                            "Substitution {:?} -> {:?} for {} leaves the MRZ alphabet",
                            from, to, country.country_code
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
