use serde::{Deserialize, Serialize};

use crate::processing::OcrCorrector;
use crate::utils::text::trim_fillers;
use crate::utils::MrzError;

/// Issuing-state specific corrections, applied after the generic tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRules {
    pub countries: Vec<CountryRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRule {
    pub country_code: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub document_number: Vec<CorrectionRule>,
    #[serde(default)]
    pub personal_number: Vec<CorrectionRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CorrectionRule {
    Substitute { from: char, to: char },
    LetterBias,
    DigitBias,
}

impl CorrectionRule {
    pub fn apply(&self, value: &str) -> String {
        match self {
            CorrectionRule::Substitute { from, to } => value.replace(*from, &to.to_string()),
            CorrectionRule::LetterBias => OcrCorrector::replace_letters(value),
            CorrectionRule::DigitBias => OcrCorrector::replace_digits(value),
        }
    }
}

impl CountryRule {
    pub fn correct_document_number(&self, value: &str) -> String {
        Self::apply_all(&self.document_number, value)
    }

    pub fn correct_personal_number(&self, value: &str) -> String {
        Self::apply_all(&self.personal_number, value)
    }

    fn apply_all(rules: &[CorrectionRule], value: &str) -> String {
        rules
            .iter()
            .fold(value.to_string(), |current, rule| rule.apply(&current))
    }
}

impl CountryRules {
    pub fn new() -> Self {
        let mut countries = Vec::new();

        // Netherlands: digit-heavy document numbers and numeric personal numbers
        countries.push(CountryRule {
            country_code: "NLD".to_string(),
            country_name: "NETHERLANDS".to_string(),
            document_number: vec![CorrectionRule::Substitute { from: 'O', to: '0' }],
            personal_number: vec![CorrectionRule::LetterBias],
        });

        // Germany is coded "D<<"
        countries.push(CountryRule {
            country_code: "D".to_string(),
            country_name: "GERMANY".to_string(),
            document_number: vec![CorrectionRule::Substitute { from: 'O', to: '0' }],
            personal_number: Vec::new(),
        });

        CountryRules { countries }
    }

    pub fn empty() -> Self {
        CountryRules {
            countries: Vec::new(),
        }
    }

    /// Look up a rule; fillers around the code are ignored.
    pub fn find(&self, country_code: &str) -> Option<&CountryRule> {
        let code = trim_fillers(country_code);
        if code.is_empty() {
            return None;
        }
        self.countries
            .iter()
            .find(|rule| trim_fillers(&rule.country_code) == code)
    }

    pub fn get_rule(&self, country_code: &str) -> Result<&CountryRule, MrzError> {
        self.find(country_code).ok_or_else(|| {
            MrzError::CountryRuleNotFound(format!(
                "No rule found for country code: {}",
                country_code
            ))
        })
    }
}

impl Default for CountryRules {
    fn default() -> Self {
        Self::new()
    }
}
