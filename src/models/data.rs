use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::CheckDigit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    TD1,  // ID card, 3 lines of 30
    TD2,  // ID card, 2 lines of 36
    TD3,  // Passport, 2 lines of 44
    MRVA, // Visa, 2 lines of 44
    MRVB, // Visa, 2 lines of 36
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 5] = [
        DocumentFormat::TD1,
        DocumentFormat::TD2,
        DocumentFormat::TD3,
        DocumentFormat::MRVA,
        DocumentFormat::MRVB,
    ];

    pub fn mrz_lines(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 3,
            DocumentFormat::TD2 => 2,
            DocumentFormat::TD3 => 2,
            DocumentFormat::MRVA => 2,
            DocumentFormat::MRVB => 2,
        }
    }

    pub fn mrz_chars_per_line(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 30,
            DocumentFormat::TD2 => 36,
            DocumentFormat::TD3 => 44,
            DocumentFormat::MRVA => 44,
            DocumentFormat::MRVB => 36,
        }
    }

    /// Visa layouts share their line signature with TD2/TD3 and are told
    /// apart by the leading `V` of the document type.
    pub fn is_visa(&self) -> bool {
        matches!(self, DocumentFormat::MRVA | DocumentFormat::MRVB)
    }

    /// Whether line two ends in a composite check digit.
    pub fn has_composite_check(&self) -> bool {
        !self.is_visa()
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DocumentFormat::TD1 => "TD1",
            DocumentFormat::TD2 => "TD2",
            DocumentFormat::TD3 => "TD3",
            DocumentFormat::MRVA => "MRV-A",
            DocumentFormat::MRVB => "MRV-B",
        };
        write!(f, "{}", name)
    }
}

/// Field kinds drive both OCR correction and value interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    DocumentType,
    CountryCode,
    DocumentNumber,
    Birthdate,
    ExpiryDate,
    Names,
    Nationality,
    Sex,
    PersonalNumber,
    OptionalData,
    Hash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "X")]
    Other,
    #[serde(rename = "UNSPECIFIED")]
    Unspecified,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Other => "X",
            Sex::Unspecified => "UNSPECIFIED",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Primary and secondary identifiers of the holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    pub primary: String,
    pub secondary: String,
}

/// Interpreted value of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Names(Names),
    Date(NaiveDate),
    Sex(Sex),
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_names(self) -> Option<Names> {
        match self {
            FieldValue::Names(names) => Some(names),
            _ => None,
        }
    }

    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn into_sex(self) -> Option<Sex> {
        match self {
            FieldValue::Sex(sex) => Some(sex),
            _ => None,
        }
    }
}

/// The outcome of formatting one field.
///
/// `raw_value` is the corrected text and always has the field's declared
/// width. `is_valid` is `None` for fields without a check digit and is
/// derived from `raw_value` and `check_digit` alone, never from `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct MrzField<T> {
    pub value: Option<T>,
    pub raw_value: String,
    pub check_digit: Option<char>,
    pub is_valid: Option<bool>,
}

impl<T> MrzField<T> {
    pub fn new(value: Option<T>, raw_value: String, check_digit: Option<char>) -> Self {
        let is_valid = check_digit.map(|digit| CheckDigit::is_value_valid(&raw_value, digit));
        MrzField {
            value,
            raw_value,
            check_digit,
            is_valid,
        }
    }

    /// Narrow the value to another type, keeping raw text and validity.
    pub fn map_value<U>(self, f: impl FnOnce(T) -> Option<U>) -> MrzField<U> {
        MrzField {
            value: self.value.and_then(f),
            raw_value: self.raw_value,
            check_digit: self.check_digit,
            is_valid: self.is_valid,
        }
    }

    /// Raw value followed by its check digit, as used in composite checks.
    pub fn raw_with_check_digit(&self) -> String {
        let mut out = self.raw_value.clone();
        if let Some(digit) = self.check_digit {
            out.push(digit);
        }
        out
    }
}

/// Parsed and validated content of a machine-readable zone.
#[derive(Debug, Clone, Serialize)]
pub struct MrzResult {
    pub format: DocumentFormat,
    pub document_type: String,
    pub country_code: String,
    pub surnames: String,
    pub given_names: String,
    pub document_number: String,
    pub nationality_country_code: String,
    pub personal_number: String,
    pub personal_number2: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub expiry_date: Option<NaiveDate>,
    pub mrz_code: Vec<String>,

    pub is_document_number_valid: bool,
    pub is_birthdate_valid: bool,
    pub is_expiry_date_valid: bool,
    pub is_personal_number_valid: Option<bool>,
    pub is_composite_valid: Option<bool>,
    pub all_check_digits_valid: bool,
}

// Decoded content only; validity flags and source lines are not compared.
impl PartialEq for MrzResult {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
            && self.document_type == other.document_type
            && self.country_code == other.country_code
            && self.surnames == other.surnames
            && self.given_names == other.given_names
            && self.document_number == other.document_number
            && self.nationality_country_code == other.nationality_country_code
            && self.personal_number == other.personal_number
            && self.personal_number2 == other.personal_number2
            && self.birthdate == other.birthdate
            && self.sex == other.sex
            && self.expiry_date == other.expiry_date
    }
}
