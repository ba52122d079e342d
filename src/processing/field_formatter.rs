use chrono::{Datelike, Local, NaiveDate};
use log::{debug, warn};

use super::{DocumentNumberRecoverer, OcrCorrector};
use crate::models::{CountryRule, FieldKind, FieldValue, MrzField, Names, Sex};
use crate::utils::text::{fillers_to_spaces, is_mrz_char, slice_to_string, trim_fillers, write_back};

/// FieldFormatter cuts a field out of a line buffer, applies OCR
/// corrections and interprets the text according to its kind.
///
/// Corrections are written back into the buffer, so later fields and the
/// composite check digit see the corrected text.
#[derive(Debug, Clone)]
pub struct FieldFormatter {
    ocr_correction: bool,
    current_year: i32,
    recoverer: DocumentNumberRecoverer,
}

impl FieldFormatter {
    pub fn new(ocr_correction: bool) -> Self {
        FieldFormatter {
            ocr_correction,
            current_year: Local::now().year(),
            recoverer: DocumentNumberRecoverer::default(),
        }
    }

    /// Fix the year used to pick the century of birthdates.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn with_recoverer(mut self, recoverer: DocumentNumberRecoverer) -> Self {
        self.recoverer = recoverer;
        self
    }

    /// Format the field at `start..start + length` of `line`.
    ///
    /// `line` must hold at least `start + length` characters, plus one when
    /// a check digit follows.
    pub fn field(
        &self,
        kind: FieldKind,
        line: &mut [u8],
        start: usize,
        length: usize,
        check_digit_follows: bool,
        country_rule: Option<&CountryRule>,
    ) -> MrzField<FieldValue> {
        let mut raw_value = slice_to_string(line, start, length);
        // Check digits are always read as digits
        let check_digit = if check_digit_follows {
            line.get(start + length)
                .map(|&b| OcrCorrector::correct_check_digit(b as char))
        } else {
            None
        };

        // Step 1: generic correction table for the field kind
        if self.ocr_correction {
            let corrected = OcrCorrector::correct(&raw_value, kind);
            if corrected != raw_value {
                debug!("OCR correction on {:?}: {} -> {}", kind, raw_value, corrected);
                raw_value = corrected;
            }
            write_back(line, start, &raw_value);
            if let Some(digit) = check_digit {
                line[start + length] = digit as u8;
            }
        }

        // Step 2: issuing-state overrides
        if let Some(rule) = country_rule {
            let overridden = match kind {
                FieldKind::DocumentNumber => Some(rule.correct_document_number(&raw_value)),
                FieldKind::PersonalNumber => Some(rule.correct_personal_number(&raw_value)),
                _ => None,
            };
            if let Some(overridden) = overridden {
                if Self::is_same_shape(&raw_value, &overridden) {
                    if overridden != raw_value {
                        debug!(
                            "{} rule on {:?}: {} -> {}",
                            rule.country_code, kind, raw_value, overridden
                        );
                    }
                    raw_value = overridden;
                    write_back(line, start, &raw_value);
                } else {
                    warn!(
                        "Ignoring {} rule output {:?}: not a {}-character MRZ string",
                        rule.country_code,
                        overridden,
                        raw_value.len()
                    );
                }
            }
        }

        let mut field = MrzField::new(self.format(&raw_value, kind), raw_value.clone(), check_digit);

        // Step 3: personal numbers get one more O -> 0 pass
        if kind == FieldKind::PersonalNumber && field.is_valid == Some(false) {
            let retried = raw_value.replace('O', "0");
            if retried != raw_value {
                write_back(line, start, &retried);
                field = MrzField::new(self.format(&retried, kind), retried.clone(), check_digit);
                raw_value = retried;
            }
        }

        // Step 4: search 0/O assignments for a failing document number
        if kind == FieldKind::DocumentNumber && field.is_valid == Some(false) {
            if let Some(digit) = check_digit {
                let recovered = self.recoverer.recover(&raw_value, digit);
                if recovered != raw_value {
                    write_back(line, start, &recovered);
                    field = MrzField::new(self.format(&recovered, kind), recovered, check_digit);
                }
            }
        }

        field
    }

    /// Interpret already-corrected text. `None` means the text is not a
    /// valid value of this kind.
    pub fn format(&self, value: &str, kind: FieldKind) -> Option<FieldValue> {
        match kind {
            FieldKind::Names => Some(FieldValue::Names(Self::names(value))),
            FieldKind::Birthdate => self.birthdate(value).map(FieldValue::Date),
            FieldKind::ExpiryDate => Self::expiry_date(value).map(FieldValue::Date),
            FieldKind::Sex => Self::sex(value).map(FieldValue::Sex),
            FieldKind::DocumentType
            | FieldKind::CountryCode
            | FieldKind::DocumentNumber
            | FieldKind::Nationality
            | FieldKind::PersonalNumber
            | FieldKind::OptionalData
            | FieldKind::Hash => Some(FieldValue::Text(fillers_to_spaces(value))),
        }
    }

    fn names(value: &str) -> Names {
        let mut identifiers = trim_fillers(value).split("<<");
        let primary = identifiers.next().map(fillers_to_spaces).unwrap_or_default();
        let secondary = identifiers.next().map(fillers_to_spaces).unwrap_or_default();
        Names { primary, secondary }
    }

    fn sex(value: &str) -> Option<Sex> {
        match value {
            "M" => Some(Sex::Male),
            "F" => Some(Sex::Female),
            "X" => Some(Sex::Other),
            "<" => Some(Sex::Unspecified),
            _ => None,
        }
    }

    // A birth year ahead of the current year belongs to the last century
    fn birthdate(&self, value: &str) -> Option<NaiveDate> {
        let (year, month, day) = Self::date_parts(value)?;
        let century = if year > self.current_year % 100 { 1900 } else { 2000 };
        NaiveDate::from_ymd_opt(century + year, month, day)
    }

    fn expiry_date(value: &str) -> Option<NaiveDate> {
        let (year, month, day) = Self::date_parts(value)?;
        let century = if year >= 70 { 1900 } else { 2000 };
        NaiveDate::from_ymd_opt(century + year, month, day)
    }

    // YYMMDD
    fn date_parts(value: &str) -> Option<(i32, u32, u32)> {
        if value.len() != 6 || !value.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year = value[0..2].parse::<i32>().ok()?;
        let month = value[2..4].parse::<u32>().ok()?;
        let day = value[4..6].parse::<u32>().ok()?;
        Some((year, month, day))
    }

    fn is_same_shape(original: &str, corrected: &str) -> bool {
        corrected.len() == original.len() && corrected.chars().all(is_mrz_char)
    }
}
