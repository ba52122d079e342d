use log::debug;
use std::collections::HashMap;

use crate::config::ParserConfig;
use crate::models::*;
use crate::processing::*;
use crate::utils::text::is_mrz_char;
use crate::utils::MrzError;
use crate::validation::*;

/// MrzParser turns raw MRZ lines into an [`MrzResult`].
///
/// A parser holds no per-call state and can be shared between threads;
/// each call works on its own copy of the lines.
#[derive(Debug, Clone)]
pub struct MrzParser {
    config: ParserConfig,
    formatter: FieldFormatter,
}

impl MrzParser {
    pub fn new(ocr_correction: bool) -> Self {
        Self::with_config(ParserConfig {
            ocr_correction,
            ..ParserConfig::default()
        })
    }

    pub fn with_config(config: ParserConfig) -> Self {
        let mut formatter = FieldFormatter::new(config.ocr_correction).with_recoverer(
            DocumentNumberRecoverer::new(config.max_ambiguous_positions),
        );
        if let Some(year) = config.reference_year {
            formatter = formatter.with_current_year(year);
        }
        MrzParser { config, formatter }
    }

    /// Parse MRZ lines; `None` when they match no known layout.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Option<MrzResult> {
        match self.try_parse(lines) {
            Ok(result) => Some(result),
            Err(err) => {
                debug!("MRZ rejected: {}", err);
                None
            }
        }
    }

    /// Split recognized text into lines, then parse them.
    pub fn parse_text(&self, text: &str) -> Option<MrzResult> {
        let lines = MrzLineExtractor::extract(text)?;
        self.parse(&lines)
    }

    // Main parsing function that orchestrates the entire process
    pub fn try_parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<MrzResult, MrzError> {
        // Step 1: Detect the layout
        let format = FormatDetector::detect(lines)?;
        if let Some(c) = lines
            .iter()
            .flat_map(|line| line.as_ref().chars())
            .find(|c| !is_mrz_char(*c))
        {
            return Err(MrzError::InvalidCharacter(c));
        }

        // Step 2: Format every field on a private copy of the lines
        let layout = Layout::for_format(format);
        let mut buffers: Vec<Vec<u8>> = lines
            .iter()
            .map(|line| line.as_ref().as_bytes().to_vec())
            .collect();
        let mut fields: HashMap<Slot, MrzField<FieldValue>> = HashMap::new();

        for field_spec in layout.fields {
            let country_rule = match field_spec.kind {
                FieldKind::DocumentNumber | FieldKind::PersonalNumber => self.country_rule(&fields),
                _ => None,
            };
            let field = self.formatter.field(
                field_spec.kind,
                &mut buffers[field_spec.line],
                field_spec.start,
                field_spec.length,
                field_spec.check_digit,
                country_rule,
            );
            fields.insert(field_spec.slot, field);
        }

        // Step 3: Composite check digit over the corrected fields
        let is_composite_valid = Self::composite_validity(layout, &fields);

        // Step 4: Assemble the result
        let mrz_code = lines.iter().map(|line| line.as_ref().to_string()).collect();
        Ok(Self::assemble(format, fields, is_composite_valid, mrz_code))
    }

    /// Country rules are keyed on the issuing state, then the nationality.
    fn country_rule(&self, fields: &HashMap<Slot, MrzField<FieldValue>>) -> Option<&CountryRule> {
        [Slot::CountryCode, Slot::Nationality]
            .iter()
            .filter_map(|slot| fields.get(slot))
            .find_map(|field| match self.config.country_rules.get_rule(&field.raw_value) {
                Ok(rule) => Some(rule),
                Err(err) => {
                    debug!("{}", err);
                    None
                }
            })
    }

    fn composite_validity(
        layout: &Layout,
        fields: &HashMap<Slot, MrzField<FieldValue>>,
    ) -> Option<bool> {
        let final_digit = fields.get(&Slot::FinalCheckDigit)?.raw_value.chars().next()?;
        let composite: String = layout
            .composite
            .iter()
            .filter_map(|slot| fields.get(slot))
            .map(MrzField::raw_with_check_digit)
            .collect();
        let is_valid = CheckDigit::is_value_valid(&composite, final_digit);
        debug!("Composite {} against {}: {}", composite, final_digit, is_valid);
        Some(is_valid)
    }

    fn assemble(
        format: DocumentFormat,
        mut fields: HashMap<Slot, MrzField<FieldValue>>,
        is_composite_valid: Option<bool>,
        mrz_code: Vec<String>,
    ) -> MrzResult {
        let mut take = |slot: Slot| fields.remove(&slot);
        let text = |field: Option<MrzField<FieldValue>>| {
            field
                .and_then(|f| f.value)
                .and_then(FieldValue::into_text)
                .unwrap_or_default()
        };

        let document_type = text(take(Slot::DocumentType));
        let country_code = text(take(Slot::CountryCode));
        let nationality_country_code = text(take(Slot::Nationality));
        let document_number = take(Slot::DocumentNumber).map(|f| f.map_value(FieldValue::into_text));
        let birthdate = take(Slot::Birthdate).map(|f| f.map_value(FieldValue::into_date));
        let expiry_date = take(Slot::ExpiryDate).map(|f| f.map_value(FieldValue::into_date));
        let names = take(Slot::Names).and_then(|f| f.value).and_then(FieldValue::into_names);
        let sex = take(Slot::Sex).and_then(|f| f.value).and_then(FieldValue::into_sex);
        let personal_number = take(Slot::PersonalNumber).map(|f| f.map_value(FieldValue::into_text));
        let personal_number2 = take(Slot::PersonalNumber2).map(|f| text(Some(f)));

        let is_document_number_valid = Self::is_checked_valid(document_number.as_ref());
        let is_birthdate_valid = Self::is_checked_valid(birthdate.as_ref());
        let is_expiry_date_valid = Self::is_checked_valid(expiry_date.as_ref());
        let is_personal_number_valid = personal_number.as_ref().and_then(|f| f.is_valid);

        // Fields without a check digit do not take part
        let all_check_digits_valid = is_document_number_valid
            && is_birthdate_valid
            && is_expiry_date_valid
            && is_personal_number_valid.unwrap_or(true)
            && is_composite_valid.unwrap_or(true);

        let names = names.unwrap_or(Names {
            primary: String::new(),
            secondary: String::new(),
        });

        MrzResult {
            format,
            document_type,
            country_code,
            surnames: names.primary,
            given_names: names.secondary,
            document_number: document_number.and_then(|f| f.value).unwrap_or_default(),
            nationality_country_code,
            personal_number: personal_number.and_then(|f| f.value).unwrap_or_default(),
            personal_number2,
            birthdate: birthdate.and_then(|f| f.value),
            sex,
            expiry_date: expiry_date.and_then(|f| f.value),
            mrz_code,
            is_document_number_valid,
            is_birthdate_valid,
            is_expiry_date_valid,
            is_personal_number_valid,
            is_composite_valid,
            all_check_digits_valid,
        }
    }

    fn is_checked_valid<T>(field: Option<&MrzField<T>>) -> bool {
        field.and_then(|f| f.is_valid).unwrap_or(false)
    }
}

impl Default for MrzParser {
    fn default() -> Self {
        Self::with_config(ParserConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const TD3_LINES: [&str; 2] = [
        "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
        "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
    ];

    fn parser() -> MrzParser {
        MrzParser::with_config(ParserConfig {
            reference_year: Some(2026),
            ..ParserConfig::default()
        })
    }

    fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    #[test]
    fn test_passport() {
        let result = parser().parse(&TD3_LINES).unwrap();
        assert_eq!(result.format, DocumentFormat::TD3);
        assert_eq!(result.document_type, "P");
        assert_eq!(result.country_code, "UTO");
        assert_eq!(result.surnames, "ERIKSSON");
        assert_eq!(result.given_names, "ANNA MARIA");
        assert_eq!(result.document_number, "L898902C3");
        assert_eq!(result.nationality_country_code, "UTO");
        assert_eq!(result.birthdate, date(1974, 8, 12));
        assert_eq!(result.sex, Some(Sex::Female));
        assert_eq!(result.expiry_date, date(2012, 4, 15));
        assert_eq!(result.personal_number, "ZE184226B");
        assert_eq!(result.personal_number2, None);
        assert_eq!(result.mrz_code, TD3_LINES.to_vec());
        assert!(result.is_document_number_valid);
        assert!(result.is_birthdate_valid);
        assert!(result.is_expiry_date_valid);
        assert_eq!(result.is_personal_number_valid, Some(true));
        assert_eq!(result.is_composite_valid, Some(true));
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_passport_with_flipped_zero() {
        let corrupted = [
            TD3_LINES[0],
            "L8989O2C36UTO7408122F1204159ZE184226B<<<<<10",
        ];
        let clean = parser().parse(&TD3_LINES).unwrap();
        let recovered = parser().parse(&corrupted).unwrap();
        assert_eq!(recovered.document_number, "L898902C3");
        assert!(recovered.is_document_number_valid);
        assert!(recovered.all_check_digits_valid);
        assert_eq!(recovered, clean);
        // The raw input is kept as given
        assert_eq!(recovered.mrz_code[1], corrupted[1]);
    }

    #[test]
    fn test_no_correction_mode_reports_corruption() {
        let noisy = [
            "P<UTOER1KSS0N<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO74O8122F1204159ZE184226B<<<<<10",
        ];
        let parser = MrzParser::with_config(ParserConfig {
            ocr_correction: false,
            reference_year: Some(2026),
            ..ParserConfig::default()
        });
        let result = parser.parse(&noisy).unwrap();
        assert_eq!(result.surnames, "ER1KSS0N");
        assert_eq!(result.birthdate, None);
        assert!(!result.is_birthdate_valid);
        assert_eq!(result.is_composite_valid, Some(false));
        assert!(!result.all_check_digits_valid);

        // Clean input parses identically with or without correction
        assert_eq!(parser.parse(&TD3_LINES).unwrap(), self::parser().parse(&TD3_LINES).unwrap());
    }

    #[test]
    fn test_no_correction_mode_still_recovers_document_number() {
        let corrupted = [
            TD3_LINES[0],
            "L8989O2C36UTO7408122F1204159ZE184226B<<<<<10",
        ];
        let parser = MrzParser::with_config(ParserConfig {
            ocr_correction: false,
            reference_year: Some(2026),
            ..ParserConfig::default()
        });
        let result = parser.parse(&corrupted).unwrap();
        assert_eq!(result.document_number, "L898902C3");
        assert!(result.is_document_number_valid);
        assert_eq!(result.is_composite_valid, Some(true));
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_ocr_noise_in_names_and_dates() {
        let noisy = [
            "P<UTOER1KSS0N<<ANNA<MAR1A<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO74O8I22P12O4I59ZE184226B<<<<<1O",
        ];
        let result = parser().parse(&noisy).unwrap();
        assert_eq!(result, parser().parse(&TD3_LINES).unwrap());
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_malformed_layout() {
        let lines = ["P<UTOERIKSSON<<ANNA<"];
        assert!(parser().parse(&lines).is_none());
        assert!(matches!(
            parser().try_parse(&lines),
            Err(MrzError::FormatError(_))
        ));
    }

    #[test]
    fn test_rejects_foreign_characters() {
        let lines = [
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO7408122F1204159ZE184226B<<<<<1 ",
        ];
        assert!(matches!(
            parser().try_parse(&lines),
            Err(MrzError::InvalidCharacter(' '))
        ));
    }

    #[test]
    fn test_wrong_composite_digit() {
        let lines = [TD3_LINES[0], "L898902C36UTO7408122F1204159ZE184226B<<<<<13"];
        let result = parser().parse(&lines).unwrap();
        assert!(result.is_document_number_valid);
        assert_eq!(result.is_personal_number_valid, Some(true));
        assert_eq!(result.is_composite_valid, Some(false));
        assert!(!result.all_check_digits_valid);
    }

    #[test]
    fn test_invalid_birthdate_still_parses() {
        // Month 13 with a matching check digit
        let digit = CheckDigit::compute("741312").unwrap();
        let line2 = format!("L898902C36UTO741312{}F1204159ZE184226B<<<<<1", digit);
        let composite = format!("L898902C36741312{}1204159ZE184226B<<<<<1", digit);
        let line2 = format!("{}{}", line2, CheckDigit::compute(&composite).unwrap());
        let result = parser().parse(&[TD3_LINES[0].to_string(), line2]).unwrap();
        assert_eq!(result.birthdate, None);
        assert!(result.is_birthdate_valid);
        assert!(result.all_check_digits_valid);
        assert_eq!(result.surnames, "ERIKSSON");
    }

    #[test]
    fn test_id_card_td1() {
        let lines = [
            "I<UTOD231458907<<<<<<<<<<<<<<<",
            "7408122F1204159UTO<<<<<<<<<<<6",
            "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        ];
        let result = parser().parse(&lines).unwrap();
        assert_eq!(result.format, DocumentFormat::TD1);
        assert_eq!(result.document_type, "I");
        assert_eq!(result.country_code, "UTO");
        assert_eq!(result.document_number, "D23145890");
        assert_eq!(result.nationality_country_code, "UTO");
        assert_eq!(result.surnames, "ERIKSSON");
        assert_eq!(result.given_names, "ANNA MARIA");
        assert_eq!(result.birthdate, date(1974, 8, 12));
        assert_eq!(result.expiry_date, date(2012, 4, 15));
        assert_eq!(result.personal_number, "");
        assert_eq!(result.personal_number2, Some(String::new()));
        assert_eq!(result.is_personal_number_valid, None);
        assert_eq!(result.is_composite_valid, Some(true));
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_id_card_td2() {
        let lines = [
            "I<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<",
            "D231458907UTO7408122F1204159<<<<<<<6",
        ];
        let result = parser().parse(&lines).unwrap();
        assert_eq!(result.format, DocumentFormat::TD2);
        assert_eq!(result.document_number, "D23145890");
        assert_eq!(result.given_names, "ANNA MARIA");
        assert_eq!(result.sex, Some(Sex::Female));
        assert_eq!(result.personal_number2, None);
        assert_eq!(result.is_personal_number_valid, None);
        assert_eq!(result.is_composite_valid, Some(true));
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_visa_mrva() {
        let lines = [
            "V<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L8988901C4XXX4009078F96121096ZE184226B<<<<<<",
        ];
        let result = parser().parse(&lines).unwrap();
        assert_eq!(result.format, DocumentFormat::MRVA);
        assert_eq!(result.document_type, "V");
        assert_eq!(result.document_number, "L8988901C");
        assert_eq!(result.nationality_country_code, "XXX");
        assert_eq!(result.birthdate, date(1940, 9, 7));
        assert_eq!(result.sex, Some(Sex::Female));
        assert_eq!(result.expiry_date, date(1996, 12, 10));
        assert_eq!(result.personal_number, "6ZE184226B");
        assert_eq!(result.is_personal_number_valid, None);
        assert_eq!(result.is_composite_valid, None);
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_visa_mrvb() {
        let lines = [
            "V<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<",
            "L8988901C4XXX4009078F9612109<<<<<<<<",
        ];
        let result = parser().parse(&lines).unwrap();
        assert_eq!(result.format, DocumentFormat::MRVB);
        assert_eq!(result.surnames, "ERIKSSON");
        assert_eq!(result.personal_number, "");
        assert_eq!(result.is_composite_valid, None);
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_german_passport_rule() {
        let lines = [
            "P<D<<MUSTERMANN<<ERIKA<<<<<<<<<<<<<<<<<<<<<<",
            "CO1XOOT478D<<6408125F2702283<<<<<<<<<<<<<<<4",
        ];
        let parser = MrzParser::with_config(ParserConfig {
            reference_year: Some(2026),
            max_ambiguous_positions: 0,
            ..ParserConfig::default()
        });
        let result = parser.parse(&lines).unwrap();
        assert_eq!(result.country_code, "D");
        assert_eq!(result.nationality_country_code, "D");
        assert_eq!(result.document_number, "C01X00T47");
        assert_eq!(result.is_personal_number_valid, Some(true));
        assert!(result.all_check_digits_valid);

        // Without country rules the capped search cannot repair it
        let parser = MrzParser::with_config(ParserConfig {
            reference_year: Some(2026),
            max_ambiguous_positions: 0,
            country_rules: CountryRules::empty(),
            ..ParserConfig::default()
        });
        let result = parser.parse(&lines).unwrap();
        assert!(!result.is_document_number_valid);
        assert!(!result.all_check_digits_valid);
    }

    #[test]
    fn test_dutch_passport() {
        let lines = [
            "P<NLDDE<BRUIJN<<WILLEKE<LISELOTTE<<<<<<<<<<<",
            "SPECI20142NLD6503101F2401151999999990<<<<<82",
        ];
        let result = parser().parse(&lines).unwrap();
        assert_eq!(result.surnames, "DE BRUIJN");
        assert_eq!(result.given_names, "WILLEKE LISELOTTE");
        assert_eq!(result.document_number, "SPECI2014");
        assert_eq!(result.personal_number, "999999990");
        assert_eq!(result.expiry_date, date(2024, 1, 15));
        assert!(result.all_check_digits_valid);
    }

    #[test]
    fn test_parse_text() {
        let text = format!("\n{}\n{}\n", TD3_LINES[0], TD3_LINES[1]);
        let result = parser().parse_text(&text).unwrap();
        assert_eq!(result.document_number, "L898902C3");
        assert!(parser().parse_text("not an mrz").is_none());
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        let parser = std::sync::Arc::new(parser());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let parser = std::sync::Arc::clone(&parser);
                std::thread::spawn(move || parser.parse(&TD3_LINES).map(|r| r.document_number))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("L898902C3"));
        }
    }
}
