// Substitution tables for glyphs that OCR engines commonly confuse in the
// OCR-B font used by machine-readable zones

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::models::FieldKind;

lazy_static! {
    /// Digits read where a letter is expected (names, document type).
    pub static ref DIGIT_TO_LETTER: HashMap<char, char> = {
        let mut m = HashMap::new();
        m.insert('0', 'O');
        m.insert('1', 'I');
        m.insert('2', 'Z');
        m.insert('3', 'B');
        m.insert('8', 'B');
        m.insert('5', 'S');
        m
    };

    /// Letters read where a digit is expected (dates, check digits).
    pub static ref LETTER_TO_DIGIT: HashMap<char, char> = {
        let mut m = HashMap::new();
        m.insert('O', '0');
        m.insert('Q', '0');
        m.insert('U', '0');
        m.insert('D', '0');
        m.insert('I', '1');
        m.insert('Z', '2');
        m.insert('B', '8');
        m.insert('S', '5');
        m
    };
}

pub struct OcrCorrector;

impl OcrCorrector {
    /// Field-appropriate correction applied before interpretation.
    pub fn correct(value: &str, kind: FieldKind) -> String {
        match kind {
            FieldKind::Birthdate | FieldKind::ExpiryDate | FieldKind::Hash => {
                Self::replace_letters(value)
            }
            FieldKind::Names | FieldKind::DocumentType => Self::replace_digits(value),
            FieldKind::Sex => value.replace('P', "F"),
            FieldKind::CountryCode | FieldKind::Nationality => value.replace('0', "D"),
            FieldKind::DocumentNumber | FieldKind::PersonalNumber | FieldKind::OptionalData => {
                value.to_string()
            }
        }
    }

    pub fn replace_digits(value: &str) -> String {
        Self::substitute(value, &DIGIT_TO_LETTER)
    }

    pub fn replace_letters(value: &str) -> String {
        Self::substitute(value, &LETTER_TO_DIGIT)
    }

    /// Single check-digit character, read as a digit.
    pub fn correct_check_digit(c: char) -> char {
        LETTER_TO_DIGIT.get(&c).copied().unwrap_or(c)
    }

    fn substitute(value: &str, table: &HashMap<char, char>) -> String {
        value
            .chars()
            .map(|c| table.get(&c).copied().unwrap_or(c))
            .collect()
    }
}
