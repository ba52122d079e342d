// Field offset tables for each supported MRZ layout (ICAO Doc 9303 parts 4-7)

use super::data::{DocumentFormat, FieldKind};

/// Where a formatted field lands in the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    DocumentType,
    CountryCode,
    Nationality,
    DocumentNumber,
    Birthdate,
    ExpiryDate,
    Names,
    Sex,
    PersonalNumber,
    PersonalNumber2,
    FinalCheckDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub slot: Slot,
    pub kind: FieldKind,
    pub line: usize,
    pub start: usize,
    pub length: usize,
    pub check_digit: bool,
}

const fn field_at(
    slot: Slot,
    kind: FieldKind,
    line: usize,
    start: usize,
    length: usize,
    check_digit: bool,
) -> FieldSpec {
    FieldSpec {
        slot,
        kind,
        line,
        start,
        length,
        check_digit,
    }
}

/// Field table plus the slots whose raw text (and check digits) feed the
/// composite check digit, in concatenation order.
#[derive(Debug)]
pub struct Layout {
    pub format: DocumentFormat,
    pub fields: &'static [FieldSpec],
    pub composite: &'static [Slot],
}

// Country and nationality come before the number fields that consult them.

const TD1_FIELDS: [FieldSpec; 11] = [
    field_at(Slot::DocumentType, FieldKind::DocumentType, 0, 0, 2, false),
    field_at(Slot::CountryCode, FieldKind::CountryCode, 0, 2, 3, false),
    field_at(Slot::Nationality, FieldKind::Nationality, 1, 15, 3, false),
    field_at(Slot::DocumentNumber, FieldKind::DocumentNumber, 0, 5, 9, true),
    field_at(Slot::Birthdate, FieldKind::Birthdate, 1, 0, 6, true),
    field_at(Slot::ExpiryDate, FieldKind::ExpiryDate, 1, 8, 6, true),
    field_at(Slot::Names, FieldKind::Names, 2, 0, 30, false),
    field_at(Slot::Sex, FieldKind::Sex, 1, 7, 1, false),
    field_at(Slot::PersonalNumber, FieldKind::OptionalData, 0, 15, 15, false),
    field_at(Slot::PersonalNumber2, FieldKind::OptionalData, 1, 18, 11, false),
    field_at(Slot::FinalCheckDigit, FieldKind::Hash, 1, 29, 1, false),
];

const TD2_FIELDS: [FieldSpec; 10] = [
    field_at(Slot::DocumentType, FieldKind::DocumentType, 0, 0, 2, false),
    field_at(Slot::CountryCode, FieldKind::CountryCode, 0, 2, 3, false),
    field_at(Slot::Nationality, FieldKind::Nationality, 1, 10, 3, false),
    field_at(Slot::DocumentNumber, FieldKind::DocumentNumber, 1, 0, 9, true),
    field_at(Slot::Birthdate, FieldKind::Birthdate, 1, 13, 6, true),
    field_at(Slot::ExpiryDate, FieldKind::ExpiryDate, 1, 21, 6, true),
    field_at(Slot::Names, FieldKind::Names, 0, 5, 31, false),
    field_at(Slot::Sex, FieldKind::Sex, 1, 20, 1, false),
    field_at(Slot::PersonalNumber, FieldKind::OptionalData, 1, 28, 7, false),
    field_at(Slot::FinalCheckDigit, FieldKind::Hash, 1, 35, 1, false),
];

const TD3_FIELDS: [FieldSpec; 10] = [
    field_at(Slot::DocumentType, FieldKind::DocumentType, 0, 0, 2, false),
    field_at(Slot::CountryCode, FieldKind::CountryCode, 0, 2, 3, false),
    field_at(Slot::Nationality, FieldKind::Nationality, 1, 10, 3, false),
    field_at(Slot::DocumentNumber, FieldKind::DocumentNumber, 1, 0, 9, true),
    field_at(Slot::Birthdate, FieldKind::Birthdate, 1, 13, 6, true),
    field_at(Slot::ExpiryDate, FieldKind::ExpiryDate, 1, 21, 6, true),
    field_at(Slot::Names, FieldKind::Names, 0, 5, 39, false),
    field_at(Slot::Sex, FieldKind::Sex, 1, 20, 1, false),
    field_at(Slot::PersonalNumber, FieldKind::PersonalNumber, 1, 28, 14, true),
    field_at(Slot::FinalCheckDigit, FieldKind::Hash, 1, 43, 1, false),
];

const MRVA_FIELDS: [FieldSpec; 9] = [
    field_at(Slot::DocumentType, FieldKind::DocumentType, 0, 0, 2, false),
    field_at(Slot::CountryCode, FieldKind::CountryCode, 0, 2, 3, false),
    field_at(Slot::Nationality, FieldKind::Nationality, 1, 10, 3, false),
    field_at(Slot::DocumentNumber, FieldKind::DocumentNumber, 1, 0, 9, true),
    field_at(Slot::Birthdate, FieldKind::Birthdate, 1, 13, 6, true),
    field_at(Slot::ExpiryDate, FieldKind::ExpiryDate, 1, 21, 6, true),
    field_at(Slot::Names, FieldKind::Names, 0, 5, 39, false),
    field_at(Slot::Sex, FieldKind::Sex, 1, 20, 1, false),
    field_at(Slot::PersonalNumber, FieldKind::OptionalData, 1, 28, 16, false),
];

const MRVB_FIELDS: [FieldSpec; 9] = [
    field_at(Slot::DocumentType, FieldKind::DocumentType, 0, 0, 2, false),
    field_at(Slot::CountryCode, FieldKind::CountryCode, 0, 2, 3, false),
    field_at(Slot::Nationality, FieldKind::Nationality, 1, 10, 3, false),
    field_at(Slot::DocumentNumber, FieldKind::DocumentNumber, 1, 0, 9, true),
    field_at(Slot::Birthdate, FieldKind::Birthdate, 1, 13, 6, true),
    field_at(Slot::ExpiryDate, FieldKind::ExpiryDate, 1, 21, 6, true),
    field_at(Slot::Names, FieldKind::Names, 0, 5, 31, false),
    field_at(Slot::Sex, FieldKind::Sex, 1, 20, 1, false),
    field_at(Slot::PersonalNumber, FieldKind::OptionalData, 1, 28, 8, false),
];

static TD1: Layout = Layout {
    format: DocumentFormat::TD1,
    fields: &TD1_FIELDS,
    composite: &[
        Slot::DocumentNumber,
        Slot::PersonalNumber,
        Slot::Birthdate,
        Slot::ExpiryDate,
        Slot::PersonalNumber2,
    ],
};

static TD2: Layout = Layout {
    format: DocumentFormat::TD2,
    fields: &TD2_FIELDS,
    composite: &[
        Slot::DocumentNumber,
        Slot::Birthdate,
        Slot::ExpiryDate,
        Slot::PersonalNumber,
    ],
};

static TD3: Layout = Layout {
    format: DocumentFormat::TD3,
    fields: &TD3_FIELDS,
    composite: &[
        Slot::DocumentNumber,
        Slot::Birthdate,
        Slot::ExpiryDate,
        Slot::PersonalNumber,
    ],
};

static MRVA: Layout = Layout {
    format: DocumentFormat::MRVA,
    fields: &MRVA_FIELDS,
    composite: &[],
};

static MRVB: Layout = Layout {
    format: DocumentFormat::MRVB,
    fields: &MRVB_FIELDS,
    composite: &[],
};

impl Layout {
    pub fn for_format(format: DocumentFormat) -> &'static Layout {
        match format {
            DocumentFormat::TD1 => &TD1,
            DocumentFormat::TD2 => &TD2,
            DocumentFormat::TD3 => &TD3,
            DocumentFormat::MRVA => &MRVA,
            DocumentFormat::MRVB => &MRVB,
        }
    }
}
