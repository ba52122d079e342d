pub mod field_formatter;
pub mod line_extraction;
pub mod ocr_correction;
pub mod recovery;

pub use field_formatter::FieldFormatter;
pub use line_extraction::MrzLineExtractor;
pub use ocr_correction::OcrCorrector;
pub use recovery::DocumentNumberRecoverer;
