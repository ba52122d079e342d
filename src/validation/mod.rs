pub mod check_digit;
pub mod format;

pub use check_digit::CheckDigit;
pub use format::FormatDetector;
