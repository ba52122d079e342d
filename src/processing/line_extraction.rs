use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref MRZ_TEXT: Regex = Regex::new(r"^[A-Z0-9<\n]*$").expect("valid MRZ text pattern");
}

/// Splits recognized text into candidate MRZ lines.
pub struct MrzLineExtractor;

impl MrzLineExtractor {
    /// Returns `None` when the text holds anything besides MRZ characters
    /// and line breaks, or when no line is left.
    ///
    /// Lines shorter than the average line length are dropped; they are
    /// usually fragments picked up around the zone.
    pub fn extract(text: &str) -> Option<Vec<String>> {
        let compact: String = text.chars().filter(|c| *c != ' ' && *c != '\r').collect();
        if !MRZ_TEXT.is_match(&compact) {
            debug!("Recognized text contains non-MRZ characters");
            return None;
        }

        let lines: Vec<&str> = compact.split('\n').filter(|line| !line.is_empty()).collect();
        if lines.is_empty() {
            return None;
        }

        let average = lines.iter().map(|line| line.len()).sum::<usize>() / lines.len();
        let lines: Vec<String> = lines
            .into_iter()
            .filter(|line| line.len() >= average)
            .map(str::to_string)
            .collect();

        Some(lines)
    }
}
