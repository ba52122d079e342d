use log::{debug, warn};

use crate::validation::CheckDigit;

/// Glyphs that OCR swaps most often in document numbers.
const AMBIGUOUS: [char; 2] = ['0', 'O'];

pub const DEFAULT_MAX_AMBIGUOUS_POSITIONS: usize = 12;

/// Brute-force search over `0`/`O` assignments for a document number whose
/// check digit fails.
#[derive(Debug, Clone)]
pub struct DocumentNumberRecoverer {
    max_ambiguous_positions: usize,
}

impl DocumentNumberRecoverer {
    pub fn new(max_ambiguous_positions: usize) -> Self {
        DocumentNumberRecoverer {
            max_ambiguous_positions,
        }
    }

    /// Return the first assignment that satisfies `check_digit`, or the
    /// input unchanged when none does or the search would exceed the cap.
    ///
    /// Candidates are visited in lexicographic order with `0` before `O`,
    /// leftmost position most significant.
    pub fn recover(&self, document_number: &str, check_digit: char) -> String {
        let mut chars: Vec<char> = document_number.chars().collect();
        let positions: Vec<usize> = chars
            .iter()
            .enumerate()
            .filter(|(_, c)| AMBIGUOUS.contains(*c))
            .map(|(i, _)| i)
            .collect();

        if positions.len() > self.max_ambiguous_positions {
            warn!(
                "Skipping document number recovery: {} ambiguous positions exceed the limit of {}",
                positions.len(),
                self.max_ambiguous_positions
            );
            return document_number.to_string();
        }

        let radix = AMBIGUOUS.len();
        let mut digits = vec![0usize; positions.len()];
        loop {
            for (&position, &digit) in positions.iter().zip(&digits) {
                chars[position] = AMBIGUOUS[digit];
            }
            let candidate: String = chars.iter().collect();
            if CheckDigit::is_value_valid(&candidate, check_digit) {
                if candidate != document_number {
                    debug!("Recovered document number {} -> {}", document_number, candidate);
                }
                return candidate;
            }
            if !Self::advance(&mut digits, radix) {
                break;
            }
        }

        debug!("No 0/O assignment validates document number {}", document_number);
        document_number.to_string()
    }

    /// Increment a mixed-radix counter, last position fastest. Returns false
    /// once every combination has been produced.
    fn advance(digits: &mut [usize], radix: usize) -> bool {
        for digit in digits.iter_mut().rev() {
            *digit += 1;
            if *digit < radix {
                return true;
            }
            *digit = 0;
        }
        false
    }
}

impl Default for DocumentNumberRecoverer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AMBIGUOUS_POSITIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_single_flipped_zero() {
        let recoverer = DocumentNumberRecoverer::default();
        assert_eq!(recoverer.recover("L8989O2C3", '6'), "L898902C3");
    }

    #[test]
    fn test_recovers_letter_read_as_zero() {
        let recoverer = DocumentNumberRecoverer::default();
        // German specimen number with both kinds of confusion
        assert_eq!(recoverer.recover("CO1XO0T47", '8'), "C01X00T47");
    }

    #[test]
    fn test_no_ambiguity_is_a_no_op() {
        let recoverer = DocumentNumberRecoverer::default();
        assert_eq!(recoverer.recover("L898912C3", '6'), "L898912C3");
    }

    #[test]
    fn test_exhausted_search_keeps_input() {
        let recoverer = DocumentNumberRecoverer::default();
        assert_eq!(recoverer.recover("L8989O2C3", '5'), "L8989O2C3");
    }

    #[test]
    fn test_valid_input_is_returned_as_is() {
        let recoverer = DocumentNumberRecoverer::default();
        assert_eq!(recoverer.recover("L898902C3", '6'), "L898902C3");
    }

    #[test]
    fn test_cap_skips_search() {
        let recoverer = DocumentNumberRecoverer::new(0);
        assert_eq!(recoverer.recover("L8989O2C3", '6'), "L8989O2C3");
        // Zero ambiguous positions are within any cap
        assert_eq!(recoverer.recover("L898912C3", '6'), "L898912C3");
    }

    #[test]
    fn test_counter_visits_every_combination() {
        let mut digits = vec![0usize; 3];
        let mut seen = 1;
        while DocumentNumberRecoverer::advance(&mut digits, 2) {
            seen += 1;
        }
        assert_eq!(seen, 8);
        assert_eq!(digits, vec![0, 0, 0]);
    }
}
