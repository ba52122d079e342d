use log::debug;

use crate::models::DocumentFormat;
use crate::utils::MrzError;

/// Classifies raw lines into one of the supported MRZ layouts.
pub struct FormatDetector;

impl FormatDetector {
    pub fn detect<S: AsRef<str>>(lines: &[S]) -> Result<DocumentFormat, MrzError> {
        let first = match lines.first() {
            Some(line) => line.as_ref(),
            None => return Err(MrzError::FormatError("No MRZ lines given".to_string())),
        };
        let width = first.chars().count();

        // Every line of a layout has the same width
        if let Some((index, line)) = lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.as_ref().chars().count() != width)
        {
            return Err(MrzError::FormatError(format!(
                "Inconsistent line lengths: line 1 has {} characters, line {} has {}",
                width,
                index + 1,
                line.as_ref().chars().count()
            )));
        }

        let matching = || {
            DocumentFormat::ALL.into_iter().filter(move |format| {
                format.mrz_lines() == lines.len() && format.mrz_chars_per_line() == width
            })
        };
        // Visas share their signature with TD2/TD3; the document type decides
        let is_visa = first.starts_with('V');
        let format = matching()
            .find(|format| format.is_visa() == is_visa)
            .or_else(|| matching().next())
            .ok_or_else(|| {
                MrzError::FormatError(format!(
                    "No MRZ layout has {} lines of {} characters",
                    lines.len(),
                    width
                ))
            })?;

        debug!("Detected {} layout", format);
        Ok(format)
    }
}
