// String helpers shared by the formatter and the parser

pub const FILLER: char = '<';

/// True for characters of the MRZ alphabet: `A-Z`, `0-9` and the filler.
pub fn is_mrz_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == FILLER
}

/// Strip leading and trailing fillers.
pub fn trim_fillers(value: &str) -> &str {
    value.trim_matches(FILLER)
}

/// Trim fillers and turn the remaining ones into spaces.
pub fn fillers_to_spaces(value: &str) -> String {
    trim_fillers(value).replace(FILLER, " ")
}

/// Copy an ASCII slice of a line buffer into an owned string.
pub fn slice_to_string(line: &[u8], start: usize, length: usize) -> String {
    line[start..start + length].iter().map(|&b| b as char).collect()
}

/// Write `value` back into the line buffer at `start`.
pub fn write_back(line: &mut [u8], start: usize, value: &str) {
    let bytes = value.as_bytes();
    line[start..start + bytes.len()].copy_from_slice(bytes);
}
