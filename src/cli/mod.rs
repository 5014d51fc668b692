//! CLI utilities for ferro-predict
//!
//! Parsing and rendering helpers used by the `ferro-predict` binary, kept
//! in the library so they can be unit tested against in-memory buffers.

pub mod format;
pub mod parse;

pub use format::{
    output_effect, output_error, output_interval, output_interval_analysis, output_json,
    output_tracks, output_variant_analysis, OutputFormat,
};
pub use parse::{
    array_from_value, parse_array_json, parse_ontology_terms, parse_outputs, parse_scores,
    read_array_file,
};

/// UTF-8 BOM (Byte Order Mark) constant
const UTF8_BOM: &str = "\u{feff}";

/// Strip a UTF-8 BOM from the beginning of a string if present.
///
/// # Examples
///
/// ```
/// use ferro_predict::cli::strip_bom;
///
/// assert_eq!(strip_bom("\u{feff}0.25"), "0.25");
/// assert_eq!(strip_bom("0.25"), "0.25");
/// ```
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix(UTF8_BOM).unwrap_or(s)
}

/// Strip an inline `#` comment and surrounding whitespace.
///
/// # Examples
///
/// ```
/// use ferro_predict::cli::strip_inline_comment;
///
/// assert_eq!(strip_inline_comment("0.5, 0.3  # liver"), "0.5, 0.3");
/// assert_eq!(strip_inline_comment("# full line comment"), "");
/// ```
pub fn strip_inline_comment(s: &str) -> &str {
    match s.find('#') {
        Some(pos) => s[..pos].trim(),
        None => s.trim(),
    }
}

/// Trim a line, strip a BOM on the first line and drop comments.
///
/// Returns None for empty and comment-only lines.
pub fn process_input_line(line: &str, is_first_line: bool) -> Option<&str> {
    let line = line.trim();
    let line = if is_first_line { strip_bom(line) } else { line };
    let line = strip_inline_comment(line);

    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}
