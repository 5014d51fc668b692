//! Output formatting utilities for CLI operations

use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

use crate::analysis::{IntervalAnalysis, VariantAnalysis};
use crate::effect::{ArrayStats, EffectSummary, TrackScore};
use crate::error::PredictError;
use crate::genome::GenomicInterval;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Parse an output format from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_predict::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert!(matches!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json));
    /// assert!(matches!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// Write a value as pretty JSON followed by a newline
pub fn output_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

/// Write an error to the output
///
/// # Examples
///
/// ```
/// use ferro_predict::cli::{output_error, OutputFormat};
/// use ferro_predict::PredictError;
/// use std::io::Cursor;
///
/// let mut buffer = Cursor::new(Vec::new());
/// let error = PredictError::UnsupportedLength { width: 1 };
/// output_error(&mut buffer, "chr1:1-2", &error, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.starts_with("ERROR: chr1:1-2 - "));
/// ```
pub fn output_error<W: Write>(
    writer: &mut W,
    input: &str,
    error: &PredictError,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "input": input,
                "error": error.to_string(),
                "code": error.code().as_str(),
                "status": "error",
            });
            serde_json::to_writer(&mut *writer, &value)?;
            writeln!(writer)
        }
        OutputFormat::Text => {
            writeln!(writer, "ERROR: {} - {}", input, error)?;
            if let Some(hint) = error.hint() {
                writeln!(writer, "  hint: {}", hint)?;
            }
            Ok(())
        }
    }
}

/// Write a normalized interval
pub fn output_interval<W: Write>(
    writer: &mut W,
    input: &str,
    interval: &GenomicInterval,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => output_json(
            writer,
            &serde_json::json!({
                "input": input,
                "interval": interval,
                "width": interval.width(),
                "status": "ok",
            }),
        ),
        OutputFormat::Text => {
            if input == interval.to_string() {
                writeln!(writer, "{} ({} bp)", interval, interval.width())
            } else {
                writeln!(writer, "{} -> {} ({} bp)", input, interval, interval.width())
            }
        }
    }
}

/// Write an effect summary
pub fn output_effect<W: Write>(
    writer: &mut W,
    summary: &EffectSummary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => output_json(writer, summary),
        OutputFormat::Text => write_effect_text(writer, summary, ""),
    }
}

fn write_effect_text<W: Write>(
    writer: &mut W,
    summary: &EffectSummary,
    indent: &str,
) -> io::Result<()> {
    writeln!(writer, "{}direction:          {}", indent, summary.direction)?;
    writeln!(writer, "{}reference mean:     {:.6}", indent, summary.reference_mean)?;
    writeln!(writer, "{}alternate mean:     {:.6}", indent, summary.alternate_mean)?;
    writeln!(writer, "{}mean difference:    {:+.6}", indent, summary.mean_difference)?;
    writeln!(
        writer,
        "{}max |difference|:   {:.6}",
        indent, summary.max_absolute_difference
    )?;
    writeln!(
        writer,
        "{}std of difference:  {:.6}",
        indent, summary.standard_deviation_of_difference
    )
}

/// Write ranked tracks
pub fn output_tracks<W: Write>(
    writer: &mut W,
    tracks: &[TrackScore],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => output_json(writer, tracks),
        OutputFormat::Text => write_tracks_text(writer, tracks, ""),
    }
}

fn write_tracks_text<W: Write>(
    writer: &mut W,
    tracks: &[TrackScore],
    indent: &str,
) -> io::Result<()> {
    for (rank, track) in tracks.iter().enumerate() {
        writeln!(
            writer,
            "{}{}. track {}: {:.6}",
            indent,
            rank + 1,
            track.track_index,
            track.score
        )?;
    }
    Ok(())
}

fn write_stats_text<W: Write>(
    writer: &mut W,
    label: &str,
    stats: &ArrayStats,
) -> io::Result<()> {
    writeln!(
        writer,
        "  {}: shape {:?}, mean {:.6}, std {:.6}, min {:.6}, max {:.6}",
        label, stats.shape, stats.mean, stats.std, stats.min, stats.max
    )
}

/// Write an interval analysis
pub fn output_interval_analysis<W: Write>(
    writer: &mut W,
    analysis: &IntervalAnalysis,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => output_json(writer, analysis),
        OutputFormat::Text => {
            let meta = &analysis.metadata;
            writeln!(
                writer,
                "{} ({} bp) [{}] tissues: {}",
                meta.interval,
                meta.interval.width(),
                meta.backend,
                meta.ontology_terms.join(", ")
            )?;
            for (output, stats) in &analysis.predictions {
                write_stats_text(writer, output.as_str(), stats)?;
            }
            Ok(())
        }
    }
}

/// Write a variant analysis
pub fn output_variant_analysis<W: Write>(
    writer: &mut W,
    analysis: &VariantAnalysis,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => output_json(writer, analysis),
        OutputFormat::Text => {
            let meta = &analysis.metadata;
            if let Some(variant) = &meta.variant {
                writeln!(writer, "{} ({})", variant, variant.variant_type())?;
            }
            writeln!(
                writer,
                "context {} ({} bp) [{}] tissues: {}",
                meta.interval,
                meta.interval.width(),
                meta.backend,
                meta.ontology_terms.join(", ")
            )?;
            for (output, effect) in &analysis.variant_effects {
                writeln!(writer, "{}", output)?;
                write_stats_text(writer, "reference", &effect.reference)?;
                write_stats_text(writer, "alternate", &effect.alternate)?;
                write_effect_text(writer, &effect.effect, "  ")?;
                if !effect.top_tracks.is_empty() {
                    writeln!(writer, "  top tracks:")?;
                    write_tracks_text(writer, &effect.top_tracks, "    ")?;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectDirection;
    use std::io::Cursor;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Cursor<Vec<u8>>) -> io::Result<()>,
    {
        let mut buffer = Cursor::new(Vec::new());
        f(&mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    fn summary() -> EffectSummary {
        EffectSummary {
            reference_mean: 0.4,
            alternate_mean: 0.422,
            mean_difference: 0.022,
            max_absolute_difference: 0.05,
            standard_deviation_of_difference: 0.01,
            direction: EffectDirection::Increase,
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("other").unwrap(), OutputFormat::Text);
    }

    #[test]
    fn test_output_error_json() {
        let error = PredictError::InvalidChromosome {
            chromosome: "chr99".to_string(),
        };
        let out = render(|w| output_error(w, "chr99:1-2049", &error, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "E1002");
        assert_eq!(value["input"], "chr99:1-2049");
    }

    #[test]
    fn test_output_error_text_hint() {
        let error = PredictError::InvalidChromosome {
            chromosome: "1".to_string(),
        };
        let out = render(|w| output_error(w, "1:1-2049", &error, OutputFormat::Text));
        assert!(out.contains("ERROR: 1:1-2049 - Invalid chromosome: 1"));
        assert!(out.contains("did you mean chr1?"));
    }

    #[test]
    fn test_output_interval_text() {
        let interval = GenomicInterval::new("chr1", 1, 2049).unwrap();
        let out = render(|w| output_interval(w, "chr1:1-2049", &interval, OutputFormat::Text));
        assert_eq!(out, "chr1:1-2049 (2048 bp)\n");

        let out = render(|w| output_interval(w, "chr1:5-10", &interval, OutputFormat::Text));
        assert_eq!(out, "chr1:5-10 -> chr1:1-2049 (2048 bp)\n");
    }

    #[test]
    fn test_output_effect_text() {
        let out = render(|w| output_effect(w, &summary(), OutputFormat::Text));
        assert!(out.contains("direction:          INCREASE"));
        assert!(out.contains("mean difference:    +0.022000"));
    }

    #[test]
    fn test_output_effect_json() {
        let out = render(|w| output_effect(w, &summary(), OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["direction"], "INCREASE");
        assert_eq!(value["meanDifference"], 0.022);
    }

    #[test]
    fn test_output_tracks_text() {
        let tracks = vec![TrackScore::from((1, 0.5)), TrackScore::from((3, 0.5))];
        let out = render(|w| output_tracks(w, &tracks, OutputFormat::Text));
        assert_eq!(out, "1. track 1: 0.500000\n2. track 3: 0.500000\n");
    }
}
