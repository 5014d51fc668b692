//! Parsing utilities for CLI operations

use serde_json::Value;
use std::path::Path;

use super::process_input_line;
use crate::effect::PredictionArray;
use crate::error::PredictError;
use crate::prediction::OutputType;

/// Parse a comma-separated list of output types
///
/// # Examples
///
/// ```
/// use ferro_predict::cli::parse_outputs;
/// use ferro_predict::prediction::OutputType;
///
/// let outputs = parse_outputs("RNA_SEQ, atac").unwrap();
/// assert_eq!(outputs, vec![OutputType::RnaSeq, OutputType::Atac]);
/// assert!(parse_outputs("RNA_SEQ,HiC").is_err());
/// ```
pub fn parse_outputs(list: &str) -> Result<Vec<OutputType>, PredictError> {
    split_list(list)
        .map(|name| {
            OutputType::parse(name)
                .ok_or_else(|| PredictError::invalid_input(name, "unknown output type"))
        })
        .collect()
}

/// Parse a comma-separated list of ontology terms
pub fn parse_ontology_terms(list: &str) -> Vec<String> {
    split_list(list).map(str::to_string).collect()
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse scores separated by commas, whitespace or newlines
///
/// `#` comments are ignored.
///
/// # Examples
///
/// ```
/// use ferro_predict::cli::parse_scores;
///
/// assert_eq!(parse_scores("0.1, 0.5\n0.3 # note").unwrap(), vec![0.1, 0.5, 0.3]);
/// ```
pub fn parse_scores(text: &str) -> Result<Vec<f64>, PredictError> {
    let mut scores = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let Some(line) = process_input_line(line, i == 0) else {
            continue;
        };
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let score = token
                .parse::<f64>()
                .map_err(|_| PredictError::invalid_input(token, "not a number"))?;
            scores.push(score);
        }
    }
    Ok(scores)
}

/// Read a prediction array from a JSON file
///
/// Accepts either nested arrays of numbers or an object with `shape` and
/// row-major `values`.
pub fn read_array_file(path: &Path) -> Result<PredictionArray, PredictError> {
    let content = std::fs::read_to_string(path)?;
    parse_array_json(&content)
}

/// Parse a prediction array from JSON text; see [`read_array_file`]
pub fn parse_array_json(text: &str) -> Result<PredictionArray, PredictError> {
    let value: Value = serde_json::from_str(text)?;
    array_from_value(&value)
}

/// Build a prediction array from a parsed JSON value; see [`read_array_file`]
pub fn array_from_value(value: &Value) -> Result<PredictionArray, PredictError> {
    let (shape, values) = match value {
        Value::Object(map) => {
            let shape: Vec<usize> =
                serde_json::from_value(map.get("shape").cloned().unwrap_or(Value::Null))?;
            let values: Vec<f64> =
                serde_json::from_value(map.get("values").cloned().unwrap_or(Value::Null))?;
            (shape, values)
        }
        Value::Array(_) => {
            let mut shape = Vec::new();
            let mut values = Vec::new();
            flatten(value, 0, &mut shape, &mut values)?;
            (shape, values)
        }
        other => {
            return Err(PredictError::invalid_input(
                truncate(&other.to_string()),
                "expected a JSON array or {shape, values} object",
            ))
        }
    };

    PredictionArray::from_shape_vec(ndarray::IxDyn(&shape), values).map_err(|e| {
        PredictError::invalid_input(format!("shape {:?}", shape), e.to_string())
    })
}

/// Walk nested arrays depth-first, recording the shape and checking it is rectangular
fn flatten(
    value: &Value,
    depth: usize,
    shape: &mut Vec<usize>,
    values: &mut Vec<f64>,
) -> Result<(), PredictError> {
    match value {
        Value::Array(items) => {
            match shape.get(depth) {
                Some(&expected) if expected != items.len() => {
                    return Err(PredictError::invalid_input(
                        format!("axis {}", depth),
                        format!("ragged array: expected {} items, found {}", expected, items.len()),
                    ));
                }
                Some(_) => {}
                None if depth == shape.len() && values.is_empty() => shape.push(items.len()),
                None => {
                    return Err(PredictError::invalid_input(
                        format!("axis {}", depth),
                        "ragged array: nesting depth differs",
                    ))
                }
            }
            for item in items {
                flatten(item, depth + 1, shape, values)?;
            }
            Ok(())
        }
        Value::Number(n) => {
            if depth != shape.len() {
                return Err(PredictError::invalid_input(
                    n.to_string(),
                    "ragged array: nesting depth differs",
                ));
            }
            let v = n
                .as_f64()
                .ok_or_else(|| PredictError::invalid_input(n.to_string(), "not a number"))?;
            values.push(v);
            Ok(())
        }
        other => Err(PredictError::invalid_input(
            other.to_string(),
            "array elements must be numbers",
        )),
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(40).collect()
}
