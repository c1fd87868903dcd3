use std::fmt;

use crate::console::LineSource;
use crate::error::ParameterError;

/// Sampling overrides for a derived model.
///
/// Values are only checked for type, not range: a negative temperature is
/// accepted here and left for the server to judge.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParameters {
    pub temperature: f64,
    pub context_length: i64,
    pub top_k: i64,
    pub top_p: f64,
    pub min_p: f64,
}

/// A single parameter value as written to a modelfile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Float(f64),
    Int(i64),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole floats keep a fractional digit so they read as floats
            ParameterValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            ParameterValue::Float(v) => write!(f, "{}", v),
            ParameterValue::Int(v) => write!(f, "{}", v),
        }
    }
}

impl GenerationParameters {
    /// Modelfile keys and values, in file order.
    pub fn entries(&self) -> [(&'static str, ParameterValue); 5] {
        [
            ("temperature", ParameterValue::Float(self.temperature)),
            ("num_ctx", ParameterValue::Int(self.context_length)),
            ("top_k", ParameterValue::Int(self.top_k)),
            ("top_p", ParameterValue::Float(self.top_p)),
            ("min_p", ParameterValue::Float(self.min_p)),
        ]
    }
}

fn read_float(
    input: &mut dyn LineSource,
    field: &'static str,
    prompt: &str,
) -> Result<f64, ParameterError> {
    let value = input.read_line(prompt)?;
    value
        .trim()
        .parse::<f64>()
        .map_err(|source| ParameterError::Float {
            field,
            value,
            source,
        })
}

fn read_int(
    input: &mut dyn LineSource,
    field: &'static str,
    prompt: &str,
) -> Result<i64, ParameterError> {
    let value = input.read_line(prompt)?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|source| ParameterError::Int {
            field,
            value,
            source,
        })
}

/// Asks for the five generation parameters in order.
///
/// The first value that does not parse aborts the capture; there is no
/// re-prompt here.
pub fn capture(input: &mut dyn LineSource) -> Result<GenerationParameters, ParameterError> {
    let temperature = read_float(input, "temperature", "Enter temperature (e.g., 0.7): ")?;
    let context_length = read_int(input, "num_ctx", "Enter num_ctx (e.g., 2048): ")?;
    let top_k = read_int(input, "top_k", "Enter top_k (e.g., 50): ")?;
    let top_p = read_float(input, "top_p", "Enter top_p (e.g., 0.9): ")?;
    let min_p = read_float(input, "min_p", "Enter min_p (e.g., 0.01): ")?;

    Ok(GenerationParameters {
        temperature,
        context_length,
        top_k,
        top_p,
        min_p,
    })
}
