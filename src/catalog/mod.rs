mod display;

pub use display::{build_model_table, print_model_details, print_model_menu};

use std::io::Write;

use colored::*;
use tracing::{info, warn};

use crate::client::types::ModelTag;
use crate::client::OllamaClient;
use crate::console::LineSource;
use crate::error::ConsoleError;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// One installed model, as listed by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub name: String,
    pub family: String,
    /// Raw value from the server: a byte count or a label such as "7B"
    pub parameter_size: String,
    pub quantization_level: String,
    pub size_bytes: u64,
}

impl From<ModelTag> for ModelSummary {
    fn from(tag: ModelTag) -> Self {
        Self {
            name: tag.name,
            family: tag.details.family,
            parameter_size: tag.details.parameter_size,
            quantization_level: tag.details.quantization_level,
            size_bytes: tag.size,
        }
    }
}

/// Display-ready strings for a model row.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedModel {
    pub name: String,
    pub family: String,
    pub parameter_size: String,
    pub quantization_level: String,
    pub size: String,
}

/// Converts a byte count to binary gigabytes.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Rounds to two decimals and always keeps at least one fractional digit,
/// so 4 GiB renders as "4.0 GB" and 7e9 bytes as "6.52 GB".
pub fn format_gb(gb: f64) -> String {
    let rounded = (gb * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.1} GB", rounded)
    } else {
        format!("{} GB", rounded)
    }
}

/// Formats a model for display.
///
/// A numeric parameter size is read as a byte count and shown in GB with
/// two decimals; anything else (e.g. "7B") passes through unchanged.
pub fn format_model_details(model: &ModelSummary) -> FormattedModel {
    let parameter_size = match model.parameter_size.trim().parse::<i64>() {
        Ok(count) => format!("{:.2} GB", count as f64 / BYTES_PER_GB),
        Err(_) => model.parameter_size.clone(),
    };

    FormattedModel {
        name: model.name.clone(),
        family: model.family.clone(),
        parameter_size,
        quantization_level: model.quantization_level.clone(),
        size: format_gb(bytes_to_gb(model.size_bytes)),
    }
}

/// Fetches the catalog, reporting a failure and treating it as "no models".
pub async fn fetch_catalog(
    client: &OllamaClient,
    out: &mut dyn Write,
) -> Result<Vec<ModelSummary>, ConsoleError> {
    match client.list_models().await {
        Ok(models) => Ok(models),
        Err(e) => {
            warn!("Failed to retrieve models: {}", e);
            writeln!(out, "{}", format!("Failed to retrieve models: {}", e).red())?;
            Ok(Vec::new())
        }
    }
}

/// Asks for a model number until a valid one in `1..=models.len()` is given.
///
/// # Errors
///
/// Only console failures end the loop early; invalid numbers re-prompt.
pub fn select_model<'m>(
    models: &'m [ModelSummary],
    input: &mut dyn LineSource,
    out: &mut dyn Write,
) -> Result<&'m ModelSummary, ConsoleError> {
    loop {
        let line = input.read_line("Select a model by number: ")?;
        match line.trim().parse::<i64>() {
            Ok(selection) if selection >= 1 && (selection as usize) <= models.len() => {
                let model = &models[selection as usize - 1];
                info!("Selected model {}", model.name);
                return Ok(model);
            }
            Ok(_) => writeln!(
                out,
                "{}",
                "Invalid selection. Please choose a valid number.".yellow()
            )?,
            Err(_) => writeln!(out, "{}", "Please enter a valid number.".yellow())?,
        }
    }
}

/// Re-fetches the catalog and prints the details of `model_name`.
pub async fn show_model_details(
    client: &OllamaClient,
    model_name: &str,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    writeln!(out, "Details for model: {}", model_name)?;
    let models = fetch_catalog(client, out).await?;

    match models.iter().find(|m| m.name == model_name) {
        Some(model) => print_model_details(model, out)?,
        None => writeln!(
            out,
            "{}",
            format!("Model {} is no longer installed.", model_name).yellow()
        )?,
    }
    Ok(())
}
