use std::io::Write;

use colored::*;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use super::{bytes_to_gb, format_gb, format_model_details, ModelSummary};

/// Builds the numbered table shown in the main menu.
pub fn build_model_table(models: &[ModelSummary]) -> Table {
    let mut table = Table::new();
    table
        .set_header(
            ["Index", "Name", "Family", "Param. Size", "Quant. Lvl", "Size"]
                .into_iter()
                .map(|title| {
                    Cell::new(title)
                        .fg(comfy_table::Color::Cyan)
                        .add_attribute(Attribute::Bold)
                })
                .collect::<Vec<_>>(),
        )
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (i, model) in models.iter().enumerate() {
        let formatted = format_model_details(model);
        table.add_row(vec![
            Cell::new(i + 1)
                .fg(comfy_table::Color::White)
                .set_alignment(CellAlignment::Center),
            Cell::new(formatted.name).fg(comfy_table::Color::Green),
            Cell::new(formatted.family).fg(comfy_table::Color::Magenta),
            Cell::new(formatted.parameter_size)
                .fg(comfy_table::Color::Yellow)
                .set_alignment(CellAlignment::Center),
            Cell::new(formatted.quantization_level)
                .fg(comfy_table::Color::Cyan)
                .set_alignment(CellAlignment::Center),
            Cell::new(formatted.size)
                .fg(comfy_table::Color::Blue)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Prints the installed models as the main menu.
pub fn print_model_menu(models: &[ModelSummary], out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "\n{}", "Installed Models:".bright_cyan().bold())?;
    writeln!(out, "{}", build_model_table(models))?;
    writeln!(
        out,
        "{}",
        format!("Total models: {}", models.len()).bright_green()
    )
}

/// Prints one model's details, with the parameter size exactly as reported.
pub fn print_model_details(model: &ModelSummary, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{} {}", "Model Name:".bold(), model.name)?;
    writeln!(out, "{} {}", "Family:".bold(), model.family)?;
    writeln!(out, "{} {}", "Parameter Size:".bold(), model.parameter_size)?;
    writeln!(
        out,
        "{} {}",
        "Quantization Level:".bold(),
        model.quantization_level
    )?;
    writeln!(
        out,
        "{} {}",
        "Size:".bold(),
        format_gb(bytes_to_gb(model.size_bytes))
    )
}
