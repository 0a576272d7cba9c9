use std::io::Write;

use anyhow::Result;
use grocer_shopping::{combine_quantities, parse_ingredient_line};

use super::{optional_arg, write_json};
use crate::config::Config;

pub fn parse(config: &Config, lines: &[String], out: &mut impl Write) -> Result<()> {
    let parsed: Vec<_> = lines.iter().map(|line| parse_ingredient_line(line)).collect();

    tracing::debug!(lines = parsed.len(), "Parsed ingredient lines");

    write_json(out, &parsed, config.output.pretty)
}

pub fn combine(
    config: &Config,
    quantity_a: &str,
    unit_a: &str,
    quantity_b: &str,
    unit_b: &str,
    out: &mut impl Write,
) -> Result<()> {
    let combined = combine_quantities(
        optional_arg(quantity_a),
        optional_arg(unit_a),
        optional_arg(quantity_b),
        optional_arg(unit_b),
    );

    if combined.needs_review {
        tracing::warn!(quantity = ?combined.quantity, "Quantities could not be summed");
    }

    write_json(out, &combined, config.output.pretty)
}
