use wobble_core::scene::format_value;
use wobble_core::{Formula, Variable};

/// Decimal places that show every slider position distinctly.
pub fn step_decimals(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 2;
    }
    if step >= 1.0 {
        return 0;
    }
    ((-step.log10() - 1e-9).ceil() as usize).min(4)
}

fn with_unit(text: String, unit: &str) -> String {
    match unit {
        "" => text,
        "°" => format!("{}°", text),
        _ => format!("{} {}", text, unit),
    }
}

/// Slider readout, e.g. "20.0 m/s" or "45°".
pub fn value_text(var: &Variable, value: f64) -> String {
    let text = format!("{:.*}", step_decimals(var.step), value);
    with_unit(text, var.unit)
}

/// Output readout, e.g. "R = 40.8 m".
pub fn output_text(var: &Variable, value: f64) -> String {
    format!("{} = {}", var.symbol, with_unit(format_value(value), var.unit))
}

/// Equation line above the sliders; empty when the formula has no layout.
pub fn formula_text(formula: &Formula) -> String {
    formula
        .layout
        .map(|layout| layout.inline_text())
        .unwrap_or_default()
}

pub fn option_label(formula: &Formula, unlocked: bool) -> String {
    if unlocked {
        formula.title.to_string()
    } else {
        format!("{}{}", crate::constants::LOCKED_PREFIX, formula.title)
    }
}
