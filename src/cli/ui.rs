use crate::core::currency::{self, CurrencyCode};
use crate::core::report::{Figure, Unit};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// How amounts are shown to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyFormat {
    pub currency: CurrencyCode,
    pub privacy: bool,
}

impl MoneyFormat {
    pub fn amount(&self, value: f64) -> String {
        currency::format_money(value, self.currency, self.privacy)
    }
}

/// Renders a figure according to its unit. Monetary figures honour privacy mode.
pub fn format_figure(figure: &Figure, money: MoneyFormat) -> String {
    let value = figure.value;
    match figure.unit {
        Unit::Money => money.amount(value),
        Unit::Currency(code) => currency::format_money(value, code, money.privacy),
        Unit::Percent => format!("{value:.2}%"),
        Unit::Years => format!("{value:.1} years"),
        Unit::Months => format!("{value:.1} months"),
        Unit::Units => format!("{} units", currency::group_thousands(value, 2)),
        Unit::Litres => format!("{value:.2} L"),
        Unit::Number => currency::group_thousands(value, 4),
    }
}

/// Creates a right-aligned amount cell, green for inflows and red for outflows.
pub fn amount_cell(value: f64, money: MoneyFormat) -> Cell {
    let cell = Cell::new(money.amount(value)).set_alignment(CellAlignment::Right);
    if money.privacy {
        cell.fg(Color::DarkGrey)
    } else if value >= 0.0 {
        cell.fg(Color::Green)
    } else {
        cell.fg(Color::Red)
    }
}

/// Creates a cell for displaying a percentage with color coding.
pub fn percent_cell(value: f64) -> Cell {
    let text = format!("{value:.2}%");
    if value > 0.0 {
        Cell::new(text)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right)
    } else {
        Cell::new(text)
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right)
    }
}

/// Creates a spinner shown while waiting on a remote call.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
